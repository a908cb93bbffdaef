use std::future::Future;

use log::{debug, info};

use crate::error::{Error, Result, Unavailable};
use crate::{Segment, Transcript, VideoId};

/// One caption track offered for a video
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub language_code: String,
    pub language: String,
    pub is_generated: bool,
    pub is_translatable: bool,
    /// Service-specific locator for the caption body
    pub base_url: String,
    /// Languages this track can be machine-translated into
    pub translation_languages: Vec<String>,
}

impl Track {
    pub fn can_translate_to(&self, lang: &str) -> bool {
        self.is_translatable && self.translation_languages.iter().any(|code| code == lang)
    }
}

/// All caption tracks for a video, in the order the service listed them
#[derive(Debug, Clone, Default)]
pub struct TranscriptList {
    pub title: String,
    pub tracks: Vec<Track>,
}

impl TranscriptList {
    /// First track in any of `language_codes`, manual tracks before generated ones
    pub fn find_transcript(&self, language_codes: &[&str]) -> Option<&Track> {
        language_codes.iter().find_map(|code| {
            self.find_manually_created(&[*code])
                .or_else(|| self.find_generated(&[*code]))
        })
    }

    pub fn find_manually_created(&self, language_codes: &[&str]) -> Option<&Track> {
        self.find_where(language_codes, false)
    }

    pub fn find_generated(&self, language_codes: &[&str]) -> Option<&Track> {
        self.find_where(language_codes, true)
    }

    pub fn first_manually_created(&self) -> Option<&Track> {
        self.tracks.iter().find(|t| !t.is_generated)
    }

    pub fn first_generated(&self) -> Option<&Track> {
        self.tracks.iter().find(|t| t.is_generated)
    }

    fn find_where(&self, language_codes: &[&str], generated: bool) -> Option<&Track> {
        language_codes.iter().find_map(|code| {
            self.tracks
                .iter()
                .find(|t| t.is_generated == generated && t.language_code == *code)
        })
    }
}

/// Outcome of picking a track for the target language
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a> {
    Found(&'a Track),
    NeedsTranslation(&'a Track),
    NotFound,
}

/// Pick a track: the target language first, then any manual track, then any generated one.
pub fn select<'a>(list: &'a TranscriptList, lang: &str) -> Selection<'a> {
    if let Some(track) = list.find_transcript(&[lang]) {
        return Selection::Found(track);
    }

    match list.first_manually_created().or_else(|| list.first_generated()) {
        Some(track) if track.language_code == lang => Selection::Found(track),
        Some(track) => Selection::NeedsTranslation(track),
        None => Selection::NotFound,
    }
}

/// A source of caption tracks and their segments
pub trait TranscriptService {
    fn list_transcripts(&self, video_id: &VideoId) -> impl Future<Output = Result<TranscriptList>>;

    /// Fetch a track's segments, machine-translated when `translate_to` is set
    fn fetch(
        &self,
        video_id: &VideoId,
        track: &Track,
        translate_to: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Segment>>>;
}

/// List, select, and fetch the transcript for a video in `lang`
pub async fn acquire<T: TranscriptService>(service: &T, video_id: &VideoId, lang: &str) -> Result<Transcript> {
    let list = service.list_transcripts(video_id).await?;
    debug!("Video {video_id} offers {} caption tracks", list.tracks.len());

    let (track, translate_to) = match select(&list, lang) {
        Selection::Found(track) => (track, None),
        Selection::NeedsTranslation(track) => {
            if !track.can_translate_to(lang) {
                return Err(Error::TranslationUnavailable {
                    video_id: video_id.to_string(),
                    from: track.language_code.clone(),
                    to: lang.to_string(),
                });
            }
            info!("Translating {} captions to {lang}", track.language_code);
            (track, Some(lang))
        }
        Selection::NotFound => return Err(Error::unavailable(video_id.as_str(), Unavailable::NoTranscript)),
    };

    debug!(
        "Using caption track: {} ({}) generated={}",
        track.language, track.language_code, track.is_generated
    );

    let segments = service.fetch(video_id, track, translate_to).await?;

    Ok(Transcript {
        video_id: video_id.to_string(),
        title: list.title.clone(),
        language: translate_to.unwrap_or(&track.language_code).to_string(),
        is_generated: track.is_generated,
        translated_from: translate_to.map(|_| track.language_code.clone()),
        segments,
    })
}
