use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result, Unavailable};
use crate::transcript::{Track, TranscriptList, TranscriptService};
use crate::{Segment, VideoId};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const ANDROID_CLIENT_VERSION: &str = "20.10.38";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
    #[serde(rename = "videoDetails")]
    video_details: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks", default)]
    caption_tracks: Vec<CaptionTrack>,
    #[serde(rename = "translationLanguages", default)]
    translation_languages: Vec<TranslationLanguage>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    name: Option<TextRuns>,
    kind: Option<String>,
    #[serde(rename = "isTranslatable", default)]
    is_translatable: bool,
}

#[derive(Debug, Deserialize)]
struct TranslationLanguage {
    #[serde(rename = "languageCode")]
    language_code: String,
}

#[derive(Debug, Deserialize)]
struct TextRuns {
    #[serde(rename = "simpleText")]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TextRuns {
    fn text(&self) -> Option<String> {
        self.simple_text
            .clone()
            .or_else(|| self.runs.first().map(|r| r.text.clone()))
    }
}

/// Caption source backed by YouTube's InnerTube API
#[derive(Debug, Clone)]
pub struct YouTube {
    client: reqwest::Client,
    base_url: String,
}

impl YouTube {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: "https://www.youtube.com".to_string(),
        }
    }

    async fn get_text(&self, url: &str, video_id: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en-US")
            .send()
            .await
            .map_err(|e| network(video_id, e))?;

        check_status(resp.status(), video_id)?;
        resp.text().await.map_err(|e| network(video_id, e))
    }
}

impl TranscriptService for YouTube {
    async fn list_transcripts(&self, video_id: &VideoId) -> Result<TranscriptList> {
        let video_id = video_id.as_str();

        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        debug!("Fetching watch page: {watch_url}");
        let page_html = self.get_text(&watch_url, video_id).await?;

        let api_key = extract_api_key(&page_html, video_id)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!(
            "{}/youtubei/v1/player?key={api_key}&prettyPrint=false",
            self.base_url
        );

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": ANDROID_CLIENT_VERSION,
                    "hl": "en",
                    "gl": "US"
                }
            },
            "videoId": video_id
        });

        let resp = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| network(video_id, e))?;

        check_status(resp.status(), video_id)?;

        let player: InnerTubePlayerResponse = resp
            .json()
            .await
            .map_err(|e| Error::unavailable(video_id, Unavailable::Malformed(e.to_string())))?;

        build_transcript_list(video_id, player)
    }

    async fn fetch(&self, video_id: &VideoId, track: &Track, translate_to: Option<&str>) -> Result<Vec<Segment>> {
        let video_id = video_id.as_str();
        let url = caption_url(&track.base_url, translate_to);
        check_po_token(&url, video_id)?;

        debug!("Fetching caption XML: lang={} tlang={translate_to:?}", track.language_code);
        let caption_xml = self.get_text(&url, video_id).await?;

        parse_caption_xml(&caption_xml)
            .map_err(|reason| Error::unavailable(video_id, Unavailable::Malformed(reason)))
    }
}

fn network(video_id: &str, err: reqwest::Error) -> Error {
    Error::unavailable(video_id, Unavailable::Network(err.to_string()))
}

fn check_status(status: reqwest::StatusCode, video_id: &str) -> Result<()> {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::unavailable(video_id, Unavailable::RequestBlocked));
    }
    if !status.is_success() {
        return Err(Error::unavailable(
            video_id,
            Unavailable::Network(format!("HTTP {status}")),
        ));
    }
    Ok(())
}

fn caption_url(base_url: &str, translate_to: Option<&str>) -> String {
    let url = base_url.replace("&fmt=srv3", "");
    match translate_to {
        Some(lang) => format!("{url}&tlang={lang}"),
        None => url,
    }
}

fn check_po_token(url: &str, video_id: &str) -> Result<()> {
    if url.contains("&exp=xpe") {
        return Err(Error::unavailable(video_id, Unavailable::PoTokenRequired));
    }
    Ok(())
}

fn extract_api_key(html: &str, video_id: &str) -> Result<String> {
    if html.contains("class=\"g-recaptcha\"") {
        return Err(Error::unavailable(video_id, Unavailable::RequestBlocked));
    }

    let patterns = [
        r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#,
        // Fallback: try the newer pattern
        r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#,
    ];

    for pattern in patterns {
        let re = Regex::new(pattern)
            .map_err(|e| Error::unavailable(video_id, Unavailable::Malformed(e.to_string())))?;
        if let Some(caps) = re.captures(html) {
            return Ok(caps[1].to_string());
        }
    }

    Err(Error::unavailable(
        video_id,
        Unavailable::Malformed("could not extract InnerTube API key from watch page".to_string()),
    ))
}

fn check_playability(video_id: &str, status: Option<&PlayabilityStatus>) -> Result<()> {
    let Some(status) = status else {
        return Ok(());
    };

    let code = status.status.as_deref().unwrap_or("OK");
    let reason = status.reason.as_deref().unwrap_or_default();

    let unavailable = match code {
        "OK" => return Ok(()),
        "LOGIN_REQUIRED" if reason.contains("not a bot") => Unavailable::RequestBlocked,
        "LOGIN_REQUIRED" if reason.contains("inappropriate") => Unavailable::AgeRestricted,
        "LOGIN_REQUIRED" => Unavailable::LoginRequired,
        "ERROR" if reason.contains("unavailable") => Unavailable::VideoUnavailable,
        _ => Unavailable::Unplayable(reason.to_string()),
    };

    Err(Error::unavailable(video_id, unavailable))
}

fn build_transcript_list(video_id: &str, player: InnerTubePlayerResponse) -> Result<TranscriptList> {
    check_playability(video_id, player.playability_status.as_ref())?;

    let title = player.video_details.and_then(|vd| vd.title).unwrap_or_default();

    let renderer = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .ok_or_else(|| Error::unavailable(video_id, Unavailable::CaptionsDisabled))?;

    if renderer.caption_tracks.is_empty() {
        return Err(Error::unavailable(video_id, Unavailable::NoTranscript));
    }

    let translation_languages: Vec<String> = renderer
        .translation_languages
        .into_iter()
        .map(|l| l.language_code)
        .collect();

    let tracks = renderer
        .caption_tracks
        .into_iter()
        .map(|t| Track {
            language: t.name.and_then(|n| n.text()).unwrap_or_else(|| t.language_code.clone()),
            is_generated: t.kind.as_deref() == Some("asr"),
            is_translatable: t.is_translatable,
            translation_languages: if t.is_translatable {
                translation_languages.clone()
            } else {
                Vec::new()
            },
            language_code: t.language_code,
            base_url: t.base_url,
        })
        .collect();

    Ok(TranscriptList { title, tracks })
}

fn parse_caption_xml(xml: &str) -> std::result::Result<Vec<Segment>, String> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<(f64, f64)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = 0.0;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value);
                    match attr.key.as_ref() {
                        b"start" => start = value.parse::<f64>().ok(),
                        b"dur" => dur = value.parse::<f64>().unwrap_or(0.0),
                        _ => {}
                    }
                }
                current = start.map(|s| (s, dur));
            }
            Ok(Event::Text(ref e)) => {
                if let Some((start, duration)) = current.take() {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.is_empty() {
                        segments.push(Segment { text, start, duration });
                    }
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => current = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("error parsing caption XML: {e}")),
            _ => {}
        }
    }

    Ok(segments)
}
