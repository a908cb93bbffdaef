use std::sync::OnceLock;

use log::{debug, info};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::summarize::{SummaryLine, SummaryParams, Summarizer, summarize_chunks};
use crate::transcript::{TranscriptService, acquire};
use crate::{VideoId, extract_video_id};

type Loader<S> = Box<dyn Fn() -> Result<S> + Send + Sync>;

/// A summarization model built at most once per process.
///
/// The first [`ModelHandle::get`] runs the loader and keeps its outcome. A failed load is
/// kept as well, so every later request sees the same error until the process restarts.
pub struct ModelHandle<S> {
    cell: OnceLock<std::result::Result<S, String>>,
    loader: Option<Loader<S>>,
}

impl<S> ModelHandle<S> {
    pub fn lazy(loader: impl Fn() -> Result<S> + Send + Sync + 'static) -> Self {
        Self {
            cell: OnceLock::new(),
            loader: Some(Box::new(loader)),
        }
    }

    pub fn ready(model: S) -> Self {
        Self {
            cell: OnceLock::from(Ok(model)),
            loader: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<&S> {
        let outcome = self.cell.get_or_init(|| {
            info!("Loading summarization model");
            match &self.loader {
                Some(load) => load().map_err(|e| match e {
                    Error::ModelUnavailable(reason) => reason,
                    other => other.to_string(),
                }),
                None => Err("no model loader configured".to_string()),
            }
        });

        outcome.as_ref().map_err(|reason| Error::ModelUnavailable(reason.clone()))
    }
}

/// Outcome of one successful request
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub video_id: VideoId,
    pub title: String,
    pub language: String,
    pub is_generated: bool,
    pub translated_from: Option<String>,
    pub summaries: Vec<SummaryLine>,
}

/// Runs URL requests through resolve, transcript, and summarize, one at a time
pub struct Dispatcher<T, S> {
    transcripts: T,
    model: ModelHandle<S>,
    lang: String,
    params: SummaryParams,
}

impl<T: TranscriptService, S: Summarizer> Dispatcher<T, S> {
    pub fn new(transcripts: T, model: ModelHandle<S>, lang: impl Into<String>) -> Self {
        Self {
            transcripts,
            model,
            lang: lang.into(),
            params: SummaryParams::default(),
        }
    }

    pub fn model(&self) -> &ModelHandle<S> {
        &self.model
    }

    pub async fn handle(&self, url: &str) -> Result<Report> {
        let video_id = extract_video_id(url)?;
        info!("Handling request for video {video_id}");

        let transcript = acquire(&self.transcripts, &video_id, &self.lang).await?;
        let text = transcript.text();
        debug!(
            "Transcript: {} segments, {} chars, lang={}",
            transcript.segments.len(),
            text.chars().count(),
            transcript.language
        );

        let summaries = if text.is_empty() {
            debug!("Empty transcript for {video_id}, nothing to summarize");
            Vec::new()
        } else {
            let model = self.model.get()?;
            summarize_chunks(model, &text, &self.params).await?
        };
        info!("Produced {} summary lines for {video_id}", summaries.len());

        Ok(Report {
            video_id,
            title: transcript.title,
            language: transcript.language,
            is_generated: transcript.is_generated,
            translated_from: transcript.translated_from,
            summaries,
        })
    }
}
