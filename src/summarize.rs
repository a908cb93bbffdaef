use std::future::Future;

use eyre::{Result, bail};
use log::{debug, info};
use serde::Serialize;

use crate::chunk::{CHUNK_CHARS, chunk_text};
use crate::error::Error;

pub const DEFAULT_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models";
pub const TOKEN_ENV: &str = "HF_TOKEN";

/// Generation settings passed with every chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            max_length: 130,
            min_length: 30,
            do_sample: false,
        }
    }
}

/// Summary of one chunk, numbered from 1 in chunk order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub index: usize,
    pub text: String,
}

impl std::fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.index, self.text)
    }
}

/// An abstractive summarization model
pub trait Summarizer {
    fn summarize(&self, text: &str, params: &SummaryParams) -> impl Future<Output = Result<String>>;
}

/// Summarize `text` chunk by chunk; the first failing chunk aborts the rest.
pub async fn summarize_chunks<S: Summarizer>(
    summarizer: &S,
    text: &str,
    params: &SummaryParams,
) -> crate::Result<Vec<SummaryLine>> {
    let chunks = chunk_text(text, CHUNK_CHARS);
    info!("Summarizing {} chars in {} chunks", text.chars().count(), chunks.len());

    let mut lines = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.into_iter().enumerate() {
        let index = i + 1;
        debug!("Summarizing chunk {index}");
        let summary = summarizer
            .summarize(chunk, params)
            .await
            .map_err(|e| Error::SummarizationFailure {
                chunk: index,
                reason: e.to_string(),
            })?;
        lines.push(SummaryLine { index, text: summary });
    }

    Ok(lines)
}

/// Hosted model on the Hugging Face Inference API
#[derive(Debug, Clone)]
pub struct HuggingFace {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl HuggingFace {
    pub fn new(client: reqwest::Client, endpoint: &str, model: &str, token: impl Into<String>) -> Self {
        Self {
            client,
            url: format!("{}/{model}", endpoint.trim_end_matches('/')),
            token: token.into(),
        }
    }

    /// Build a client using the token from `HF_TOKEN`
    pub fn from_env(client: reqwest::Client, endpoint: &str, model: &str) -> crate::Result<Self> {
        match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(client, endpoint, model, token.trim())),
            _ => Err(Error::ModelUnavailable(format!(
                "{TOKEN_ENV} environment variable not set (required for Hugging Face inference)"
            ))),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Summarizer for HuggingFace {
    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String> {
        debug!("Summarizing {} chars via {}", text.len(), self.url);

        let body = serde_json::json!({
            "inputs": text,
            "parameters": {
                "max_length": params.max_length,
                "min_length": params.min_length,
                "do_sample": params.do_sample
            },
            "options": {
                "wait_for_model": true
            }
        });

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("Hugging Face API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        extract_summary_text(&json)
    }
}

fn extract_summary_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get(0)
        .and_then(|s| s.get("summary_text"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.trim().to_string());
    }
    if let Some(err) = json.get("error").and_then(|e| e.as_str()) {
        bail!("Hugging Face API error: {err}");
    }
    bail!("unexpected Hugging Face API response format");
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Echoes `summary:{chunk}`, optionally failing on one 1-based call
    #[derive(Clone, Default)]
    pub(crate) struct MockSummarizer {
        pub fail_on: Option<usize>,
        pub calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockSummarizer {
        pub(crate) fn failing_on(call: usize) -> Self {
            Self {
                fail_on: Some(call),
                ..Default::default()
            }
        }
    }

    impl Summarizer for MockSummarizer {
        async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String> {
            assert_eq!(*params, SummaryParams::default());
            let mut calls = self.calls.lock().unwrap();
            calls.push(text.to_string());
            if self.fail_on == Some(calls.len()) {
                bail!("model overloaded");
            }
            Ok(format!("summary:{text}"))
        }
    }

    #[test]
    fn test_default_params() {
        let params = SummaryParams::default();
        assert_eq!(params.max_length, 130);
        assert_eq!(params.min_length, 30);
        assert!(!params.do_sample);
    }

    #[tokio::test]
    async fn test_summarize_chunks_numbers_in_order() {
        let text: String = (0..2500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let summarizer = MockSummarizer::default();

        let lines = summarize_chunks(&summarizer, &text, &SummaryParams::default())
            .await
            .unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().map(|l| l.index).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(lines.iter().all(|l| l.text.starts_with("summary:")));
        assert_eq!(lines[0].text, format!("summary:{}", &text[..1000]));
        assert_eq!(lines[2].text, format!("summary:{}", &text[2000..]));
    }

    #[tokio::test]
    async fn test_summarize_chunks_empty_text() {
        let summarizer = MockSummarizer::default();
        let lines = summarize_chunks(&summarizer, "", &SummaryParams::default())
            .await
            .unwrap();
        assert!(lines.is_empty());
        assert!(summarizer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summarize_chunks_aborts_on_failure() {
        let text = "x".repeat(2500);
        let summarizer = MockSummarizer::failing_on(2);

        let err = summarize_chunks(&summarizer, &text, &SummaryParams::default())
            .await
            .unwrap_err();

        match err {
            Error::SummarizationFailure { chunk, reason } => {
                assert_eq!(chunk, 2);
                assert!(reason.contains("model overloaded"));
            }
            other => panic!("expected SummarizationFailure, got {other:?}"),
        }
        assert_eq!(summarizer.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_summary_line_display() {
        let line = SummaryLine {
            index: 2,
            text: "Key point.".to_string(),
        };
        assert_eq!(line.to_string(), "2. Key point.");
    }

    #[test]
    fn test_url_joins_endpoint_and_model() {
        let hf = HuggingFace::new(
            reqwest::Client::new(),
            "https://router.huggingface.co/hf-inference/models/",
            DEFAULT_MODEL,
            "token",
        );
        assert_eq!(
            hf.url(),
            "https://router.huggingface.co/hf-inference/models/facebook/bart-large-cnn"
        );
    }

    #[test]
    fn test_extract_summary_text() {
        let json = serde_json::json!([{ "summary_text": " The speaker explains the plan. " }]);
        assert_eq!(extract_summary_text(&json).unwrap(), "The speaker explains the plan.");
    }

    #[test]
    fn test_extract_summary_text_error() {
        let json = serde_json::json!({ "error": "Model facebook/bart-large-cnn is currently loading" });
        let err = extract_summary_text(&json).unwrap_err();
        assert!(err.to_string().contains("currently loading"));
    }

    #[test]
    fn test_extract_summary_text_empty() {
        assert!(extract_summary_text(&serde_json::json!([])).is_err());
    }
}
