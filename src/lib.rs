pub mod chunk;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod summarize;
pub mod transcript;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub use dispatch::{Dispatcher, ModelHandle, Report};
pub use error::{Error, Result, Unavailable};
pub use summarize::{SummaryLine, SummaryParams};

/// Language every transcript is brought into unless configured otherwise
pub const DEFAULT_LANG: &str = "en";

/// A single captioned segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Complete transcript for a video
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub language: String,
    pub is_generated: bool,
    /// Original language code when the captions were machine-translated
    pub translated_from: Option<String>,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// All segment texts joined by single spaces
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Order matters: the first pattern that matches wins.
static VIDEO_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11}).*").expect("query/path pattern"),
        Regex::new(r"(?:embed/)([0-9A-Za-z_-]{11})").expect("embed pattern"),
        Regex::new(r"(?:youtu\.be/)([0-9A-Za-z_-]{11})").expect("short-link pattern"),
    ]
});

/// Extract video ID from various YouTube URL formats
pub fn extract_video_id(input: &str) -> Result<VideoId> {
    let input = input.trim();

    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| VideoId(caps[1].to_string()))
        .ok_or_else(|| Error::InvalidUrl(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(input: &str) -> String {
        extract_video_id(input).unwrap().to_string()
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120&list=PL123"),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_short_url_with_query() {
        assert_eq!(id("https://youtu.be/_NuH3D4SN-c?si=VSFea_rMwtaiR8Q7"), "_NuH3D4SN-c");
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(id("https://www.youtube.com/embed/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_shorts_url_matches_path_form() {
        assert_eq!(id("https://www.youtube.com/shorts/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_id_is_eleven_chars_from_alphabet() {
        let id = id("https://www.youtube.com/watch?v=a-B_c9D8e7Fxyz");
        assert_eq!(id, "a-B_c9D8e7F");
        assert_eq!(id.len(), 11);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(extract_video_id("not a url"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_bare_id_is_not_a_url() {
        assert!(extract_video_id("dQw4w9WgXcQ").is_err());
    }

    #[test]
    fn test_too_short_id() {
        assert!(extract_video_id("https://youtu.be/abc").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_video_id("").is_err());
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(id("  https://youtu.be/dQw4w9WgXcQ  "), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_transcript_text_joins_with_spaces() {
        let t = Transcript {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: String::new(),
            language: "en".to_string(),
            is_generated: false,
            translated_from: None,
            segments: vec![
                Segment {
                    text: "Hello".to_string(),
                    start: 0.0,
                    duration: 1.0,
                },
                Segment {
                    text: "world".to_string(),
                    start: 1.0,
                    duration: 1.0,
                },
            ],
        };
        assert_eq!(t.text(), "Hello world");
    }
}
