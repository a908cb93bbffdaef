use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why no transcript could be obtained for a video
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unavailable {
    #[error("captions are disabled")]
    CaptionsDisabled,
    #[error("no transcript of any kind exists")]
    NoTranscript,
    #[error("video is unavailable")]
    VideoUnavailable,
    #[error("video is age-restricted")]
    AgeRestricted,
    #[error("video is private or requires sign-in")]
    LoginRequired,
    #[error("request was blocked by YouTube")]
    RequestBlocked,
    #[error("captions require a proof-of-origin token")]
    PoTokenRequired,
    #[error("video is unplayable: {0}")]
    Unplayable(String),
    #[error("{0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid YouTube URL: {0:?}")]
    InvalidUrl(String),

    #[error("no transcript for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: Unavailable },

    #[error("transcript for video {video_id} is in '{from}' and cannot be translated to '{to}'")]
    TranslationUnavailable { video_id: String, from: String, to: String },

    #[error("summarization model is unavailable: {0}")]
    ModelUnavailable(String),

    #[error("summarization failed on chunk {chunk}: {reason}")]
    SummarizationFailure { chunk: usize, reason: String },
}

impl Error {
    pub(crate) fn unavailable(video_id: &str, reason: Unavailable) -> Self {
        Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason,
        }
    }

    /// Human-readable suggestion shown alongside the error
    pub fn hint(&self) -> &'static str {
        match self {
            Error::InvalidUrl(_) => {
                "Supported formats:\n  \
                 https://www.youtube.com/watch?v=ID\n  \
                 https://www.youtube.com/embed/ID\n  \
                 https://youtu.be/ID"
            }
            Error::TranscriptUnavailable { reason, .. } => match reason {
                Unavailable::CaptionsDisabled | Unavailable::NoTranscript => {
                    "The video doesn't have captions enabled, or the captions are embedded in the video \
                     and not available as text."
                }
                Unavailable::VideoUnavailable | Unavailable::AgeRestricted | Unavailable::LoginRequired => {
                    "The video might be age-restricted, private, or removed."
                }
                Unavailable::RequestBlocked | Unavailable::PoTokenRequired => {
                    "YouTube is rejecting requests from this network. Try again later or from another network."
                }
                Unavailable::Unplayable(_) | Unavailable::Network(_) | Unavailable::Malformed(_) => {
                    "If the error persists, try another video or check if the video has captions enabled."
                }
            },
            Error::TranslationUnavailable { .. } => {
                "The only available captions are in another language and YouTube offers no translation for them."
            }
            Error::ModelUnavailable(_) => {
                "Set HF_TOKEN to a Hugging Face access token and restart. The model is loaded once per process."
            }
            Error::SummarizationFailure { .. } => {
                "The inference service rejected a chunk. If the error persists, try another video."
            }
        }
    }
}
