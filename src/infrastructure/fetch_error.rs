//! Page fetch errors
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String, timed_out: bool },

    #[error("Rejected response from {url}: {reason}")]
    ContentRejected { url: String, reason: String },

    #[error("Gave up on {url} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

impl FetchError {
    pub fn rejected(url: &str, reason: impl ToString) -> Self {
        Self::ContentRejected {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn transport(url: &str, error: &reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            reason: error.to_string(),
            timed_out: error.is_timeout(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::HttpStatus { url, .. }
            | Self::Transport { url, .. }
            | Self::ContentRejected { url, .. }
            | Self::RetriesExhausted { url, .. } => url,
        }
    }
}
