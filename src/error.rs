use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("rate limited by the model service")]
    RateLimited,

    #[error("auth failed: {message}")]
    AuthFailed { message: String },

    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        status: Option<u16>,
    },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("request superseded by a newer one")]
    Cancelled,
}

impl EngineError {
    /// Returns true for transient errors that may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited => true,
            Self::Upstream { status, .. } => {
                // 5xx = server error (retryable), 4xx = client error (not retryable)
                // status: None = ambiguous (not from HTTP) → safe default: NOT retryable
                status.is_some_and(|s| s >= 500)
            }
            Self::Request(_) => true, // connection errors may be transient
            _ => false,
        }
    }

    /// Produce a sanitized error message safe for presentation.
    /// Does not leak upstream URLs, connection details, or response bodies.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredential => {
                "no API key configured — set GEMINI_API_KEY".to_string()
            }
            Self::RateLimited => {
                "rate limited by the model service — try again shortly".to_string()
            }
            Self::AuthFailed { message } => format!("authentication failed: {message}"),
            Self::Upstream { status, .. } => match status {
                Some(code) => format!("model service returned an error (HTTP {code})"),
                None => "model service returned an error".to_string(),
            },
            Self::Request(_) => "request to the model service failed".to_string(),
            Self::ParseFailure(_) => "failed to parse the model's response".to_string(),
            Self::Cancelled => "request superseded by a newer one".to_string(),
        }
    }
}
