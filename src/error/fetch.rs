use thiserror::Error;

/// Failures of the transaction source. These abort the whole query and are
/// never turned into an empty graph.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("[Fetch] Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("[Fetch] Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("[Fetch] Rate limited after {attempts} attempts")]
    RateLimited { attempts: usize },

    #[error("[Fetch] Failed to decode response: {0}")]
    Decode(String),

    #[error("[Fetch] Address rejected by upstream: {0}")]
    InvalidAddress(String),

    #[error("[Fetch] Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(e) => e.is_timeout() || e.is_connect(),
            FetchError::Status { status, .. } => crate::utils::is_retryable_status(*status),
            _ => false,
        }
    }
}
