//! Widget error type

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WidgetError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    /// Request never produced a response (DNS, CORS, offline, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-2xx status
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// Body was not the JSON we expected
    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    /// Browser API missing (no window, no storage, ...)
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl From<gloo_net::Error> for WidgetError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => WidgetError::Decode(e.to_string()),
            other => WidgetError::Network(other.to_string()),
        }
    }
}
