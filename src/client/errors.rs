use thiserror::Error;

/// Coarse classification used by views to decide how an error is surfaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend answered `401`; recovered by logout and redirect.
    AuthExpired,
    /// A local precondition failed before any request was sent.
    Validation,
    /// The backend answered with `success: false`.
    BusinessRejection,
    /// Network failure, timeout, unexpected status or unreadable body.
    Transport,
}

#[derive(Clone, Debug, Error)]
pub enum ClientError {
    #[error("session expired")]
    AuthExpired,
    #[error("no active session")]
    NoSession,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl ClientError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthExpired => ErrorKind::AuthExpired,
            Self::NoSession | Self::Validation(_) | Self::Config(_) => ErrorKind::Validation,
            Self::Rejected(_) => ErrorKind::BusinessRejection,
            Self::Network(_)
            | Self::Timeout(_)
            | Self::Http { .. }
            | Self::Parse(_)
            | Self::Serialization(_) => ErrorKind::Transport,
        }
    }

    /// HTTP status associated with the error, when the backend produced one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::AuthExpired => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_builder() {
            Self::Serialization(format!("Failed to build request: {err}"))
        } else if err.is_decode() {
            Self::Parse(format!("Failed to decode response: {err}"))
        } else {
            Self::Network(format!("Unable to reach the server: {err}"))
        }
    }
}
