//! Error presentation: a status code, its status text and a message for the
//! user.

use crate::client::ClientError;
use reqwest::StatusCode;
use std::fmt;

const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

/// Fixed descriptions for the statuses users commonly run into.
#[must_use]
pub const fn status_description(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("Bad Request - The server could not understand your request."),
        401 => Some("Unauthorized - Please log in to access this page."),
        403 => Some("Forbidden - You don't have permission to view this."),
        404 => Some("Page Not Found - The page you are looking for doesn't exist."),
        500 => Some("Internal Server Error - Something went wrong on our end."),
        503 => Some("Service Unavailable - We're currently offline for maintenance."),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorReport {
    pub status: u16,
    pub status_text: String,
    pub message: String,
}

impl ErrorReport {
    /// Report for an HTTP error response. A server message wins over the
    /// canned description.
    #[must_use]
    pub fn from_response(status: u16, status_text: Option<&str>, server_message: Option<&str>) -> Self {
        let status_text = status_text
            .map(str::to_string)
            .or_else(|| {
                StatusCode::from_u16(status)
                    .ok()
                    .and_then(|code| code.canonical_reason())
                    .map(str::to_string)
            })
            .unwrap_or_default();

        let message = server_message
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .or_else(|| status_description(status))
            .unwrap_or(UNEXPECTED_MESSAGE)
            .to_string();

        Self {
            status,
            status_text,
            message,
        }
    }

    /// Report for a failure that did not come from an HTTP response.
    #[must_use]
    pub fn internal(message: &str) -> Self {
        Self {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self {
            status: 500,
            status_text: "Unknown Error".to_string(),
            message: UNEXPECTED_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn from_client_error(err: &ClientError) -> Self {
        match err {
            ClientError::AuthExpired | ClientError::NoSession => {
                Self::from_response(401, None, None)
            }
            ClientError::Http { status, message } => {
                Self::from_response(*status, None, Some(message))
            }
            ClientError::Validation(message) | ClientError::Rejected(message) => {
                Self::from_response(400, None, Some(message))
            }
            other => Self::internal(&other.to_string()),
        }
    }

    /// Builds a report from any error, looking for a [`ClientError`] in the
    /// chain first.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        if let Some(client) = err.chain().find_map(|cause| cause.downcast_ref::<ClientError>()) {
            return Self::from_client_error(client);
        }

        let message = err.to_string();
        if message.trim().is_empty() {
            Self::unknown()
        } else {
            Self::internal(&message)
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status, self.status_text, self.message)
    }
}
