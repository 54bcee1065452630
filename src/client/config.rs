//! Connection settings for the backend API. The base URL is supplied by the
//! caller (CLI flag or environment); configuration values are public, so no
//! secrets belong here.

use super::errors::ClientError;
use crate::APP_USER_AGENT;
use std::time::Duration;
use url::Url;

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
    user_agent: String,
}

impl ClientConfig {
    /// Validates the backend base URL and applies default settings.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] when the URL is empty, cannot be parsed,
    /// has no host, or uses a scheme other than `http`/`https`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let Some(trimmed) = normalize_base_url(base_url) else {
            return Err(ClientError::Config("backend URL is empty".to_string()));
        };

        let url = Url::parse(&trimmed)
            .map_err(|err| ClientError::Config(format!("invalid backend URL {trimmed}: {err}")))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ClientError::Config(format!(
                    "unsupported scheme {scheme} in backend URL"
                )))
            }
        }

        if url.host().is_none() {
            return Err(ClientError::Config(
                "backend URL has no host specified".to_string(),
            ));
        }

        Ok(Self {
            base_url: url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: APP_USER_AGENT.to_string(),
        })
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Appends path segments to the base URL, keeping any base path prefix.
    /// Segments are percent-encoded, so opaque tokens are safe to pass as-is.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Config("backend URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn normalize_base_url(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
