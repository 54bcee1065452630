use crate::{
    client::{ClientConfig, ClientError, DEFAULT_TIMEOUT},
    APP_USER_AGENT, GIT_COMMIT_HASH,
};
use secrecy::SecretString;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub backend_url: String,
    pub token: Option<SecretString>,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(backend_url: String) -> Self {
        Self {
            backend_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    /// Client settings with the build commit appended to the user agent.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] if the backend URL is invalid.
    pub fn client_config(&self) -> Result<ClientConfig, ClientError> {
        let short_hash = GIT_COMMIT_HASH.get(..7).unwrap_or(GIT_COMMIT_HASH);

        Ok(ClientConfig::new(&self.backend_url)?
            .with_timeout(self.timeout)
            .with_user_agent(format!("{APP_USER_AGENT} ({short_hash})")))
    }
}
