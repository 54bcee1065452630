//! Password reset form reached from a reset link.

use crate::{
    client::{ClientError, ProfileClient, ResetToken},
    session::Route,
};
use secrecy::SecretString;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::{debug, error};

pub const RESET_SUCCEEDED_MESSAGE: &str = "Password reset successful. Please log in.";
pub const RESET_FAILED_MESSAGE: &str = "Error resetting password";

#[derive(Debug)]
pub struct ResetPasswordForm {
    client: Arc<ProfileClient>,
    token: ResetToken,
    submitting: AtomicBool,
}

impl ResetPasswordForm {
    #[must_use]
    pub fn new(client: Arc<ProfileClient>, token: ResetToken) -> Self {
        Self {
            client,
            token,
            submitting: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Submits the new password. On success the user is notified and sent to
    /// the login view. Returns `Ok(false)` when a submission is already
    /// pending and nothing was sent.
    ///
    /// # Errors
    /// [`ClientError::Validation`] for mismatched passwords (no request is
    /// made), [`ClientError::Rejected`] when the backend refuses, or a
    /// transport error. Every error is surfaced through the notifier first.
    pub async fn submit(
        &self,
        new_password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<bool, ClientError> {
        if self.submitting.swap(true, Ordering::AcqRel) {
            debug!("password reset already in flight");
            return Ok(false);
        }

        let result = self
            .client
            .reset_password(&self.token, new_password, confirm_password)
            .await;

        self.submitting.store(false, Ordering::Release);

        let capabilities = self.client.capabilities();

        match result {
            Ok(message) => {
                capabilities
                    .notifier
                    .success(message.as_deref().unwrap_or(RESET_SUCCEEDED_MESSAGE));
                capabilities.navigator.navigate(Route::Login);
                Ok(true)
            }
            Err(err @ (ClientError::Validation(_) | ClientError::Rejected(_))) => {
                capabilities.notifier.error(&err.to_string());
                Err(err)
            }
            Err(err) => {
                error!("Error resetting password: {err}");
                capabilities.notifier.error(RESET_FAILED_MESSAGE);
                Err(err)
            }
        }
    }
}
