//! Profile/session client: the three backend operations and their wire
//! handling. Views decide what to show; this layer only talks to the backend
//! and classifies the outcome.

pub mod api;
pub mod config;
pub mod errors;
pub mod reset_token;
pub mod types;

pub use self::{
    api::{ApiClient, SESSION_EXPIRED_MESSAGE},
    config::{ClientConfig, DEFAULT_TIMEOUT},
    errors::{ClientError, ErrorKind},
    reset_token::ResetToken,
    types::{MembershipAction, MembershipChange, MembershipStatus, ProfileData},
};

use self::{
    api::{ApiRequest, Auth},
    types::{
        ProfileResponse, ResetPasswordRequest, ResetPasswordResponse, ToggleMembershipRequest,
        ToggleMembershipResponse,
    },
};
use crate::session::Capabilities;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument};

pub const ACTION_REJECTED_MESSAGE: &str = "Unable to perform action";
pub const RESET_REJECTED_MESSAGE: &str = "Unable to reset password";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";

#[derive(Debug)]
pub struct ProfileClient {
    api: ApiClient,
}

impl ProfileClient {
    /// # Errors
    /// Returns [`ClientError::Config`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, capabilities: Capabilities) -> Result<Self, ClientError> {
        Ok(Self {
            api: ApiClient::new(config, capabilities)?,
        })
    }

    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        self.api.capabilities()
    }

    #[must_use]
    pub fn has_session(&self) -> bool {
        self.capabilities().auth.token().is_some()
    }

    /// Fetches and normalizes the signed-in user's profile.
    /// Returns `Ok(None)` without any request when there is no session token.
    ///
    /// # Errors
    /// [`ClientError::AuthExpired`] after the unauthorized flow ran, transport
    /// errors for failed requests, non-2xx statuses or malformed bodies.
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self) -> Result<Option<ProfileData>, ClientError> {
        if !self.has_session() {
            debug!("no session token, skipping profile fetch");
            return Ok(None);
        }

        let response = self
            .api
            .send(ApiRequest::new(
                "/auth/profile",
                Method::GET,
                &["auth", "profile"],
                Auth::Bearer,
            ))
            .await?;

        let profile = response.success_json::<ProfileResponse>()?.into_profile();

        debug!(membership = %profile.membership_active, "profile loaded");

        Ok(Some(profile))
    }

    /// Asks the backend to change the membership state.
    ///
    /// # Errors
    /// [`ClientError::Rejected`] carrying the server message (or a generic
    /// one) when the backend answers `success: false`,
    /// [`ClientError::AuthExpired`] on `401`, transport errors otherwise.
    #[instrument(skip(self))]
    pub async fn toggle_membership(
        &self,
        action: MembershipAction,
    ) -> Result<MembershipChange, ClientError> {
        let mut request = ApiRequest::new(
            "/user/togglemembership",
            Method::POST,
            &["user", "togglemembership"],
            Auth::Bearer,
        );

        if let Some(action) = action.as_wire() {
            request = request.json(&ToggleMembershipRequest { action })?;
        }

        let response = self.api.send(request).await?;

        let body: ToggleMembershipResponse = match response.json() {
            Ok(body) => body,
            Err(_) if !response.is_success() => return Err(response.http_error()),
            Err(err) => return Err(err),
        };

        if !body.success {
            let message = non_empty(body.message)
                .unwrap_or_else(|| ACTION_REJECTED_MESSAGE.to_string());
            info!("membership {action} rejected: {message}");
            return Err(ClientError::Rejected(message));
        }

        let change = MembershipChange {
            membership_active: MembershipStatus::from_wire(body.membership_active.as_ref()),
            message: non_empty(body.message),
        };

        info!(membership = %change.membership_active, "membership {action} accepted");

        Ok(change)
    }

    /// Resets a password with the token from a reset link. Mismatched
    /// passwords fail before any request is sent. Returns the server message
    /// on success.
    ///
    /// # Errors
    /// [`ClientError::Validation`] when the passwords differ,
    /// [`ClientError::Rejected`] when the backend refuses the reset,
    /// transport errors otherwise.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        token: &ResetToken,
        new_password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<Option<String>, ClientError> {
        if new_password.expose_secret() != confirm_password.expose_secret() {
            debug!("password confirmation mismatch");
            return Err(ClientError::Validation(
                PASSWORD_MISMATCH_MESSAGE.to_string(),
            ));
        }

        let segments = ["auth", "reset-password", token.expose()];
        let request = ApiRequest::new(
            "/auth/reset-password/{token}",
            Method::POST,
            &segments,
            Auth::Anonymous,
        )
        .json(&ResetPasswordRequest {
            new_password: new_password.expose_secret(),
        })?;

        let response = self.api.send(request).await?;

        let body: ResetPasswordResponse = match response.json() {
            Ok(body) => body,
            Err(_) if !response.is_success() => return Err(response.http_error()),
            Err(err) => return Err(err),
        };

        if response.is_success() && body.success {
            info!("password reset accepted");
            Ok(non_empty(body.message))
        } else {
            let message =
                non_empty(body.message).unwrap_or_else(|| RESET_REJECTED_MESSAGE.to_string());
            info!(status = response.status.as_u16(), "password reset rejected: {message}");
            Err(ClientError::Rejected(message))
        }
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|message| !message.trim().is_empty())
}
