//! HTTP plumbing shared by every backend call: request building, timeouts,
//! request ids, response capture and the single unauthorized interceptor.
//! Tokens are attached here and nowhere else; they are never logged.

use super::{config::ClientConfig, errors::ClientError};
use crate::session::{Capabilities, Route};
use reqwest::{Client, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info_span, warn, Instrument};
use ulid::Ulid;

/// Notification shown when the backend rejects the session.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";
/// Maximum number of error body characters kept for user-facing messages.
const MAX_ERROR_CHARS: usize = 200;
const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    Bearer,
    Anonymous,
}

/// A request against one backend endpoint. `name` is the path template used
/// for logs, so path parameters such as reset tokens stay out of them.
pub struct ApiRequest<'a> {
    pub name: &'static str,
    pub method: Method,
    pub segments: &'a [&'a str],
    pub auth: Auth,
    pub body: Option<serde_json::Value>,
}

impl<'a> ApiRequest<'a> {
    #[must_use]
    pub fn new(
        name: &'static str,
        method: Method,
        segments: &'a [&'a str],
        auth: Auth,
    ) -> Self {
        Self {
            name,
            method,
            segments,
            auth,
            body: None,
        }
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    /// Returns [`ClientError::Serialization`] if the body cannot be encoded.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|err| ClientError::Serialization(format!("Failed to encode request: {err}")))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Status and raw body of a completed, non-401 response.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decodes the body regardless of status.
    ///
    /// # Errors
    /// Returns [`ClientError::Parse`] when the body is not the expected JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_str(&self.body)
            .map_err(|err| ClientError::Parse(format!("Failed to decode response: {err}")))
    }

    /// Decodes the body of a 2xx response; any other status is an HTTP error.
    ///
    /// # Errors
    /// Returns [`ClientError::Http`] for non-2xx statuses and
    /// [`ClientError::Parse`] for unreadable bodies.
    pub fn success_json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        if self.is_success() {
            self.json()
        } else {
            Err(self.http_error())
        }
    }

    #[must_use]
    pub fn http_error(&self) -> ClientError {
        ClientError::Http {
            status: self.status.as_u16(),
            message: sanitize_body(&self.body),
        }
    }
}

/// Forced sign-out on `401`: notify, logout, redirect to the login view.
/// Remembers the token the backend rejected: further `401`s for that same
/// token are part of the same burst and are ignored, while a rejection of
/// any other token (a new login) runs the flow again. An authenticated
/// success forgets the rejected token.
#[derive(Debug)]
pub struct UnauthorizedFlow {
    capabilities: Capabilities,
    rejected: Mutex<Option<SecretString>>,
}

impl UnauthorizedFlow {
    #[must_use]
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            rejected: Mutex::new(None),
        }
    }

    /// Runs the flow for a rejection of `token` unless it already ran for
    /// that token. Returns `true` when this call performed the sign-out.
    pub fn trigger(&self, token: &SecretString) -> bool {
        {
            let mut rejected = self.rejected.lock().unwrap_or_else(PoisonError::into_inner);
            if rejected
                .as_ref()
                .is_some_and(|seen| seen.expose_secret() == token.expose_secret())
            {
                debug!("unauthorized flow already handled for this session");
                return false;
            }
            *rejected = Some(token.clone());
        }

        warn!("session rejected by backend, signing out");
        self.capabilities.notifier.error(SESSION_EXPIRED_MESSAGE);
        self.capabilities.auth.logout();
        self.capabilities.navigator.navigate(Route::Login);
        true
    }

    pub fn rearm(&self) {
        *self.rejected.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    capabilities: Capabilities,
    unauthorized: UnauthorizedFlow,
}

impl ApiClient {
    /// # Errors
    /// Returns [`ClientError::Config`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, capabilities: Capabilities) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()
            .map_err(|err| ClientError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            config,
            unauthorized: UnauthorizedFlow::new(capabilities.clone()),
            capabilities,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Sends a request and captures the response. A `401` on an
    /// authenticated request runs the unauthorized flow and yields
    /// [`ClientError::AuthExpired`].
    ///
    /// # Errors
    /// Returns [`ClientError::NoSession`] when a bearer request has no token,
    /// [`ClientError::AuthExpired`] on `401`, and transport errors when the
    /// request cannot be completed.
    pub async fn send(&self, request: ApiRequest<'_>) -> Result<ApiResponse, ClientError> {
        let token = match request.auth {
            Auth::Bearer => Some(
                self.capabilities
                    .auth
                    .token()
                    .ok_or(ClientError::NoSession)?,
            ),
            Auth::Anonymous => None,
        };

        let url = self.config.endpoint(request.segments)?;
        let request_id = Ulid::new().to_string();

        let span = info_span!(
            "api.request",
            http.method = %request.method,
            endpoint = request.name,
            request_id = %request_id
        );

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = &token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let outcome = async {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.text().await?;
            debug!(status = status.as_u16(), "response received");
            Ok::<_, reqwest::Error>(ApiResponse { status, body })
        }
        .instrument(span)
        .await;

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                let err = ClientError::from(err);
                error!(endpoint = request.name, request_id = %request_id, "request failed: {err}");
                return Err(err);
            }
        };

        if let Some(token) = &token {
            if response.status == StatusCode::UNAUTHORIZED {
                self.unauthorized.trigger(token);
                return Err(ClientError::AuthExpired);
            }
            if response.is_success() {
                self.unauthorized.rearm();
            }
        }

        Ok(response)
    }
}

/// Trims and truncates error bodies before they reach the user.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AuthContext, MemorySession, Navigator, Notifier};
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Navigator for Recorder {
        fn navigate(&self, route: Route) {
            self.events.lock().unwrap().push(format!("navigate {route}"));
        }
    }

    impl Notifier for Recorder {
        fn success(&self, message: &str) {
            self.events.lock().unwrap().push(format!("success {message}"));
        }

        fn error(&self, message: &str) {
            self.events.lock().unwrap().push(format!("error {message}"));
        }
    }

    fn capabilities(session: Arc<MemorySession>, recorder: Arc<Recorder>) -> Capabilities {
        Capabilities::new(session, recorder.clone(), recorder)
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body("  nope \n"), "nope");
        assert_eq!(sanitize_body(&"x".repeat(500)).len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn unauthorized_flow_runs_once_per_rejected_token() {
        let first = SecretString::from("first");
        let session = Arc::new(MemorySession::new(Some(first.clone())));
        let recorder = Arc::new(Recorder::default());
        let flow = UnauthorizedFlow::new(capabilities(session.clone(), recorder.clone()));

        assert!(flow.trigger(&first));
        assert!(!flow.trigger(&first));
        assert!(session.token().is_none());
        assert_eq!(
            recorder.events(),
            vec![
                format!("error {SESSION_EXPIRED_MESSAGE}"),
                "navigate /login".to_string(),
            ]
        );

        flow.rearm();
        assert!(flow.trigger(&first));
        assert_eq!(recorder.events().len(), 4);
    }

    #[test]
    fn unauthorized_flow_runs_again_for_a_new_login() {
        let session = Arc::new(MemorySession::new(Some(SecretString::from("first"))));
        let recorder = Arc::new(Recorder::default());
        let flow = UnauthorizedFlow::new(capabilities(session.clone(), recorder.clone()));

        assert!(flow.trigger(&SecretString::from("first")));

        session.set_token(SecretString::from("second"));
        assert!(flow.trigger(&SecretString::from("second")));
        assert!(!flow.trigger(&SecretString::from("second")));
        assert!(session.token().is_none());
        assert_eq!(
            recorder
                .events()
                .iter()
                .filter(|event| *event == "navigate /login")
                .count(),
            2
        );
    }

    #[test]
    fn response_success_json_rejects_error_status() {
        let response = ApiResponse {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        let err = response.success_json::<serde_json::Value>().unwrap_err();
        assert!(matches!(
            err,
            ClientError::Http { status: 502, ref message } if message == "upstream down"
        ));
    }

    #[test]
    fn response_json_reports_parse_errors() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: "<html>".to_string(),
        };
        assert!(matches!(
            response.json::<serde_json::Value>(),
            Err(ClientError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn bearer_request_without_token_fails_locally() {
        let session = Arc::new(MemorySession::default());
        let recorder = Arc::new(Recorder::default());
        // Port 9 (discard) is never contacted: the token check runs first.
        let config = ClientConfig::new("http://127.0.0.1:9").unwrap();
        let api = ApiClient::new(config, capabilities(session, recorder.clone())).unwrap();

        let err = api
            .send(ApiRequest::new(
                "/auth/profile",
                Method::GET,
                &["auth", "profile"],
                Auth::Bearer,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::NoSession));
        assert!(recorder.events().is_empty());
    }
}
