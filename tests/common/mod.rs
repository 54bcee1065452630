//! Shared fixtures: an in-process mock backend and recording capabilities.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use membership::{
    client::{ClientConfig, ProfileClient},
    session::{AuthContext, Capabilities, Navigator, Notifier, Route},
};
use secrecy::SecretString;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{net::TcpListener, task::JoinHandle};

pub const PROFILE: &str = "profile";
pub const TOGGLE: &str = "toggle";
pub const RESET: &str = "reset";

#[derive(Clone, Debug)]
pub struct Recorded {
    pub route: &'static str,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub user_agent: Option<String>,
    pub path_token: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
    delay: Duration,
}

#[derive(Default)]
struct MockState {
    replies: Mutex<HashMap<&'static str, Reply>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/auth/profile", get(profile))
            .route("/user/togglemembership", post(toggle))
            .route("/auth/reset-password/:token", post(reset))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn reply(&self, route: &'static str, status: u16, body: Value) {
        self.reply_delayed(route, status, body, Duration::ZERO);
    }

    pub fn reply_delayed(&self, route: &'static str, status: u16, body: Value, delay: Duration) {
        self.reply_raw(route, status, &body.to_string(), delay);
    }

    pub fn reply_raw(&self, route: &'static str, status: u16, body: &str, delay: Duration) {
        self.state.replies.lock().unwrap().insert(
            route,
            Reply {
                status,
                body: body.to_string(),
                delay,
            },
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn count(&self, route: &str) -> usize {
        self.requests().iter().filter(|r| r.route == route).count()
    }

    pub fn last(&self, route: &str) -> Recorded {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.route == route)
            .expect("no request recorded for route")
    }

    /// Waits until `count` requests for `route` have reached the backend.
    pub async fn wait_for(&self, route: &str, count: usize) {
        for _ in 0..200 {
            if self.count(route) >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("timed out waiting for {count} {route} request(s)");
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn respond(
    state: Arc<MockState>,
    route: &'static str,
    headers: &HeaderMap,
    path_token: Option<String>,
    body: String,
) -> (StatusCode, String) {
    state.requests.lock().unwrap().push(Recorded {
        route,
        authorization: header(headers, "authorization"),
        request_id: header(headers, "x-request-id"),
        user_agent: header(headers, "user-agent"),
        path_token,
        body,
    });

    let reply = state.replies.lock().unwrap().get(route).cloned();
    let Some(reply) = reply else {
        return (StatusCode::NOT_FOUND, r#"{"message":"no reply configured"}"#.to_string());
    };

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    (StatusCode::from_u16(reply.status).unwrap(), reply.body)
}

async fn profile(State(state): State<Arc<MockState>>, headers: HeaderMap) -> (StatusCode, String) {
    respond(state, PROFILE, &headers, None, String::new()).await
}

async fn toggle(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    respond(state, TOGGLE, &headers, None, body).await
}

async fn reset(
    State(state): State<Arc<MockState>>,
    Path(token): Path<String>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    respond(state, RESET, &headers, Some(token), body).await
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Success(String),
    Error(String),
    Navigate(Route),
    Logout,
}

/// Session, navigator and notifier in one, recording everything they do.
#[derive(Default)]
pub struct Recorder {
    token: Mutex<Option<String>>,
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn with_token(token: Option<&str>) -> Self {
        Self {
            token: Mutex::new(token.map(str::to_string)),
            events: Mutex::default(),
        }
    }

    /// Simulates a fresh login.
    pub fn set_token(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn logouts(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == Event::Logout)
            .count()
    }

    pub fn navigations(&self) -> Vec<Route> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Navigate(route) => Some(route),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Success(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl AuthContext for Recorder {
    fn token(&self) -> Option<SecretString> {
        self.token.lock().unwrap().clone().map(SecretString::from)
    }

    fn logout(&self) {
        *self.token.lock().unwrap() = None;
        self.push(Event::Logout);
    }
}

impl Navigator for Recorder {
    fn navigate(&self, route: Route) {
        self.push(Event::Navigate(route));
    }
}

impl Notifier for Recorder {
    fn success(&self, message: &str) {
        self.push(Event::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Event::Error(message.to_string()));
    }
}

pub struct Harness {
    pub backend: MockBackend,
    pub recorder: Arc<Recorder>,
    pub client: Arc<ProfileClient>,
}

impl Harness {
    pub async fn new(token: Option<&str>) -> Self {
        Self::with_timeout(token, Duration::from_secs(5)).await
    }

    pub async fn with_timeout(token: Option<&str>, timeout: Duration) -> Self {
        let backend = MockBackend::start().await;
        let recorder = Arc::new(Recorder::with_token(token));
        let capabilities = Capabilities::new(recorder.clone(), recorder.clone(), recorder.clone());
        let config = ClientConfig::new(&backend.base_url)
            .unwrap()
            .with_timeout(timeout);
        let client = Arc::new(ProfileClient::new(config, capabilities).unwrap());

        Self {
            backend,
            recorder,
            client,
        }
    }
}

pub fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}
