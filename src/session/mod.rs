//! Capabilities injected into the client: the auth context that owns the
//! bearer token, navigation between views, and user-visible notifications.
//! Nothing here talks to the network.

use secrecy::SecretString;
use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::debug;

/// Views the client can send the user to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Profile,
}

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Profile => "/profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Session owner: hands out the bearer token and performs logout.
pub trait AuthContext: Send + Sync {
    /// Current bearer token, `None` when signed out.
    fn token(&self) -> Option<SecretString>;

    /// Invalidates the local session.
    fn logout(&self);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// User-visible notifications. Messages must never contain secrets.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Bundle of injected capabilities shared by the client and its views.
#[derive(Clone)]
pub struct Capabilities {
    pub auth: Arc<dyn AuthContext>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

impl Capabilities {
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthContext>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth,
            navigator,
            notifier,
        }
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}

/// In-memory session holding an optional bearer token; logout clears it.
#[derive(Default)]
pub struct MemorySession {
    token: RwLock<Option<SecretString>>,
}

impl MemorySession {
    #[must_use]
    pub fn new(token: Option<SecretString>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    pub fn set_token(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl AuthContext for MemorySession {
    fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn logout(&self) {
        debug!("clearing session token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl fmt::Debug for MemorySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySession")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
