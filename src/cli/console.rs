//! Terminal implementations of the injected capabilities.

use crate::session::{Navigator, Notifier, Route};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Prints notifications: successes on stdout, errors on stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// There are no views to switch in a terminal; the next route is reported to
/// the user and remembered.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    last: Mutex<Option<Route>>,
}

impl ConsoleNavigator {
    #[must_use]
    pub fn last_route(&self) -> Option<Route> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        info!(%route, "navigating");
        if route == Route::Login {
            eprintln!("Log in to continue, then pass the new token with --token.");
        }
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}
