//! # Membership (profile and session client)
//!
//! `membership` is the client side of a membership service. It fetches the
//! signed-in user's profile, toggles membership activation and resets
//! passwords from reset links, all through a small HTTP contract with an
//! opaque backend.
//!
//! ## Capabilities
//!
//! The client never reaches for globals. The session (bearer token and
//! logout), navigation and user-visible notifications are injected through
//! [`session::Capabilities`], so a terminal front end, a GUI shell or a test
//! harness can each provide their own.
//!
//! ## Unauthorized flow
//!
//! Every authenticated call goes through one response interceptor. A `401`
//! surfaces a "session expired" notification, logs the session out and
//! navigates to `/login`; the caller gets [`client::ClientError::AuthExpired`].
//!
//! ## Views
//!
//! [`views::ProfileView`] owns the per-view state (`Loading`, `Ready`,
//! `Redirected`), the busy flag of the membership control and the lifetime
//! guard that drops responses arriving after unmount.

pub mod cli;
pub mod client;
pub mod session;
pub mod views;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
