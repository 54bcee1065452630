//! Per-view state and presentation on top of [`crate::client::ProfileClient`].

pub mod error_page;
pub mod profile;
pub mod reset_password;

pub use self::{
    error_page::ErrorReport,
    profile::{ProfileView, Skipped, ToggleOutcome, ViewPhase},
    reset_password::ResetPasswordForm,
};
