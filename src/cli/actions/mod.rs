pub mod membership;
pub mod password;
pub mod profile;

use crate::{
    cli::{
        console::{ConsoleNavigator, ConsoleNotifier},
        globals::GlobalArgs,
    },
    client::ProfileClient,
    session::{Capabilities, MemorySession},
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipCommand {
    Activate,
    Deactivate,
    /// Send whichever action flips the current state.
    Toggle,
}

#[derive(Debug)]
pub enum Action {
    Profile,
    Membership(MembershipCommand),
    ResetPassword {
        reset_token: String,
        new_password: SecretString,
        confirm_password: SecretString,
    },
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails; the user has already been
    /// notified through the console.
    pub async fn execute(self, globals: &GlobalArgs) -> Result<()> {
        match self {
            Self::Profile => profile::handle(globals).await,
            Self::Membership(command) => membership::handle(globals, command).await,
            Self::ResetPassword {
                reset_token,
                new_password,
                confirm_password,
            } => password::handle(globals, &reset_token, &new_password, &confirm_password).await,
        }
    }
}

/// Builds a client wired to the console and an in-memory session seeded
/// with the token from the command line.
fn client(globals: &GlobalArgs) -> Result<Arc<ProfileClient>> {
    let capabilities = Capabilities::new(
        Arc::new(MemorySession::new(globals.token.clone())),
        Arc::new(ConsoleNavigator::default()),
        Arc::new(ConsoleNotifier),
    );

    Ok(Arc::new(ProfileClient::new(
        globals.client_config()?,
        capabilities,
    )?))
}
