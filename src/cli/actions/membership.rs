use super::{client, MembershipCommand};
use crate::{
    cli::globals::GlobalArgs,
    client::{ClientError, MembershipAction},
    views::{ProfileView, Skipped, ToggleOutcome},
};
use anyhow::{anyhow, Result};
use tracing::debug;

pub async fn handle(globals: &GlobalArgs, command: MembershipCommand) -> Result<()> {
    let view = ProfileView::new(client(globals)?);

    // The control needs a loaded profile, exactly like the view it mirrors.
    let profile = view.mount().await?.ok_or(ClientError::NoSession)?;

    let action = match command {
        MembershipCommand::Activate => MembershipAction::Activate,
        MembershipCommand::Deactivate => MembershipAction::Deactivate,
        MembershipCommand::Toggle => view
            .next_action()
            .ok_or_else(|| anyhow!("profile is not loaded"))?,
    };

    debug!(%action, current = %profile.membership_active, "running membership action");

    let outcome = view.toggle_membership(action).await;
    view.unmount();

    match outcome? {
        ToggleOutcome::Applied(status) => println!("Membership Status: {status}"),
        ToggleOutcome::Skipped(Skipped::Unchanged) => {
            println!("Membership is already {}", profile.membership_active);
        }
        ToggleOutcome::Skipped(reason) => {
            return Err(anyhow!("membership {action} not sent: {reason:?}"));
        }
        ToggleOutcome::Discarded => {}
    }

    Ok(())
}
