use crate::cli::{
    actions::{Action, MembershipCommand},
    commands::{
        ARG_BACKEND_URL, ARG_CONFIRM_PASSWORD, ARG_NEW_PASSWORD, ARG_RESET_TOKEN, ARG_TIMEOUT,
        ARG_TOKEN, CMD_ACTIVATE, CMD_DEACTIVATE, CMD_PROFILE, CMD_RESET_PASSWORD, CMD_TOGGLE,
    },
    globals::GlobalArgs,
};
use anyhow::{anyhow, bail, Result};
use secrecy::SecretString;
use std::time::Duration;

/// Reads the global arguments and maps the subcommand to an [`Action`].
///
/// # Errors
/// Returns an error if a required argument is missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<(GlobalArgs, Action)> {
    let backend_url = matches
        .get_one::<String>(ARG_BACKEND_URL)
        .cloned()
        .ok_or_else(|| anyhow!("missing required argument: --backend-url"))?;

    let mut globals = GlobalArgs::new(backend_url);

    if let Some(token) = matches
        .get_one::<String>(ARG_TOKEN)
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
    {
        globals.set_token(SecretString::from(token.to_string()));
    }

    if let Some(timeout) = matches.get_one::<u64>(ARG_TIMEOUT) {
        globals.timeout = Duration::from_secs(*timeout);
    }

    let action = match matches.subcommand() {
        Some((CMD_PROFILE, _)) => Action::Profile,
        Some((CMD_ACTIVATE, _)) => Action::Membership(MembershipCommand::Activate),
        Some((CMD_DEACTIVATE, _)) => Action::Membership(MembershipCommand::Deactivate),
        Some((CMD_TOGGLE, _)) => Action::Membership(MembershipCommand::Toggle),
        Some((CMD_RESET_PASSWORD, sub_m)) => {
            let value = |name: &str| -> Result<String> {
                sub_m
                    .get_one::<String>(name)
                    .cloned()
                    .ok_or_else(|| anyhow!("missing required argument: {name}"))
            };

            Action::ResetPassword {
                reset_token: value(ARG_RESET_TOKEN)?,
                new_password: SecretString::from(value(ARG_NEW_PASSWORD)?),
                confirm_password: SecretString::from(value(ARG_CONFIRM_PASSWORD)?),
            }
        }
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("missing command"),
    };

    Ok((globals, action))
}
