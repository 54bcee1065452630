use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const ARG_BACKEND_URL: &str = "backend-url";
pub const ARG_TOKEN: &str = "token";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_RESET_TOKEN: &str = "reset-token";
pub const ARG_NEW_PASSWORD: &str = "new-password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";
pub const ARG_VERBOSITY: &str = "verbosity";

/// Log levels in verbosity order; a level's index is its `-v` count.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub const CMD_PROFILE: &str = "profile";
pub const CMD_ACTIVATE: &str = "activate";
pub const CMD_DEACTIVATE: &str = "deactivate";
pub const CMD_TOGGLE: &str = "toggle";
pub const CMD_RESET_PASSWORD: &str = "reset-password";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("membership")
        .about("Membership profile client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_BACKEND_URL)
                .short('u')
                .long("backend-url")
                .help("Backend base URL, example: https://api.membership.dev")
                .env("MEMBERSHIP_BACKEND_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN)
                .short('t')
                .long("token")
                .help("Bearer token of the signed-in user")
                .env("MEMBERSHIP_TOKEN")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .default_value("10")
                .env("MEMBERSHIP_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .subcommand(Command::new(CMD_PROFILE).about("Show the signed-in user's profile"))
        .subcommand(Command::new(CMD_ACTIVATE).about("Activate the membership"))
        .subcommand(Command::new(CMD_DEACTIVATE).about("Deactivate the membership"))
        .subcommand(
            Command::new(CMD_TOGGLE).about("Flip the membership to the opposite of its current state"),
        )
        .subcommand(
            Command::new(CMD_RESET_PASSWORD)
                .about("Set a new password using a password-reset link")
                .arg(
                    Arg::new(ARG_RESET_TOKEN)
                        .help("Reset token or the full reset link")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_NEW_PASSWORD)
                        .long("new-password")
                        .help("New password")
                        .env("MEMBERSHIP_NEW_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_CONFIRM_PASSWORD)
                        .long("confirm-password")
                        .help("New password, again")
                        .env("MEMBERSHIP_CONFIRM_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        );

    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log more: -v warn, -vv info, -vvv debug, -vvvv trace (default: error)")
            .env("MEMBERSHIP_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(parse_verbosity),
    )
}

/// `MEMBERSHIP_LOG_LEVEL` holds a level name from [`LOG_LEVELS`] or its index.
fn parse_verbosity(level: &str) -> Result<u8, String> {
    let level = level.trim();

    level
        .parse::<usize>()
        .ok()
        .filter(|index| *index < LOG_LEVELS.len())
        .or_else(|| {
            LOG_LEVELS
                .iter()
                .position(|name| name.eq_ignore_ascii_case(level))
        })
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| {
            format!(
                "invalid log level `{level}`, expected one of: {}",
                LOG_LEVELS.join(", ")
            )
        })
}
