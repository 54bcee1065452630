//! Command-line front end: argument parsing, logging setup and the terminal
//! implementations of the client's capabilities.

pub mod actions;
pub mod commands;
pub mod console;
pub mod dispatch;
pub mod globals;
pub mod start;
pub mod telemetry;

pub use self::start::start;
