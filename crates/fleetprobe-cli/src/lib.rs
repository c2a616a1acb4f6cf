//! Fleetprobe CLI library
//!
//! Command-line front end for the fleetprobe primitives: synthetic
//! identifiers, canonical dates, the resolved suite configuration and a
//! live login check.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, DateArgs, GenerateArgs, IdentKind, LoginArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::Reporter;
