//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Fleetprobe: test data and UI checks for the fleet management app
#[derive(Parser, Debug)]
#[command(name = "fleetprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate synthetic identifiers for form input
    Generate(GenerateArgs),

    /// Print a date in the canonical MM/DD/YYYY form
    Date(DateArgs),

    /// Show the resolved suite configuration
    Config(ConfigArgs),

    /// Sign in to the configured application with a real browser
    Login(LoginArgs),
}

/// Identifier kinds
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentKind {
    /// Medallion number, e.g. 5X41
    Medallion,
    /// 17-character VIN
    Vin,
    /// DMV license number, e.g. K4820193
    Dmv,
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Kind of identifier
    #[arg(value_enum)]
    pub kind: IdentKind,

    /// Number of values to print
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the date command
#[derive(Parser, Debug)]
pub struct DateArgs {
    /// Year, e.g. 2025
    pub year: String,

    /// Three-letter month, e.g. Mar
    pub month: String,

    /// Day of month, e.g. 9
    pub day: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Suite config file (YAML)
    #[arg(short, long, env = "FLEETPROBE_CONFIG")]
    pub file: Option<PathBuf>,
}

/// Arguments for the login command
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Suite config file (YAML)
    #[arg(short, long, env = "FLEETPROBE_CONFIG")]
    pub file: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the Chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
