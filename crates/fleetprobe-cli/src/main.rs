//! Fleetprobe: test data and UI checks for the fleet management app
//!
//! ## Usage
//!
//! ```bash
//! fleetprobe generate vin -n 3        # Three synthetic VINs
//! fleetprobe date 2025 Jan 3          # 01/03/2025
//! fleetprobe config -f suite.yaml     # Resolved config, password masked
//! fleetprobe login --no-sandbox       # Live sign-in (needs --features browser)
//! ```

use clap::Parser;
use fleetprobe_cli::{
    handlers, logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Reporter, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    let use_color = config.color.should_color();
    logging::init(config.verbosity, use_color);
    let reporter = Reporter::new(use_color, config.verbosity.is_quiet());

    match cli.command {
        Commands::Generate(args) => {
            for value in handlers::generate(&args)? {
                reporter.value(&value)?;
            }
        }
        Commands::Date(args) => reporter.value(&handlers::date(&args)?)?,
        Commands::Config(args) => reporter.block(&handlers::show_config(args.file.as_deref())?)?,
        Commands::Login(args) => {
            reporter.info("launching browser")?;
            reporter.success(&handlers::login(&args)?)?;
        }
    }
    Ok(())
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}
