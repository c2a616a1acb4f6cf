//! Command handlers

use crate::commands::{DateArgs, GenerateArgs, IdentKind};
use crate::error::{CliError, CliResult};
use fleetprobe::{ident, SuiteConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

/// Generate `args.count` identifiers of `args.kind`
pub fn generate(args: &GenerateArgs) -> CliResult<Vec<String>> {
    if args.count == 0 {
        return Err(CliError::invalid_argument("--count must be at least 1"));
    }
    let mut rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let make: fn(&mut StdRng) -> String = match args.kind {
        IdentKind::Medallion => ident::medallion_number_with,
        IdentKind::Vin => ident::vin_with,
        IdentKind::Dmv => ident::dmv_license_number_with,
    };
    tracing::debug!(kind = ?args.kind, count = args.count, seed = ?args.seed, "generating identifiers");
    Ok((0..args.count).map(|_| make(&mut rng)).collect())
}

/// Canonical `MM/DD/YYYY` form of the given date labels
pub fn date(args: &DateArgs) -> CliResult<String> {
    Ok(fleetprobe::format_canonical(&args.year, &args.month, &args.day)?)
}

/// Load the suite config (or defaults), apply environment overrides, validate
pub fn resolve_config(file: Option<&Path>) -> CliResult<SuiteConfig> {
    let mut config = match file {
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::default(),
    };
    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

/// Resolved configuration as YAML with the password masked
pub fn show_config(file: Option<&Path>) -> CliResult<String> {
    Ok(resolve_config(file)?.to_redacted_yaml()?)
}

/// Sign in to the configured application with Chromium
#[cfg(feature = "browser")]
pub fn login(args: &crate::commands::LoginArgs) -> CliResult<String> {
    use fleetprobe::{BrowserConfig, ChromiumDriver, TestContext};

    let config = resolve_config(args.file.as_deref())?;
    let mut browser = BrowserConfig::default().with_headless(!args.headed);
    if args.no_sandbox {
        browser = browser.with_no_sandbox();
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let driver = ChromiumDriver::launch(browser).await?;
        let ctx = TestContext::new(driver, config)?;
        let outcome = ctx.login().await;
        let summary = format!(
            "signed in to {} as {}",
            ctx.config().base_url,
            ctx.config().credentials.username
        );
        ctx.into_driver().close().await?;
        let response = outcome?;
        tracing::info!(status = response.status, "login response");
        Ok::<_, CliError>(summary)
    })
}

/// Sign in to the configured application with Chromium
#[cfg(not(feature = "browser"))]
pub fn login(_args: &crate::commands::LoginArgs) -> CliResult<String> {
    Err(CliError::feature_disabled("login", "browser"))
}
