//! Main entry point for zxip-rs CLI tool
//!
//! Looks up IPv4/IPv6 addresses in ZX IPDB databases from arguments, a pipe
//! or an interactive prompt.

use anyhow::Context;
use clap::Parser;
use log::info;

use zxip_rs::cli::Cli;
use zxip_rs::config::AppConfig;

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    info!("Starting zxip-rs v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}, using defaults", e);
        let mut config = AppConfig::default();
        config.apply_env();
        config
    });

    // Execute CLI logic
    cli.run(config).context("zxip-rs failed")?;

    Ok(())
}
