//! Papers - static essay pages with inline citation tooltips.

mod build;
mod citation;
mod cli;
mod config;
mod page;
mod render;
mod serve;
mod utils;

use anyhow::Result;
use build::build_site;
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use serve::serve_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.is_serve() {
        serve_site(&config)
    } else {
        build_site(&config).map(|_| ())
    }
}

/// Load and validate configuration from CLI arguments.
///
/// A missing config file is not an error: every field has a default.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        let config = SiteConfig::from_path(&config_path)?;
        log!("config"; "using {}", config.config_path.display());
        config
    } else {
        log!("config"; "{} not found, using defaults", config_path.display());
        SiteConfig::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
