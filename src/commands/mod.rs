pub mod config;
pub mod session;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::Cli;

/// Resolve the config path from the CLI flag or the default location.
pub fn resolve_config_path(cli: &Cli) -> Result<PathBuf> {
	match &cli.config {
		Some(path) => Ok(path.clone()),
		None => crate::config::Config::default_path(),
	}
}
