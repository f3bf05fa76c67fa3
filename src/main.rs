use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use opera_provider::cli::{Cli, Command};
use opera_provider::commands::{self, session::SessionPlan};

fn init_tracing(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("opera_provider=debug")
	} else {
		EnvFilter::new("opera_provider=warn")
	};

	tracing_subscriber::registry()
		.with(fmt::layer().with_target(false))
		.with(filter)
		.init();
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);
	let path = commands::resolve_config_path(&cli)?;

	match &cli.command {
		Command::Session { token, message, txs, keep } => {
			let plan = SessionPlan {
				token: token.clone(),
				message: message.clone(),
				txs: txs.clone(),
				keep: *keep,
			};
			commands::session::run(&path, &plan).await
		}
		Command::Status => commands::config::show_status(&path),
		Command::Config { command } => commands::config::run(&path, command),
	}
}
