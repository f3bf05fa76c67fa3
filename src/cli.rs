use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
	name = "opera-provider",
	about = "Drive the Opera wallet adapter against a simulated extension.",
	version
)]
pub struct Cli {
	/// Config file (defaults to ~/.opera-provider/config.toml).
	#[arg(long, global = true)]
	pub config: Option<PathBuf>,

	/// Show debug logs from the adapter.
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
	/// Run init, login, signing and logout in one session.
	Session {
		/// Login token handed to the wallet.
		#[arg(long)]
		token: Option<String>,

		/// Message to sign after login.
		#[arg(long)]
		message: Option<String>,

		/// Transaction payload as JSON. Repeat to sign a batch.
		#[arg(long = "tx")]
		txs: Vec<String>,

		/// Stay logged in at the end instead of calling logout.
		#[arg(long)]
		keep: bool,
	},

	/// Show the simulated host configuration.
	Status,

	/// Edit the simulated host configuration.
	Config {
		#[command(subcommand)]
		command: ConfigCommand,
	},
}

// -- Config subcommands --

#[derive(Subcommand)]
pub enum ConfigCommand {
	/// Set the address the simulated wallet logs in with.
	SetAddress {
		address: String,
	},

	/// Make individual wallet calls fail.
	Fail {
		#[arg(long)]
		init: Option<bool>,

		#[arg(long)]
		login: Option<bool>,

		#[arg(long)]
		logout: Option<bool>,
	},

	/// Toggle the browser marker and the injected extension.
	Host {
		#[arg(long)]
		opera: Option<bool>,

		#[arg(long)]
		installed: Option<bool>,
	},
}
