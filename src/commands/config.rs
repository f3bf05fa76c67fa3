use std::path::Path;

use anyhow::Result;

use crate::cli::ConfigCommand;
use crate::config::Config;

pub fn run(path: &Path, cmd: &ConfigCommand) -> Result<()> {
	let mut config = Config::load(path)?;
	apply(&mut config, cmd);
	config.save(path)?;
	println!("Config saved to {}", path.display());
	Ok(())
}

fn apply(config: &mut Config, cmd: &ConfigCommand) {
	match cmd {
		ConfigCommand::SetAddress { address } => config.wallet.address = address.clone(),
		ConfigCommand::Fail { init, login, logout } => {
			if let Some(v) = init {
				config.wallet.fail_init = *v;
			}
			if let Some(v) = login {
				config.wallet.fail_login = *v;
			}
			if let Some(v) = logout {
				config.wallet.fail_logout = *v;
			}
		}
		ConfigCommand::Host { opera, installed } => {
			if let Some(v) = opera {
				config.host.is_opera = *v;
			}
			if let Some(v) = installed {
				config.host.extension_installed = *v;
			}
		}
	}
}

pub fn show_status(path: &Path) -> Result<()> {
	let config = Config::load(path)?;
	let flag = |on: bool| if on { "yes" } else { "no" };

	println!("Host");
	println!("  Opera:      {}", flag(config.host.is_opera));
	println!("  Extension:  {}", flag(config.host.extension_installed));
	println!("Wallet");
	println!("  Address:    {}", config.wallet.address);
	println!(
		"  Failing:    init={} login={} logout={}",
		flag(config.wallet.fail_init),
		flag(config.wallet.fail_login),
		flag(config.wallet.fail_logout)
	);
	Ok(())
}
