use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const SAMPLE_ADDRESS: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub host: HostConfig,
	#[serde(default)]
	pub wallet: WalletConfig,
}

/// How the simulated page looks to the adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
	pub is_opera: bool,
	pub extension_installed: bool,
}

/// Behaviour of the simulated wallet extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
	pub address: String,
	#[serde(default)]
	pub fail_init: bool,
	#[serde(default)]
	pub fail_login: bool,
	#[serde(default)]
	pub fail_logout: bool,
}

impl Default for HostConfig {
	fn default() -> Self {
		Self { is_opera: true, extension_installed: true }
	}
}

impl Default for WalletConfig {
	fn default() -> Self {
		Self {
			address: SAMPLE_ADDRESS.into(),
			fail_init: false,
			fail_login: false,
			fail_logout: false,
		}
	}
}

impl Config {
	/// Directory where CLI state is stored (~/.opera-provider/).
	pub fn dir() -> anyhow::Result<PathBuf> {
		let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not determine home directory"))?;
		Ok(home.join(".opera-provider"))
	}

	/// Path to the default config file.
	pub fn default_path() -> anyhow::Result<PathBuf> {
		Ok(Self::dir()?.join("config.toml"))
	}

	/// Load config from `path`, falling back to defaults if no file exists.
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		if path.exists() {
			let content = std::fs::read_to_string(path)?;
			Ok(toml::from_str(&content)?)
		} else {
			Ok(Self::default())
		}
	}

	/// Persist the config, creating the parent directory if needed.
	pub fn save(&self, path: &Path) -> anyhow::Result<()> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, toml::to_string_pretty(self)?)?;
		Ok(())
	}
}
