pub mod simulated;

use anyhow::Result;

use crate::config::Config;
use crate::primitives::{self, SignableMessage};

/// The wallet object a browser extension injects into the page.  Key
/// custody and signing happen entirely on its side; callers only see
/// addresses and signed values come back.
#[async_trait::async_trait]
pub trait InjectedProvider: Send + Sync {
	type Transaction: primitives::Transaction + 'static;
	type Message: SignableMessage + 'static;

	async fn init(&self) -> Result<bool>;

	/// Authenticate the user, optionally binding a login token, and return
	/// the bech32 address of the selected account.
	async fn login(&self, token: Option<&str>) -> Result<String>;

	async fn logout(&self) -> Result<bool>;

	async fn get_address(&self) -> Result<String>;

	fn is_initialized(&self) -> bool;

	fn is_connected(&self) -> bool;

	async fn sign_transaction(&self, tx: Self::Transaction) -> Result<Self::Transaction>;

	async fn sign_transactions(&self, txs: Vec<Self::Transaction>) -> Result<Vec<Self::Transaction>>;

	async fn sign_message(&self, message: Self::Message) -> Result<Self::Message>;
}

/// What the hosting page exposes: the browser marker and, when the
/// extension is installed, its provider handle.
pub struct HostEnvironment<P> {
	pub is_opera: bool,
	pub provider: Option<P>,
}

impl<P: InjectedProvider> HostEnvironment<P> {
	/// An Opera host with the given extension handle attached.
	pub fn opera(provider: P) -> Self {
		Self { is_opera: true, provider: Some(provider) }
	}

	/// A host without the extension (or not Opera at all).
	pub fn detached() -> Self {
		Self { is_opera: false, provider: None }
	}

	/// The provider handle, but only when the host is actually Opera.
	pub fn provider(&self) -> Option<&P> {
		if self.is_opera {
			self.provider.as_ref()
		} else {
			None
		}
	}
}

/// Build the simulated host described by the config file.
pub fn from_config(config: &Config) -> HostEnvironment<simulated::SimulatedExtension> {
	let provider = config
		.host
		.extension_installed
		.then(|| simulated::SimulatedExtension::new(config.wallet.clone()));
	HostEnvironment { is_opera: config.host.is_opera, provider }
}
