//! The session adapter around the injected Opera wallet.
//!
//! [`OperaProvider`] owns the one session record for the page and forwards
//! every operation to the extension's provider handle, checking the
//! initialised/connected preconditions first.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ProviderError, Result};
use crate::injected::{HostEnvironment, InjectedProvider};

/// The logged-in account as seen by the adapter.  An empty `address`
/// means nobody is logged in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	pub address: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub signature: Option<String>,
}

/// Options accepted by [`OperaProvider::login`].
#[derive(Debug, Clone, Default)]
pub struct LoginOptions {
	/// Accepted for parity with redirect-based providers; the extension
	/// never redirects, so it is ignored.
	pub callback_url: Option<String>,
	/// Token the wallet binds into its login signature.
	pub token: Option<String>,
}

impl LoginOptions {
	pub fn with_token(token: impl Into<String>) -> Self {
		Self { callback_url: None, token: Some(token.into()) }
	}
}

#[derive(Debug, Default)]
struct Session {
	account: Account,
	initialized: bool,
}

/// Adapter exposing the injected wallet through a single session.
///
/// Only one instance exists per host: it is created by [`install`](Self::install)
/// and shared through the returned `Arc`.  The session lock is never held
/// while waiting on the extension, so concurrent `login` calls race and the
/// last one to finish wins.
pub struct OperaProvider<P> {
	host: HostEnvironment<P>,
	session: RwLock<Session>,
}

impl<P: InjectedProvider> OperaProvider<P> {
	/// Create the adapter for this host.  Starts uninitialised and logged out.
	///
	/// The host calls this exactly once and shares the returned `Arc`.  It
	/// takes the [`HostEnvironment`] by value, and that type is not `Clone`,
	/// so one extension handle never ends up behind two sessions.
	pub fn install(host: HostEnvironment<P>) -> Arc<Self> {
		Arc::new(Self { host, session: RwLock::new(Session::default()) })
	}

	fn read(&self) -> RwLockReadGuard<'_, Session> {
		self.session.read().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	fn write(&self) -> RwLockWriteGuard<'_, Session> {
		self.session.write().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Overwrite the session address without going through `login`.
	pub fn set_address(&self, address: impl Into<String>) -> &Self {
		self.write().account.address = address.into();
		self
	}

	/// Initialise the extension if the host is Opera with the wallet
	/// injected.  Extension failures are logged and reported as `false`.
	pub async fn init(&self) -> bool {
		let Some(provider) = self.host.provider() else {
			debug!("no Opera wallet extension on this host");
			return self.is_initialized();
		};
		if self.is_initialized() {
			return true;
		}

		let initialized = match provider.init().await {
			Ok(initialized) => initialized,
			Err(err) => {
				warn!(%err, "Opera wallet init failed");
				false
			}
		};
		self.write().initialized = initialized;
		initialized
	}

	/// Log in through the extension and remember the returned address.
	pub async fn login(&self, options: LoginOptions) -> Result<String> {
		let provider = self.initialized_provider()?;
		debug!(has_token = options.token.is_some(), "Opera login");

		let address = provider.login(options.token.as_deref()).await?;
		self.write().account.address = address.clone();
		Ok(address)
	}

	/// Log out through the extension.  Always reports `true` once
	/// initialised; if the extension fails, the failure is logged and the
	/// local session is left as it was.
	pub async fn logout(&self) -> Result<bool> {
		let provider = self.initialized_provider()?;

		match provider.logout().await {
			Ok(_) => self.disconnect(),
			Err(err) => warn!(%err, "Opera logout operation failed"),
		}
		Ok(true)
	}

	fn disconnect(&self) {
		self.write().account = Account::default();
	}

	pub async fn get_address(&self) -> Result<String> {
		if !self.is_initialized() {
			return Err(ProviderError::NotInitialized);
		}
		Ok(self.read().account.address.clone())
	}

	pub fn is_initialized(&self) -> bool {
		self.read().initialized
	}

	pub fn is_connected(&self) -> bool {
		!self.read().account.address.is_empty()
	}

	/// Snapshot of the current account record.
	pub fn account(&self) -> Account {
		self.read().account.clone()
	}

	/// Sign one transaction by way of the batch call, which must hand back
	/// exactly one transaction.
	pub async fn sign_transaction(&self, tx: P::Transaction) -> Result<P::Transaction> {
		let signed = self.sign_transactions(vec![tx]).await?;
		let [tx]: [P::Transaction; 1] =
			signed.try_into().map_err(|_| ProviderError::CannotSignSingleTransaction)?;
		Ok(tx)
	}

	/// Forward a batch to the extension untouched.  Batch size is the
	/// extension's concern; an empty batch is passed through as well.
	pub async fn sign_transactions(&self, txs: Vec<P::Transaction>) -> Result<Vec<P::Transaction>> {
		let provider = self.connected_provider()?;
		debug!(count = txs.len(), "Opera sign transactions");
		Ok(provider.sign_transactions(txs).await?)
	}

	pub async fn sign_message(&self, message: P::Message) -> Result<P::Message> {
		let provider = self.connected_provider()?;
		debug!("Opera sign message");
		Ok(provider.sign_message(message).await?)
	}

	/// The extension has no way to cancel a pending prompt.
	pub fn cancel_action(&self) -> bool {
		false
	}

	fn initialized_provider(&self) -> Result<&P> {
		if !self.is_initialized() {
			return Err(ProviderError::NotInitialized);
		}
		self.host.provider().ok_or(ProviderError::NotInitialized)
	}

	fn connected_provider(&self) -> Result<&P> {
		if !self.is_connected() {
			return Err(ProviderError::NotConnected);
		}
		// Only init looks at the Opera marker.  An address seeded with
		// `set_address` on a host without any handle has nothing to call.
		self.host
			.provider
			.as_ref()
			.ok_or_else(|| ProviderError::Delegate(anyhow::anyhow!("Opera wallet extension is not available")))
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Mutex;

	use anyhow::bail;
	use tokio::sync::Notify;

	use super::*;
	use crate::primitives::{PlainMessage, PlainTransaction};

	/// Extension double whose answers are fixed up front.
	#[derive(Default)]
	struct Scripted {
		init: Option<bool>,
		login: Option<String>,
		logout_fails: bool,
		/// How many copies of the first transaction to return when signing.
		echo: Option<usize>,
		/// Return `<login>-<token>` so concurrent logins are told apart.
		suffix_token: bool,
		/// Holds a "slow" login until another login reaches the wallet.
		gate: Notify,
		batches: Mutex<Vec<usize>>,
		calls: AtomicUsize,
	}

	#[async_trait::async_trait]
	impl InjectedProvider for Scripted {
		type Transaction = PlainTransaction;
		type Message = PlainMessage;

		async fn init(&self) -> anyhow::Result<bool> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			match self.init {
				Some(ok) => Ok(ok),
				None => bail!("init blew up"),
			}
		}

		async fn login(&self, token: Option<&str>) -> anyhow::Result<String> {
			match token {
				Some("slow") => self.gate.notified().await,
				Some(_) => self.gate.notify_one(),
				None => {}
			}
			match (&self.login, token) {
				(Some(a), Some(t)) if self.suffix_token => Ok(format!("{a}-{t}")),
				(Some(a), _) => Ok(a.clone()),
				(None, _) => bail!("login rejected"),
			}
		}

		async fn logout(&self) -> anyhow::Result<bool> {
			if self.logout_fails {
				bail!("logout failed");
			}
			Ok(true)
		}

		async fn get_address(&self) -> anyhow::Result<String> {
			Ok(self.login.clone().unwrap_or_default())
		}

		fn is_initialized(&self) -> bool {
			self.init == Some(true)
		}

		fn is_connected(&self) -> bool {
			false
		}

		async fn sign_transaction(&self, tx: PlainTransaction) -> anyhow::Result<PlainTransaction> {
			Ok(tx)
		}

		async fn sign_transactions(&self, txs: Vec<PlainTransaction>) -> anyhow::Result<Vec<PlainTransaction>> {
			self.batches.lock().unwrap().push(txs.len());
			match (self.echo, txs.first()) {
				(Some(n), Some(first)) => Ok(vec![first.clone(); n]),
				_ => Ok(txs),
			}
		}

		async fn sign_message(&self, message: PlainMessage) -> anyhow::Result<PlainMessage> {
			bail!("message signing refused: {} bytes", message.message.len())
		}
	}

	fn ready(login: &str) -> Scripted {
		Scripted { init: Some(true), login: Some(login.into()), ..Scripted::default() }
	}

	fn tx() -> PlainTransaction {
		PlainTransaction::new(serde_json::json!({ "nonce": 1 }))
	}

	#[tokio::test]
	async fn init_without_opera_marker_stays_uninitialised() {
		let host = HostEnvironment { is_opera: false, provider: Some(ready("erd1abc")) };
		let provider = OperaProvider::install(host);
		assert!(!provider.init().await);
		assert!(!provider.is_initialized());

		let provider = OperaProvider::<Scripted>::install(HostEnvironment::detached());
		assert!(!provider.init().await);
	}

	#[tokio::test]
	async fn init_is_idempotent() {
		let provider = OperaProvider::install(HostEnvironment::opera(ready("erd1abc")));
		assert!(provider.init().await);
		assert!(provider.init().await);
		assert_eq!(provider.host.provider().unwrap().calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn init_failure_is_swallowed() {
		let provider = OperaProvider::install(HostEnvironment::opera(Scripted::default()));
		assert!(!provider.init().await);
		assert!(!provider.is_initialized());

		let refused = Scripted { init: Some(false), ..Scripted::default() };
		let provider = OperaProvider::install(HostEnvironment::opera(refused));
		assert!(!provider.init().await);
	}

	#[tokio::test]
	async fn session_calls_require_init() {
		let provider = OperaProvider::install(HostEnvironment::opera(ready("erd1abc")));
		assert!(matches!(provider.login(LoginOptions::default()).await, Err(ProviderError::NotInitialized)));
		assert!(matches!(provider.logout().await, Err(ProviderError::NotInitialized)));
		assert!(matches!(provider.get_address().await, Err(ProviderError::NotInitialized)));
	}

	#[tokio::test]
	async fn login_then_logout() {
		let provider = OperaProvider::install(HostEnvironment::opera(ready("erd1abc")));
		provider.init().await;

		let address = provider.login(LoginOptions::with_token("tok")).await.unwrap();
		assert_eq!(address, "erd1abc");
		assert!(provider.is_connected());
		assert_eq!(provider.get_address().await.unwrap(), "erd1abc");
		assert_eq!(provider.account().address, "erd1abc");

		assert!(provider.logout().await.unwrap());
		assert!(!provider.is_connected());
		assert_eq!(provider.get_address().await.unwrap(), "");
		assert_eq!(provider.account(), Account::default());
	}

	#[tokio::test]
	async fn login_failure_propagates_unchanged() {
		let scripted = Scripted { init: Some(true), ..Scripted::default() };
		let provider = OperaProvider::install(HostEnvironment::opera(scripted));
		provider.init().await;

		let err = provider.login(LoginOptions::default()).await.unwrap_err();
		assert!(matches!(err, ProviderError::Delegate(_)));
		assert_eq!(err.to_string(), "login rejected");
		assert!(!provider.is_connected());
	}

	#[tokio::test]
	async fn failed_logout_reports_success_but_keeps_session() {
		let scripted = Scripted { logout_fails: true, ..ready("erd1abc") };
		let provider = OperaProvider::install(HostEnvironment::opera(scripted));
		provider.init().await;
		provider.login(LoginOptions::default()).await.unwrap();

		assert!(provider.logout().await.unwrap());
		assert!(provider.is_connected());
		assert_eq!(provider.get_address().await.unwrap(), "erd1abc");
	}

	#[tokio::test]
	async fn signing_requires_connection() {
		let provider = OperaProvider::install(HostEnvironment::opera(ready("erd1abc")));
		assert!(matches!(provider.sign_transactions(vec![tx()]).await, Err(ProviderError::NotConnected)));
		assert!(matches!(provider.sign_message(PlainMessage::new("m")).await, Err(ProviderError::NotConnected)));

		provider.init().await;
		assert!(matches!(provider.sign_transaction(tx()).await, Err(ProviderError::NotConnected)));
	}

	#[tokio::test]
	async fn set_address_connects_without_init() {
		let provider = OperaProvider::install(HostEnvironment::opera(ready("erd1abc")));
		assert!(provider.set_address("erd1seeded").is_connected());
		assert!(!provider.is_initialized());

		let signed = provider.sign_transactions(vec![tx(), tx()]).await.unwrap();
		assert_eq!(signed.len(), 2);
	}

	#[tokio::test]
	async fn signing_ignores_opera_marker() {
		let host = HostEnvironment { is_opera: false, provider: Some(ready("erd1abc")) };
		let provider = OperaProvider::install(host);
		provider.set_address("erd1seeded");

		let signed = provider.sign_transactions(vec![tx()]).await.unwrap();
		assert_eq!(signed, vec![tx()]);
		assert_eq!(*provider.host.provider.as_ref().unwrap().batches.lock().unwrap(), vec![1]);

		let err = provider.sign_message(PlainMessage::new("m")).await.unwrap_err();
		assert_eq!(err.to_string(), "message signing refused: 1 bytes");
	}

	#[tokio::test]
	async fn racing_logins_last_to_finish_wins() {
		let scripted = Scripted { suffix_token: true, ..ready("erd1abc") };
		let provider = OperaProvider::install(HostEnvironment::opera(scripted));
		provider.init().await;

		let (slow, fast) = tokio::join!(
			provider.login(LoginOptions::with_token("slow")),
			provider.login(LoginOptions::with_token("fast")),
		);
		assert_eq!(fast.unwrap(), "erd1abc-fast");
		assert_eq!(slow.unwrap(), "erd1abc-slow");
		// The slow login resolved after the fast one and overwrote it.
		assert_eq!(provider.get_address().await.unwrap(), "erd1abc-slow");
	}

	#[tokio::test]
	async fn set_address_on_detached_host_cannot_delegate() {
		let provider = OperaProvider::<Scripted>::install(HostEnvironment::detached());
		provider.set_address("erd1seeded");
		let err = provider.sign_transactions(vec![tx()]).await.unwrap_err();
		assert!(matches!(err, ProviderError::Delegate(_)));
	}

	#[tokio::test]
	async fn single_sign_needs_exactly_one_result() {
		for (echo, ok) in [(Some(0), false), (Some(1), true), (Some(2), false), (Some(3), false), (None, true)] {
			let scripted = Scripted { echo, ..ready("erd1abc") };
			let provider = OperaProvider::install(HostEnvironment::opera(scripted));
			provider.set_address("erd1abc");

			let result = provider.sign_transaction(tx()).await;
			if ok {
				assert_eq!(result.unwrap(), tx());
			} else {
				assert!(matches!(result, Err(ProviderError::CannotSignSingleTransaction)), "echo {echo:?}");
			}
			assert_eq!(*provider.host.provider().unwrap().batches.lock().unwrap(), vec![1]);
		}
	}

	#[tokio::test]
	async fn empty_batch_is_forwarded() {
		let provider = OperaProvider::install(HostEnvironment::opera(ready("erd1abc")));
		provider.set_address("erd1abc");
		let signed = provider.sign_transactions(Vec::new()).await.unwrap();
		assert!(signed.is_empty());
		assert_eq!(*provider.host.provider().unwrap().batches.lock().unwrap(), vec![0]);
	}

	#[tokio::test]
	async fn message_signing_errors_propagate() {
		let provider = OperaProvider::install(HostEnvironment::opera(ready("erd1abc")));
		provider.set_address("erd1abc");
		let err = provider.sign_message(PlainMessage::new("abc")).await.unwrap_err();
		assert_eq!(err.to_string(), "message signing refused: 3 bytes");
	}

	#[test]
	fn cancel_action_is_a_no_op() {
		let provider = OperaProvider::<Scripted>::install(HostEnvironment::detached());
		assert!(!provider.cancel_action());
		assert!(!provider.cancel_action());
	}
}
