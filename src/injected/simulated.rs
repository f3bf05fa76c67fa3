use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{bail, Result};
use sha2::{Digest, Sha256};

use crate::config::WalletConfig;
use crate::primitives::{Address, PlainMessage, PlainTransaction, SignableMessage, Signature, Transaction};

/// An in-process stand-in for the Opera wallet extension.
///
/// It holds no keys.  The "signature" it applies is the SHA-256 of the
/// signer address followed by the payload, hex-encoded, which is enough to
/// tell signed values apart in demos and tests.
pub struct SimulatedExtension {
	wallet: WalletConfig,
	initialized: AtomicBool,
	address: Mutex<Option<String>>,
	calls: AtomicUsize,
	last_batch: Mutex<Option<usize>>,
}

impl SimulatedExtension {
	pub fn new(wallet: WalletConfig) -> Self {
		Self {
			wallet,
			initialized: AtomicBool::new(false),
			address: Mutex::new(None),
			calls: AtomicUsize::new(0),
			last_batch: Mutex::new(None),
		}
	}

	/// Number of async delegate calls received so far.
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Size of the most recent `sign_transactions` batch.
	pub fn last_batch(&self) -> Option<usize> {
		*lock(&self.last_batch)
	}

	fn touch(&self) {
		self.calls.fetch_add(1, Ordering::SeqCst);
	}

	fn signer(&self) -> Result<Address> {
		match lock(&self.address).as_deref() {
			Some(a) => Ok(Address::new(a)),
			None => bail!("no account selected in the wallet"),
		}
	}
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
	m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn stand_in_signature(signer: &Address, payload: &[u8]) -> Signature {
	let mut h = Sha256::new();
	h.update(signer.bech32().as_bytes());
	h.update(payload);
	Signature::new(hex::encode(h.finalize()))
}

#[async_trait::async_trait]
impl super::InjectedProvider for SimulatedExtension {
	type Transaction = PlainTransaction;
	type Message = PlainMessage;

	async fn init(&self) -> Result<bool> {
		self.touch();
		if self.wallet.fail_init {
			bail!("extension failed to initialise");
		}
		self.initialized.store(true, Ordering::SeqCst);
		Ok(true)
	}

	async fn login(&self, _token: Option<&str>) -> Result<String> {
		self.touch();
		if self.wallet.fail_login {
			bail!("user rejected the login request");
		}
		*lock(&self.address) = Some(self.wallet.address.clone());
		Ok(self.wallet.address.clone())
	}

	async fn logout(&self) -> Result<bool> {
		self.touch();
		if self.wallet.fail_logout {
			bail!("extension did not respond to logout");
		}
		*lock(&self.address) = None;
		Ok(true)
	}

	async fn get_address(&self) -> Result<String> {
		self.touch();
		Ok(lock(&self.address).clone().unwrap_or_default())
	}

	fn is_initialized(&self) -> bool {
		self.initialized.load(Ordering::SeqCst)
	}

	fn is_connected(&self) -> bool {
		lock(&self.address).is_some()
	}

	async fn sign_transaction(&self, mut tx: PlainTransaction) -> Result<PlainTransaction> {
		self.touch();
		let signer = self.signer()?;
		let payload = serde_json::to_vec(&tx.to_plain_object())?;
		tx.apply_signature(stand_in_signature(&signer, &payload), signer);
		Ok(tx)
	}

	async fn sign_transactions(&self, txs: Vec<PlainTransaction>) -> Result<Vec<PlainTransaction>> {
		self.touch();
		*lock(&self.last_batch) = Some(txs.len());
		let signer = self.signer()?;
		txs.into_iter()
			.map(|mut tx| -> Result<PlainTransaction> {
				let payload = serde_json::to_vec(&tx.to_plain_object())?;
				tx.apply_signature(stand_in_signature(&signer, &payload), signer.clone());
				Ok(tx)
			})
			.collect()
	}

	async fn sign_message(&self, mut message: PlainMessage) -> Result<PlainMessage> {
		self.touch();
		let signer = self.signer()?;
		let sig = stand_in_signature(&signer, message.message());
		message.apply_signature(sig, signer);
		Ok(message)
	}
}
