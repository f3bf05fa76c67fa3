use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::injected;
use crate::primitives::{PlainMessage, PlainTransaction};
use crate::provider::{LoginOptions, OperaProvider};

/// What to do once logged in.
pub struct SessionPlan {
	pub token: Option<String>,
	pub message: Option<String>,
	pub txs: Vec<String>,
	pub keep: bool,
}

pub async fn run(path: &Path, plan: &SessionPlan) -> Result<()> {
	let config = Config::load(path)?;
	let txs = parse_txs(&plan.txs)?;
	let provider = OperaProvider::install(injected::from_config(&config));

	if !provider.init().await {
		anyhow::bail!("Opera wallet is not available on this host");
	}
	println!("Initialised.");

	let options = LoginOptions { callback_url: None, token: plan.token.clone() };
	let address = provider.login(options).await?;
	println!("Logged in:   {address}");

	if let Some(message) = &plan.message {
		let signed = provider.sign_message(PlainMessage::new(message.as_bytes())).await?;
		let sig = signed.signature.map(|s| s.to_string()).unwrap_or_default();
		println!("Message sig: {sig}");
	}

	if !txs.is_empty() {
		let signed = provider.sign_transactions(txs).await?;
		for (i, tx) in signed.iter().enumerate() {
			println!("Tx #{i}:       {}", serde_json::to_string(tx)?);
		}
	}

	if plan.keep {
		println!("Still connected as {}", provider.get_address().await?);
	} else {
		provider.logout().await?;
		if provider.is_connected() {
			println!("Logout failed in the wallet; session kept.");
		} else {
			println!("Logged out.");
		}
	}
	Ok(())
}

fn parse_txs(raw: &[String]) -> Result<Vec<PlainTransaction>> {
	raw.iter()
		.enumerate()
		.map(|(i, s)| {
			let payload = serde_json::from_str(s).with_context(|| format!("tx #{i} is not valid JSON"))?;
			Ok(PlainTransaction::new(payload))
		})
		.collect()
}
