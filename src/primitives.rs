use std::fmt;

use serde::{Deserialize, Serialize};

// -- Value wrappers --

/// A bech32 account address.  Opaque: the string is kept exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// The address in its bech32 form.
	pub fn bech32(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A hex-encoded signature produced by the wallet.  Opaque, like [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn hex(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

// -- Signable values --

/// Anything the wallet can sign as a transaction.  The adapter never looks
/// inside; it only hands values to the injected provider and back.
pub trait Transaction: Send + Sync {
	/// Plain JSON view of the transaction, as shown to the wallet.
	fn to_plain_object(&self) -> serde_json::Value;

	fn apply_signature(&mut self, signature: Signature, signed_by: Address);
}

/// An arbitrary message the wallet can sign.
pub trait SignableMessage: Send + Sync {
	fn message(&self) -> &[u8];

	fn apply_signature(&mut self, signature: Signature, signed_by: Address);
}

/// A transaction carried as its plain JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainTransaction {
	pub payload: serde_json::Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub signature: Option<Signature>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub signer: Option<Address>,
}

impl PlainTransaction {
	pub fn new(payload: serde_json::Value) -> Self {
		Self { payload, signature: None, signer: None }
	}

	pub fn is_signed(&self) -> bool {
		self.signature.is_some()
	}
}

impl Transaction for PlainTransaction {
	fn to_plain_object(&self) -> serde_json::Value {
		self.payload.clone()
	}

	fn apply_signature(&mut self, signature: Signature, signed_by: Address) {
		self.signature = Some(signature);
		self.signer = Some(signed_by);
	}
}

/// A raw message plus the signature applied to it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainMessage {
	pub message: Vec<u8>,
	pub signature: Option<Signature>,
	pub signer: Option<Address>,
}

impl PlainMessage {
	pub fn new(message: impl Into<Vec<u8>>) -> Self {
		Self { message: message.into(), signature: None, signer: None }
	}
}

impl SignableMessage for PlainMessage {
	fn message(&self) -> &[u8] {
		&self.message
	}

	fn apply_signature(&mut self, signature: Signature, signed_by: Address) {
		self.signature = Some(signature);
		self.signer = Some(signed_by);
	}
}
