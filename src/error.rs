/// Failures surfaced by [`OperaProvider`](crate::provider::OperaProvider).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
	/// An operation needing an initialised provider ran before `init()`.
	#[error("Opera provider is not initialised, call init() first")]
	NotInitialized,

	/// Signing was attempted while no account is logged in.
	#[error("account is not connected; call login() first")]
	NotConnected,

	/// Signing one transaction through the batch call did not yield exactly
	/// one signed transaction.
	#[error("cannot sign single transaction")]
	CannotSignSingleTransaction,

	/// Whatever the injected provider reported, passed through as-is.
	#[error(transparent)]
	Delegate(#[from] anyhow::Error),
}

pub type Result<T, E = ProviderError> = std::result::Result<T, E>;
