pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod injected;
pub mod primitives;
pub mod provider;

pub use error::{ProviderError, Result};
pub use provider::{Account, LoginOptions, OperaProvider};
