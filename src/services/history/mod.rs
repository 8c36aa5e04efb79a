//! Address history after a reference transaction.
//!
//! Every source returns the outbound transactions of an address in chronological order,
//! strictly after the reference transaction when one is given. The reference is excluded by
//! position when the source returns it, and by (block, timestamp) otherwise.

mod bitcoin;
mod error;
mod evm;
mod service;
mod solana;
mod window;

pub use bitcoin::EsploraHistoryFetcher;
pub use error::HistoryError;
pub use evm::EvmHistoryFetcher;
pub use service::HistoryService;
pub use solana::SolanaHistoryFetcher;
pub use window::{
	after_reference, chronological, HistoryEntry, HistoryReference, MAX_HISTORY_PAGES,
};

use async_trait::async_trait;

use crate::models::{Chain, StandardTransaction};

/// History source of a single chain
#[async_trait]
pub trait ChainHistoryFetcher: Send + Sync {
	/// Chain served by the source
	fn chain(&self) -> Chain;

	/// Outbound transactions of `address` after `from_tx`, oldest first
	///
	/// # Errors
	/// * `ReferenceNotFound` - `from_tx` cannot be resolved
	async fn fetch_history(
		&self,
		address: &str,
		from_tx: Option<&str>,
	) -> Result<Vec<StandardTransaction>, HistoryError>;
}

/// History of any supported chain
#[async_trait]
pub trait HistoryFetcher: Send + Sync {
	/// Outbound transactions of `address` on `chain` after `from_tx`, oldest first
	async fn fetch_history(
		&self,
		chain: Chain,
		address: &str,
		from_tx: Option<&str>,
	) -> Result<Vec<StandardTransaction>, HistoryError>;
}
