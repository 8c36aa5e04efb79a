//! Chain ingestion.
//!
//! A [`ChainProvider`] knows how to read the head of one chain and turn a block into
//! [`StandardTransaction`]s. The [`TransactionFeedService`] drives a provider, by polling or
//! socket notifications, into a [`TransactionFeed`] stream guarded by an [`IngestionCursor`].

mod bitcoin;
mod cursor;
mod error;
mod evm;
mod factory;
mod feed;
mod scheduler;
mod solana;

pub use bitcoin::BitcoinProvider;
pub use cursor::IngestionCursor;
pub use error::ProviderError;
pub use evm::{EvmProvider, EVM_DETAIL_BATCH_SIZE};
pub use factory::{create_provider, AnyChainProvider};
pub use feed::{
	poll_once, process_head, FeedHandle, FeedOptions, TransactionFeed, TransactionFeedService,
};
pub use scheduler::{JobSchedulerTrait, SchedulerResult};
pub use solana::SolanaProvider;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{BlockRef, Chain, StandardTransaction};

/// JSON-RPC subscription announcing new heads
#[derive(Debug, Clone, PartialEq)]
pub struct SocketSubscription {
	/// Subscribe method, e.g. `eth_subscribe`
	pub method: &'static str,
	/// Subscribe parameters
	pub params: Value,
}

/// Per-chain adapter from raw chain data to canonical transactions
#[async_trait]
pub trait ChainProvider: Send + Sync {
	/// Chain served by the provider
	fn chain(&self) -> Chain;

	/// Current head of the chain
	async fn latest_head(&self) -> Result<BlockRef, ProviderError>;

	/// Canonical transactions of the block identified by `head`, in block order
	///
	/// Failures to fetch the block itself are errors. How a failed per-transaction lookup is
	/// reported depends on the chain.
	async fn block_transactions(
		&self,
		head: &BlockRef,
	) -> Result<Vec<StandardTransaction>, ProviderError>;

	/// Subscription used in socket mode, None when the chain only supports polling
	fn socket_subscription(&self) -> Option<SocketSubscription>;

	/// Extracts the new head from a subscription notification
	fn head_from_notification(&self, notification: &Value) -> Option<BlockRef>;
}
