//! Bitcoin ingestion.
//!
//! Heads are block hashes, so a new head is any hash different from the last one. A
//! transaction whose details cannot be fetched is still reported, in degraded form.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::{
	models::{bitcoin::degraded_transaction, BlockRef, Chain, StandardTransaction},
	services::{
		blockchain::BitcoinClientTrait,
		provider::{ChainProvider, ProviderError, SocketSubscription},
	},
};

/// Provider for Bitcoin Core nodes, polling only
pub struct BitcoinProvider<C> {
	client: Arc<C>,
}

impl<C: BitcoinClientTrait> BitcoinProvider<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}
}

#[async_trait]
impl<C: BitcoinClientTrait> ChainProvider for BitcoinProvider<C> {
	fn chain(&self) -> Chain {
		Chain::Bitcoin
	}

	async fn latest_head(&self) -> Result<BlockRef, ProviderError> {
		Ok(BlockRef::Hash(self.client.get_best_block_hash().await?))
	}

	async fn block_transactions(
		&self,
		head: &BlockRef,
	) -> Result<Vec<StandardTransaction>, ProviderError> {
		let BlockRef::Hash(hash) = head else {
			return Err(ProviderError::processing_error(format!(
				"Bitcoin heads are block hashes, got {}",
				head
			)));
		};

		let block = self.client.get_block(hash).await?;
		let timestamp = if block.time > 0 {
			block.time
		} else {
			chrono::Utc::now().timestamp().max(0) as u64
		};
		tracing::info!(
			height = block.height,
			transactions = block.tx.len(),
			"Processing Bitcoin block"
		);

		let mut transactions = Vec::with_capacity(block.tx.len());
		for txid in &block.tx {
			match self.client.get_raw_transaction(txid).await {
				Ok(tx) => transactions.push(tx.to_standard(block.height, timestamp)),
				Err(e) => {
					tracing::warn!(%txid, "Limited data for transaction: {}", e);
					transactions.push(degraded_transaction(txid, block.height, timestamp));
				}
			}
		}

		Ok(transactions)
	}

	fn socket_subscription(&self) -> Option<SocketSubscription> {
		None
	}

	fn head_from_notification(&self, _notification: &Value) -> Option<BlockRef> {
		None
	}
}
