//! Ethereum ingestion.
//!
//! Heads are block numbers. Transaction details are fetched in small concurrent batches, one
//! batch after the other, so that a full block does not trip upstream rate limits.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
	models::{BlockRef, Chain, StandardTransaction},
	services::{
		blockchain::EvmClientTrait,
		provider::{ChainProvider, ProviderError, SocketSubscription},
	},
};

/// Number of transaction lookups in flight at once
pub const EVM_DETAIL_BATCH_SIZE: usize = 2;

/// Provider for Ethereum and compatible chains
pub struct EvmProvider<C> {
	client: Arc<C>,
}

impl<C: EvmClientTrait> EvmProvider<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}
}

#[async_trait]
impl<C: EvmClientTrait> ChainProvider for EvmProvider<C> {
	fn chain(&self) -> Chain {
		Chain::Ethereum
	}

	async fn latest_head(&self) -> Result<BlockRef, ProviderError> {
		Ok(BlockRef::Height(self.client.get_latest_block_number().await?))
	}

	async fn block_transactions(
		&self,
		head: &BlockRef,
	) -> Result<Vec<StandardTransaction>, ProviderError> {
		let BlockRef::Height(number) = head else {
			return Err(ProviderError::processing_error(format!(
				"Ethereum heads are block numbers, got {}",
				head
			)));
		};

		let block = self.client.get_block_by_number(*number).await?;
		let timestamp = block.timestamp();
		tracing::info!(
			block = number,
			transactions = block.transactions.len(),
			"Processing Ethereum block"
		);

		let mut transactions = Vec::with_capacity(block.transactions.len());
		for batch in block.transactions.chunks(EVM_DETAIL_BATCH_SIZE) {
			let results = join_all(
				batch
					.iter()
					.map(|hash| self.client.get_transaction_by_hash(hash)),
			)
			.await;

			for (hash, result) in batch.iter().zip(results) {
				match result {
					Ok(Some(tx)) => transactions.push(tx.to_standard(timestamp)),
					Ok(None) => tracing::warn!(%hash, "Transaction not returned by node, dropping"),
					Err(e) => tracing::warn!(%hash, "Failed to fetch transaction, dropping: {}", e),
				}
			}
		}

		Ok(transactions)
	}

	fn socket_subscription(&self) -> Option<SocketSubscription> {
		Some(SocketSubscription {
			method: "eth_subscribe",
			params: json!(["newHeads"]),
		})
	}

	fn head_from_notification(&self, notification: &Value) -> Option<BlockRef> {
		let number = notification.get("number")?.as_str()?;
		u64::from_str_radix(number.trim_start_matches("0x"), 16)
			.ok()
			.map(BlockRef::Height)
	}
}
