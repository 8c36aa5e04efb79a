//! Solana ingestion.
//!
//! Heads are slots. Skipped slots have no block and produce no transactions.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
	models::{BlockRef, Chain, StandardTransaction},
	services::{
		blockchain::SolanaClientTrait,
		provider::{ChainProvider, ProviderError, SocketSubscription},
	},
};

/// Provider for Solana RPC nodes
pub struct SolanaProvider<C> {
	client: Arc<C>,
}

impl<C: SolanaClientTrait> SolanaProvider<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}
}

#[async_trait]
impl<C: SolanaClientTrait> ChainProvider for SolanaProvider<C> {
	fn chain(&self) -> Chain {
		Chain::Solana
	}

	async fn latest_head(&self) -> Result<BlockRef, ProviderError> {
		Ok(BlockRef::Height(self.client.get_slot().await?))
	}

	async fn block_transactions(
		&self,
		head: &BlockRef,
	) -> Result<Vec<StandardTransaction>, ProviderError> {
		let BlockRef::Height(slot) = head else {
			return Err(ProviderError::processing_error(format!(
				"Solana heads are slots, got {}",
				head
			)));
		};

		let Some(block) = self.client.get_block(*slot).await? else {
			tracing::warn!(slot, "No block produced in slot");
			return Ok(Vec::new());
		};
		let timestamp = block
			.block_time
			.unwrap_or_else(|| chrono::Utc::now().timestamp())
			.max(0) as u64;
		tracing::info!(
			slot,
			transactions = block.transactions.len(),
			"Processing Solana block"
		);

		let transactions = block
			.transactions
			.iter()
			.filter_map(|tx| {
				let standard = tx.to_standard(*slot, timestamp);
				if standard.is_none() {
					tracing::warn!(slot, "Skipping transaction with missing data");
				}
				standard
			})
			.collect();

		Ok(transactions)
	}

	fn socket_subscription(&self) -> Option<SocketSubscription> {
		Some(SocketSubscription {
			method: "slotSubscribe",
			params: json!([]),
		})
	}

	fn head_from_notification(&self, notification: &Value) -> Option<BlockRef> {
		notification
			.get("slot")
			.and_then(Value::as_u64)
			.map(BlockRef::Height)
	}
}
