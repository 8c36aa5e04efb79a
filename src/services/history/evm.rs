//! Ethereum history through the `alchemy_getAssetTransfers` address index.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
	models::{Chain, StandardTransaction},
	services::{
		blockchain::{BlockChainError, EvmClientTrait, MAX_TRANSFERS_PER_PAGE},
		history::{
			after_reference, chronological, ChainHistoryFetcher, HistoryError, HistoryReference,
			MAX_HISTORY_PAGES,
		},
	},
};

/// Outbound transfers of an Ethereum address
pub struct EvmHistoryFetcher<C> {
	client: Arc<C>,
}

impl<C: EvmClientTrait> EvmHistoryFetcher<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}

	/// Resolves block number and timestamp of `hash`
	async fn resolve_reference(&self, hash: &str) -> Result<HistoryReference, HistoryError> {
		let transaction = self
			.client
			.get_transaction_by_hash(hash)
			.await?
			.ok_or_else(|| HistoryError::reference_not_found(hash))?;
		let Some(block_number) = transaction.block_number.map(|n| n.to::<u64>()) else {
			return Err(HistoryError::reference_not_found(format!("{} is not mined", hash)));
		};

		let block = match self.client.get_block_by_number(block_number).await {
			Ok(block) => block,
			Err(BlockChainError::BlockNotFound(_)) => {
				return Err(HistoryError::reference_not_found(format!(
					"block {} of {}",
					block_number, hash
				)))
			}
			Err(e) => return Err(e.into()),
		};

		Ok(HistoryReference::new(hash, block_number, block.timestamp()))
	}
}

#[async_trait]
impl<C: EvmClientTrait> ChainHistoryFetcher for EvmHistoryFetcher<C> {
	fn chain(&self) -> Chain {
		Chain::Ethereum
	}

	async fn fetch_history(
		&self,
		address: &str,
		from_tx: Option<&str>,
	) -> Result<Vec<StandardTransaction>, HistoryError> {
		let reference = match from_tx {
			Some(hash) => Some(self.resolve_reference(hash).await?),
			None => None,
		};
		let from_block = reference.as_ref().map(|r| r.block_number);

		let mut transfers = Vec::new();
		let mut page_key = None;
		let mut pages = 0;
		loop {
			let page = self
				.client
				.get_asset_transfers(address, from_block, page_key)
				.await?;
			pages += 1;

			let complete = (page.transfers.len() as u64) < MAX_TRANSFERS_PER_PAGE;
			transfers.extend(page.transfers.iter().map(|transfer| transfer.to_standard()));
			page_key = page.page_key;

			let capped = reference.is_none() && pages >= MAX_HISTORY_PAGES;
			if complete || capped || page_key.is_none() {
				break;
			}
		}
		tracing::debug!(%address, transfers = transfers.len(), pages, "Fetched Ethereum transfers");

		// Without a reference the index lists the most recent transfers first
		let newest_first = reference.is_none();
		let transactions =
			after_reference(chronological(transfers, newest_first), reference.as_ref());
		Ok(transactions
			.into_iter()
			.filter(|tx| tx.is_sent_by(address))
			.collect())
	}
}
