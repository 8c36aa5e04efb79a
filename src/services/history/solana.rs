//! Solana history through `getSignaturesForAddress`.

use async_trait::async_trait;
use futures::{stream, StreamExt};
use std::sync::Arc;

use crate::{
	models::{solana::SolanaSignatureInfo, Chain, StandardTransaction},
	services::{
		blockchain::{SolanaClientTrait, MAX_SIGNATURES_PER_PAGE},
		history::{
			after_reference, chronological, ChainHistoryFetcher, HistoryError, HistoryReference,
			MAX_HISTORY_PAGES,
		},
	},
};

/// Number of `getTransaction` calls in flight at once
const DETAIL_CONCURRENCY: usize = 4;

/// Transactions signed by a Solana account
pub struct SolanaHistoryFetcher<C> {
	client: Arc<C>,
}

impl<C: SolanaClientTrait + 'static> SolanaHistoryFetcher<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}

	async fn resolve_reference(&self, signature: &str) -> Result<HistoryReference, HistoryError> {
		let transaction = self
			.client
			.get_transaction(signature)
			.await?
			.ok_or_else(|| HistoryError::reference_not_found(signature))?;
		Ok(HistoryReference::new(
			signature,
			transaction.slot,
			transaction.timestamp(),
		))
	}

	async fn signatures(
		&self,
		address: &str,
		reference: Option<&HistoryReference>,
	) -> Result<Vec<SolanaSignatureInfo>, HistoryError> {
		let mut signatures = Vec::new();
		let mut before: Option<String> = None;
		let mut pages = 0;
		loop {
			let page = self
				.client
				.get_signatures_for_address(address, before.take(), MAX_SIGNATURES_PER_PAGE)
				.await?;
			pages += 1;

			let complete = page.len() < MAX_SIGNATURES_PER_PAGE;
			let reached = reference.is_some_and(|r| {
				page.iter()
					.any(|info| info.signature == r.hash || info.slot < r.block_number)
			});
			before = page.last().map(|info| info.signature.clone());
			signatures.extend(page);

			let capped = reference.is_none() && pages >= MAX_HISTORY_PAGES;
			if complete || reached || capped || before.is_none() {
				break;
			}
		}
		Ok(signatures)
	}
}

#[async_trait]
impl<C: SolanaClientTrait + 'static> ChainHistoryFetcher for SolanaHistoryFetcher<C> {
	fn chain(&self) -> Chain {
		Chain::Solana
	}

	async fn fetch_history(
		&self,
		address: &str,
		from_tx: Option<&str>,
	) -> Result<Vec<StandardTransaction>, HistoryError> {
		let reference = match from_tx {
			Some(signature) => Some(self.resolve_reference(signature).await?),
			None => None,
		};

		let signatures = self.signatures(address, reference.as_ref()).await?;
		let pending = after_reference(chronological(signatures, true), reference.as_ref());
		tracing::debug!(%address, signatures = pending.len(), "Fetching Solana transactions");

		let details: Vec<_> = stream::iter(pending)
			.map(|info| {
				let client = self.client.clone();
				async move {
					let result = client.get_transaction(&info.signature).await;
					(info.signature, result)
				}
			})
			.buffered(DETAIL_CONCURRENCY)
			.collect()
			.await;

		let mut transactions = Vec::with_capacity(details.len());
		for (signature, result) in details {
			let Some(transaction) = result? else {
				tracing::warn!(%signature, "Transaction not returned by node, skipping");
				continue;
			};
			if !transaction.is_signed_by(address) {
				continue;
			}
			match transaction.to_standard() {
				Some(standard) => transactions.push(standard),
				None => tracing::warn!(%signature, "Skipping transaction with missing data"),
			}
		}
		Ok(transactions)
	}
}
