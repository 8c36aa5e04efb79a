//! Bitcoin history through an Esplora index.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
	models::{bitcoin::EsploraTransaction, Chain, StandardTransaction},
	services::{
		blockchain::{EsploraClientTrait, ESPLORA_PAGE_SIZE},
		history::{
			after_reference, chronological, ChainHistoryFetcher, HistoryError, HistoryReference,
			MAX_HISTORY_PAGES,
		},
	},
};

/// Outbound transactions of a Bitcoin address
///
/// A transaction is outbound when one of its inputs spends an output of the address. Its
/// value is what it pays to other addresses, change excluded.
pub struct EsploraHistoryFetcher<C> {
	client: Arc<C>,
}

impl<C: EsploraClientTrait> EsploraHistoryFetcher<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}

	async fn resolve_reference(&self, txid: &str) -> Result<HistoryReference, HistoryError> {
		let transaction = self
			.client
			.get_transaction(txid)
			.await?
			.ok_or_else(|| HistoryError::reference_not_found(txid))?;
		let (height, time) = transaction
			.position()
			.ok_or_else(|| HistoryError::reference_not_found(format!("{} is unconfirmed", txid)))?;
		Ok(HistoryReference::new(txid, height, time))
	}
}

/// Whether a newest-first page reaches back to the reference
fn reaches(page: &[EsploraTransaction], reference: &HistoryReference) -> bool {
	page.iter().any(|tx| {
		tx.txid == reference.hash
			|| tx
				.position()
				.is_some_and(|position| position < (reference.block_number, reference.timestamp))
	})
}

#[async_trait]
impl<C: EsploraClientTrait> ChainHistoryFetcher for EsploraHistoryFetcher<C> {
	fn chain(&self) -> Chain {
		Chain::Bitcoin
	}

	async fn fetch_history(
		&self,
		address: &str,
		from_tx: Option<&str>,
	) -> Result<Vec<StandardTransaction>, HistoryError> {
		let reference = match from_tx {
			Some(txid) => Some(self.resolve_reference(txid).await?),
			None => None,
		};

		let mut raw: Vec<EsploraTransaction> = Vec::new();
		let mut last_seen: Option<String> = None;
		let mut pages = 0;
		loop {
			let page = self
				.client
				.get_address_transactions(address, last_seen.as_deref())
				.await?;
			pages += 1;

			let complete = page.len() < ESPLORA_PAGE_SIZE;
			let reached = reference.as_ref().is_some_and(|r| reaches(&page, r));
			last_seen = page.last().map(|tx| tx.txid.clone());
			raw.extend(page);

			let capped = reference.is_none() && pages >= MAX_HISTORY_PAGES;
			if complete || reached || capped || last_seen.is_none() {
				break;
			}
		}
		tracing::debug!(%address, transactions = raw.len(), pages, "Fetched Bitcoin history");

		let confirmed: Vec<EsploraTransaction> = raw
			.into_iter()
			.filter(|tx| tx.position().is_some())
			.collect();
		let transactions = after_reference(chronological(confirmed, true), reference.as_ref());

		Ok(transactions
			.into_iter()
			.filter(|tx| tx.is_spent_by(address))
			.map(|tx| tx.to_standard_from(address))
			.collect())
	}
}
