//! History dispatch by chain.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
	models::{Chain, StandardTransaction},
	services::{
		blockchain::ClientPoolTrait,
		history::{
			ChainHistoryFetcher, EsploraHistoryFetcher, EvmHistoryFetcher, HistoryError,
			HistoryFetcher, SolanaHistoryFetcher,
		},
	},
};

/// Fetches history of any supported chain with the clients of pool `P`
pub struct HistoryService<P> {
	pool: Arc<P>,
}

impl<P: ClientPoolTrait> HistoryService<P> {
	pub fn new(pool: Arc<P>) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl<P: ClientPoolTrait> HistoryFetcher for HistoryService<P> {
	async fn fetch_history(
		&self,
		chain: Chain,
		address: &str,
		from_tx: Option<&str>,
	) -> Result<Vec<StandardTransaction>, HistoryError> {
		tracing::debug!(%chain, %address, from_tx, "Fetching history");
		let transactions = match chain {
			Chain::Ethereum => {
				EvmHistoryFetcher::new(self.pool.get_evm_client().await?)
					.fetch_history(address, from_tx)
					.await?
			}
			Chain::Bitcoin => {
				EsploraHistoryFetcher::new(self.pool.get_esplora_client().await?)
					.fetch_history(address, from_tx)
					.await?
			}
			Chain::Solana => {
				SolanaHistoryFetcher::new(self.pool.get_solana_client().await?)
					.fetch_history(address, from_tx)
					.await?
			}
		};
		tracing::info!(%chain, %address, transactions = transactions.len(), "History fetched");
		Ok(transactions)
	}
}
