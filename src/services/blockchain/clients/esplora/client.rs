//! Esplora REST client used for Bitcoin address history.
//!
//! Bitcoin Core keeps no address index, so outbound history is read from an Esplora compatible
//! API (`/tx/{txid}` and `/address/{address}/txs/chain`).

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
	models::bitcoin::EsploraTransaction,
	services::blockchain::{BlockChainError, TransientErrorRetryStrategy},
	utils::http::{create_retryable_http_client, HttpRetryConfig},
};

/// Number of transactions Esplora returns per confirmed history page
pub const ESPLORA_PAGE_SIZE: usize = 25;

/// Client for an Esplora REST endpoint
#[derive(Clone, Debug)]
pub struct EsploraClient {
	base_url: String,
	client: ClientWithMiddleware,
}

impl EsploraClient {
	/// Creates a client for `base_url`, e.g. `https://blockstream.info/api`
	pub fn new(base_url: &str) -> Result<Self, BlockChainError> {
		let http_client = reqwest::ClientBuilder::new()
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.map_err(|e| {
				BlockChainError::connection_error(format!("Failed to create HTTP client: {}", e))
			})?;

		Ok(Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			client: create_retryable_http_client(
				&HttpRetryConfig::default(),
				http_client,
				Some(TransientErrorRetryStrategy),
			),
		})
	}

	/// Base URL without trailing slash
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// GETs `path` and decodes the body, None on 404
	async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>, BlockChainError> {
		let url = format!("{}{}", self.base_url, path);
		let response = self.client.get(url.as_str()).send().await.map_err(|e| {
			BlockChainError::connection_error(format!("GET {} failed: {}", url, e))
		})?;

		let status = response.status();
		if status == StatusCode::NOT_FOUND {
			return Ok(None);
		}
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(BlockChainError::request_error(format!(
				"GET {} returned {}: {}",
				url,
				status.as_u16(),
				body
			)));
		}

		response.json::<R>().await.map(Some).map_err(|e| {
			BlockChainError::request_error(format!("Failed to parse response of {}: {}", url, e))
		})
	}
}

/// Esplora operations
#[async_trait]
pub trait EsploraClientTrait: Send + Sync {
	/// Transaction by id, None when unknown
	async fn get_transaction(&self, txid: &str)
		-> Result<Option<EsploraTransaction>, BlockChainError>;

	/// One page of confirmed transactions involving `address`, newest first
	///
	/// # Arguments
	/// * `address` - Address to query
	/// * `last_seen` - Last txid of the previous page, None for the first page
	async fn get_address_transactions(
		&self,
		address: &str,
		last_seen: Option<&str>,
	) -> Result<Vec<EsploraTransaction>, BlockChainError>;
}

#[async_trait]
impl EsploraClientTrait for EsploraClient {
	async fn get_transaction(
		&self,
		txid: &str,
	) -> Result<Option<EsploraTransaction>, BlockChainError> {
		self.get_json(&format!("/tx/{}", txid)).await
	}

	async fn get_address_transactions(
		&self,
		address: &str,
		last_seen: Option<&str>,
	) -> Result<Vec<EsploraTransaction>, BlockChainError> {
		let path = match last_seen {
			Some(txid) => format!("/address/{}/txs/chain/{}", address, txid),
			None => format!("/address/{}/txs/chain", address),
		};
		Ok(self.get_json(&path).await?.unwrap_or_default())
	}
}
