//! Client pool for managing blockchain clients.
//!
//! Each chain gets at most one client per process. Clients are created lazily on first use from
//! the endpoints in [`ServiceConfig`] and then shared by reference between providers and history
//! fetchers.
//!
//! The pool uses a fast path for existing clients and a slow path for creating new ones.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::{any::Any, collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use crate::{
	models::{Chain, ChainEndpoints, ServiceConfig},
	services::blockchain::{
		BitcoinClient, BitcoinClientTrait, BitcoinTransportClient, BlockChainError, EVMTransportClient,
		EsploraClient, EsploraClientTrait, EvmClient, EvmClientTrait, SolanaClient,
		SolanaClientTrait, SolanaTransportClient,
	},
};

/// Kinds of clients held by the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
	/// JSON-RPC node of an account based chain
	Evm,
	/// Bitcoin Core node
	Bitcoin,
	/// Esplora REST index
	Esplora,
	/// Solana RPC node
	Solana,
}

/// Trait for the client pool.
#[async_trait]
pub trait ClientPoolTrait: Send + Sync {
	type EvmClient: EvmClientTrait + 'static;
	type BitcoinClient: BitcoinClientTrait + 'static;
	type EsploraClient: EsploraClientTrait + 'static;
	type SolanaClient: SolanaClientTrait + 'static;

	async fn get_evm_client(&self) -> Result<Arc<Self::EvmClient>, BlockChainError>;
	async fn get_bitcoin_client(&self) -> Result<Arc<Self::BitcoinClient>, BlockChainError>;
	async fn get_esplora_client(&self) -> Result<Arc<Self::EsploraClient>, BlockChainError>;
	async fn get_solana_client(&self) -> Result<Arc<Self::SolanaClient>, BlockChainError>;
}

/// Generic client storage that can hold any type of blockchain client
///
/// The HashMap is indexed by chain and the value is an Arc of the client.
pub struct ClientStorage<T> {
	clients: Arc<RwLock<HashMap<Chain, Arc<T>>>>,
}

impl<T> ClientStorage<T> {
	pub fn new() -> Self {
		Self {
			clients: Arc::new(RwLock::new(HashMap::new())),
		}
	}
}

impl<T> Default for ClientStorage<T> {
	fn default() -> Self {
		Self::new()
	}
}

/// Registry of per-chain clients, constructed once at process start
pub struct ClientPool {
	config: Arc<ServiceConfig>,
	/// Map of client storages indexed by client kind
	storages: HashMap<ClientKind, Box<dyn Any + Send + Sync>>,
}

impl ClientPool {
	/// Creates an empty pool reading endpoints from `config`
	pub fn new(config: Arc<ServiceConfig>) -> Self {
		let mut pool = Self {
			config,
			storages: HashMap::new(),
		};

		pool.register_client_type::<EvmClient<EVMTransportClient>>(ClientKind::Evm);
		pool.register_client_type::<BitcoinClient<BitcoinTransportClient>>(ClientKind::Bitcoin);
		pool.register_client_type::<EsploraClient>(ClientKind::Esplora);
		pool.register_client_type::<SolanaClient<SolanaTransportClient>>(ClientKind::Solana);

		pool
	}

	fn register_client_type<T: 'static + Send + Sync>(&mut self, kind: ClientKind) {
		self.storages
			.insert(kind, Box::new(ClientStorage::<T>::new()));
	}

	/// Polling endpoints of `chain`, an error when none are configured
	fn polling_endpoints(&self, chain: Chain) -> Result<ChainEndpoints, BlockChainError> {
		match self.config.endpoints(chain) {
			Some(endpoints) if !endpoints.polling.is_empty() => Ok(endpoints.clone()),
			_ => Err(BlockChainError::client_pool_error(format!(
				"No polling endpoint configured for {}",
				chain
			))),
		}
	}

	/// Internal helper method to get or create a client of any type.
	///
	/// Uses a double-checked locking pattern:
	/// 1. Fast path with read lock to check for existing client
	/// 2. Slow path with write lock, re-checking before creating the client
	async fn get_or_create_client<T: Send + Sync + 'static>(
		&self,
		kind: ClientKind,
		chain: Chain,
		create_fn: impl FnOnce() -> BoxFuture<'static, Result<T, BlockChainError>>,
	) -> Result<Arc<T>, BlockChainError> {
		let storage = self
			.storages
			.get(&kind)
			.and_then(|s| s.downcast_ref::<ClientStorage<T>>())
			.ok_or_else(|| BlockChainError::client_pool_error("Invalid client type"))?;

		if let Some(client) = storage.clients.read().await.get(&chain) {
			return Ok(client.clone());
		}

		let mut clients = storage.clients.write().await;
		if let Some(client) = clients.get(&chain) {
			return Ok(client.clone());
		}
		let client = Arc::new(create_fn().await?);
		clients.insert(chain, client.clone());
		Ok(client)
	}

	/// Get the number of clients for a given client kind.
	pub async fn get_client_count<T: 'static>(&self, kind: ClientKind) -> usize {
		match self
			.storages
			.get(&kind)
			.and_then(|s| s.downcast_ref::<ClientStorage<T>>())
		{
			Some(storage) => storage.clients.read().await.len(),
			None => 0,
		}
	}
}

#[async_trait]
impl ClientPoolTrait for ClientPool {
	type EvmClient = EvmClient<EVMTransportClient>;
	type BitcoinClient = BitcoinClient<BitcoinTransportClient>;
	type EsploraClient = EsploraClient;
	type SolanaClient = SolanaClient<SolanaTransportClient>;

	async fn get_evm_client(&self) -> Result<Arc<Self::EvmClient>, BlockChainError> {
		let endpoints = self.polling_endpoints(Chain::Ethereum)?;
		self.get_or_create_client(ClientKind::Evm, Chain::Ethereum, move || {
			Box::pin(async move { Self::EvmClient::new(&endpoints).await })
		})
		.await
		.map_err(|e| BlockChainError::client_pool_error(e.to_string()))
	}

	async fn get_bitcoin_client(&self) -> Result<Arc<Self::BitcoinClient>, BlockChainError> {
		let endpoints = self.polling_endpoints(Chain::Bitcoin)?;
		self.get_or_create_client(ClientKind::Bitcoin, Chain::Bitcoin, move || {
			Box::pin(async move { Self::BitcoinClient::new(&endpoints).await })
		})
		.await
		.map_err(|e| BlockChainError::client_pool_error(e.to_string()))
	}

	async fn get_esplora_client(&self) -> Result<Arc<Self::EsploraClient>, BlockChainError> {
		let base_url = self.config.bitcoin_history_url.clone();
		self.get_or_create_client(ClientKind::Esplora, Chain::Bitcoin, move || {
			Box::pin(async move { EsploraClient::new(&base_url) })
		})
		.await
		.map_err(|e| BlockChainError::client_pool_error(e.to_string()))
	}

	async fn get_solana_client(&self) -> Result<Arc<Self::SolanaClient>, BlockChainError> {
		let endpoints = self.polling_endpoints(Chain::Solana)?;
		self.get_or_create_client(ClientKind::Solana, Chain::Solana, move || {
			Box::pin(async move { Self::SolanaClient::new(&endpoints).await })
		})
		.await
		.map_err(|e| BlockChainError::client_pool_error(e.to_string()))
	}
}
