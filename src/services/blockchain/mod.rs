//! Blockchain client interfaces and implementations.
//!
//! Provides abstractions and concrete implementations for interacting with
//! the supported blockchain networks. Includes:
//!
//! - Chain specific clients
//! - Network transport implementations
//! - Error handling for blockchain operations
//! - Client pool for sharing one client per chain

mod clients;
mod error;
mod pool;
mod transports;

pub use clients::{
	BitcoinClient, BitcoinClientTrait, EsploraClient, EsploraClientTrait, EvmClient,
	EvmClientTrait, SolanaClient, SolanaClientTrait, ESPLORA_PAGE_SIZE, MAX_SIGNATURES_PER_PAGE,
	MAX_TRANSFERS_PER_PAGE,
};
pub use error::BlockChainError;
pub use pool::{ClientKind, ClientPool, ClientPoolTrait, ClientStorage};
pub use transports::{
	BitcoinTransportClient, BlockchainTransport, EVMTransportClient, HttpEndpointManager,
	HttpTransportClient, RotatingTransport, SolanaTransportClient, TransientErrorRetryStrategy,
	TransportError, WebSocketConnection, WsConfig, WsSubscriptionClient, ROTATE_ON_ERROR_CODES,
};
