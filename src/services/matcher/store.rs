//! Watched-address membership backed by Redis.
//!
//! Each chain owns one set, `watched_addresses:<CHAIN>`, holding lower-cased addresses. The set
//! is maintained by another system; only membership is ever tested here.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};

use crate::{models::Chain, services::matcher::MatcherError};

/// Prefix of the per chain watched-address sets
pub const WATCHED_ADDRESSES_KEY_PREFIX: &str = "watched_addresses";

/// Key of the watched-address set of `chain`
pub fn watched_addresses_key(chain: Chain) -> String {
	format!("{}:{}", WATCHED_ADDRESSES_KEY_PREFIX, chain)
}

/// Read access to the watched-address sets
#[async_trait]
pub trait WatchedAddressStore: Send + Sync {
	/// Whether `address` is watched on `chain`
	///
	/// # Arguments
	/// * `chain` - Chain whose set is queried
	/// * `address` - Lower-cased address
	async fn is_watched(&self, chain: Chain, address: &str) -> Result<bool, MatcherError>;
}

/// Redis implementation of [`WatchedAddressStore`]
#[derive(Clone)]
pub struct RedisWatchedAddressStore {
	connection: ConnectionManager,
}

impl RedisWatchedAddressStore {
	/// Connects to the store
	///
	/// # Arguments
	/// * `url` - Redis connection URL
	///
	/// # Returns
	/// * `Result<Self, MatcherError>` - Connected store or an error when the URL is invalid or
	///   the server is unreachable
	pub async fn new(url: &str) -> Result<Self, MatcherError> {
		let client = redis::Client::open(url)
			.map_err(|e| MatcherError::config_error(format!("Invalid Redis URL: {}", e)))?;
		let connection = client.get_connection_manager().await?;
		tracing::info!("Connected to watched-address store");
		Ok(Self { connection })
	}
}

#[async_trait]
impl WatchedAddressStore for RedisWatchedAddressStore {
	async fn is_watched(&self, chain: Chain, address: &str) -> Result<bool, MatcherError> {
		// Clones share one multiplexed connection
		let mut connection = self.connection.clone();
		let watched: bool = connection
			.sismember(watched_addresses_key(chain), address)
			.await?;
		Ok(watched)
	}
}
