//! Process configuration sourced from the environment.
//!
//! Every setting is read once at startup. A `.env` file in the working directory is loaded first
//! when present, and real environment variables take precedence over it.

use std::{collections::HashMap, time::Duration};
use url::Url;

use crate::models::{Chain, ConfigError, ConnectionMode};

/// Default Esplora REST API used for Bitcoin address history
pub const DEFAULT_BITCOIN_HISTORY_URL: &str = "https://blockstream.info/api";

/// Default region of the exploration queue
pub const DEFAULT_AWS_REGION: &str = "eu-west-1";

/// RPC endpoints configured for a single chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainEndpoints {
	/// Request/response RPC URLs. The first one is active, the others are fallbacks.
	pub polling: Vec<String>,
	/// Subscription RPC URL
	pub socket: Option<String>,
}

impl ChainEndpoints {
	/// Whether no endpoint at all is configured
	pub fn is_empty(&self) -> bool {
		self.polling.is_empty() && self.socket.is_none()
	}
}

/// Settings shared by the `watch`, `explore` and `seed` commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
	/// Chain ingested by the watcher
	pub watcher_chain: Option<Chain>,
	/// Ingestion strategy of the watcher
	pub connection_mode: ConnectionMode,
	/// Configured endpoints, keyed by chain
	pub endpoints: HashMap<Chain, ChainEndpoints>,
	/// Esplora base URL used for Bitcoin history
	pub bitcoin_history_url: String,
	/// Exploration task queue URL
	pub queue_url: Option<String>,
	/// Watched-address store URL
	pub redis_url: Option<String>,
	/// Region of the exploration task queue
	pub aws_region: String,
	/// Overrides the per chain polling interval
	pub poll_interval: Option<Duration>,
	/// Optional webhook receiving match notifications
	pub notify_webhook_url: Option<String>,
}

impl ServiceConfig {
	/// Loads the configuration from the process environment
	///
	/// # Returns
	/// * `Result<Self, ConfigError>` - The parsed configuration or the first invalid setting
	pub fn from_env() -> Result<Self, ConfigError> {
		match dotenvy::dotenv() {
			Ok(_) => {}
			Err(e) if e.not_found() => {}
			Err(e) => return Err(e.into()),
		}
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds the configuration from an arbitrary key lookup
	///
	/// Empty values are treated as unset.
	///
	/// # Arguments
	/// * `lookup` - Returns the raw value of a variable, if set
	///
	/// # Returns
	/// * `Result<Self, ConfigError>` - The parsed configuration or the first invalid setting
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| {
			lookup(key)
				.map(|value| value.trim().to_string())
				.filter(|value| !value.is_empty())
		};

		let watcher_chain = get("WATCHER_CHAIN")
			.map(|value| value.parse::<Chain>())
			.transpose()?;

		let connection_mode = if get("SOCKET_CONNECTION").is_some() {
			ConnectionMode::Socket
		} else {
			ConnectionMode::Polling
		};

		let mut endpoints = HashMap::new();
		for chain in Chain::ALL {
			let polling_key = format!("{}_FULL_ENDPOINT", chain);
			let polling = match get(&polling_key) {
				Some(raw) => raw
					.split(',')
					.map(str::trim)
					.filter(|url| !url.is_empty())
					.map(|url| validate_url(&polling_key, url))
					.collect::<Result<Vec<_>, _>>()?,
				None => Vec::new(),
			};

			let socket_key = format!("{}_SOCKET", chain);
			let socket = get(&socket_key)
				.map(|url| validate_url(&socket_key, &url))
				.transpose()?;

			let chain_endpoints = ChainEndpoints { polling, socket };
			if !chain_endpoints.is_empty() {
				endpoints.insert(chain, chain_endpoints);
			}
		}

		let bitcoin_history_url = match get("BITCOIN_HISTORY_ENDPOINT") {
			Some(url) => validate_url("BITCOIN_HISTORY_ENDPOINT", &url)?,
			None => DEFAULT_BITCOIN_HISTORY_URL.to_string(),
		};

		let queue_url = get("EXPLORER_QUEUE_URL")
			.map(|url| validate_url("EXPLORER_QUEUE_URL", &url))
			.transpose()?;

		let redis_url = get("REDIS_URL")
			.map(|url| validate_url("REDIS_URL", &url))
			.transpose()?;

		let poll_interval = get("POLL_INTERVAL_SECS")
			.map(|raw| match raw.parse::<u64>() {
				Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
				_ => Err(ConfigError::parse_error(format!(
					"POLL_INTERVAL_SECS must be a positive integer, got '{}'",
					raw
				))),
			})
			.transpose()?;

		let notify_webhook_url = get("NOTIFY_WEBHOOK_URL")
			.map(|url| validate_url("NOTIFY_WEBHOOK_URL", &url))
			.transpose()?;

		Ok(Self {
			watcher_chain,
			connection_mode,
			endpoints,
			bitcoin_history_url,
			queue_url,
			redis_url,
			aws_region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
			poll_interval,
			notify_webhook_url,
		})
	}

	/// Endpoints configured for a chain, if any
	pub fn endpoints(&self, chain: Chain) -> Option<&ChainEndpoints> {
		self.endpoints.get(&chain)
	}

	/// Interval between two polling ticks for a chain
	pub fn poll_interval(&self, chain: Chain) -> Duration {
		self.poll_interval
			.unwrap_or_else(|| chain.default_poll_interval())
	}

	/// Returns the queue URL or fails when it is not configured
	pub fn require_queue_url(&self) -> Result<&str, ConfigError> {
		self.queue_url
			.as_deref()
			.ok_or_else(|| ConfigError::validation_error("EXPLORER_QUEUE_URL is required"))
	}

	/// Returns the watched-address store URL or fails when it is not configured
	pub fn require_redis_url(&self) -> Result<&str, ConfigError> {
		self.redis_url
			.as_deref()
			.ok_or_else(|| ConfigError::validation_error("REDIS_URL is required"))
	}

	/// Checks the settings needed by the watcher and returns its chain and mode
	///
	/// # Errors
	/// * The chain is missing
	/// * Socket mode is requested for a chain without socket support
	/// * No endpoint is configured for the selected mode
	/// * The watched-address store is not configured
	pub fn validate_watcher(&self) -> Result<(Chain, ConnectionMode), ConfigError> {
		let chain = self
			.watcher_chain
			.ok_or_else(|| ConfigError::validation_error("WATCHER_CHAIN is required"))?;

		if self.connection_mode == ConnectionMode::Socket && !chain.supports_socket() {
			return Err(ConfigError::validation_error(format!(
				"{} does not support socket connections",
				chain
			)));
		}

		let endpoints = self.endpoints(chain);
		match self.connection_mode {
			ConnectionMode::Polling => {
				if endpoints.is_none_or(|e| e.polling.is_empty()) {
					return Err(ConfigError::validation_error(format!(
						"{}_FULL_ENDPOINT is required for polling",
						chain
					)));
				}
			}
			ConnectionMode::Socket => {
				if endpoints.is_none_or(|e| e.socket.is_none()) {
					return Err(ConfigError::validation_error(format!(
						"{}_SOCKET is required for socket connections",
						chain
					)));
				}
			}
		}

		self.require_redis_url()?;
		Ok((chain, self.connection_mode))
	}
}

fn validate_url(key: &str, raw: &str) -> Result<String, ConfigError> {
	Url::parse(raw)
		.map(|_| raw.to_string())
		.map_err(|e| ConfigError::parse_error(format!("{} is not a valid URL ({}): {}", key, raw, e)))
}
