//! WebSocket subscription settings.

use std::time::Duration;

/// Timeouts and reconnection policy of a socket subscription
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WsConfig {
	/// How often a ping is sent while the subscription is idle
	pub heartbeat_interval: Duration,
	/// Delay before reconnecting after the connection dropped
	pub reconnect_timeout: Duration,
	/// Consecutive failed connection attempts tolerated before giving up
	pub max_reconnect_attempts: u32,
	/// How long to wait for the handshake and the subscription confirmation
	pub connection_timeout: Duration,
}

impl Default for WsConfig {
	fn default() -> Self {
		Self {
			heartbeat_interval: Duration::from_secs(30),
			reconnect_timeout: Duration::from_secs(5),
			max_reconnect_attempts: 5,
			connection_timeout: Duration::from_secs(10),
		}
	}
}

impl WsConfig {
	/// Settings that fail fast, mostly for tests
	pub fn single_attempt() -> Self {
		Self {
			heartbeat_interval: Duration::from_secs(30),
			reconnect_timeout: Duration::from_millis(10),
			max_reconnect_attempts: 1,
			connection_timeout: Duration::from_secs(1),
		}
	}

	/// Sets the reconnect delay
	pub fn with_reconnect_timeout(mut self, reconnect_timeout: Duration) -> Self {
		self.reconnect_timeout = reconnect_timeout;
		self
	}

	/// Sets the number of tolerated consecutive failures
	pub fn with_max_reconnect_attempts(mut self, max_reconnect_attempts: u32) -> Self {
		self.max_reconnect_attempts = max_reconnect_attempts;
		self
	}
}
