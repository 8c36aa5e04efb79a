//! State of one WebSocket session.

use std::time::{Duration, Instant};

/// Bookkeeping for a live subscription session
///
/// Tracks the server assigned subscription id and when the server was last heard from.
#[derive(Debug)]
pub struct WebSocketConnection {
	/// Id returned by the subscribe call, None until confirmed
	pub subscription_id: Option<serde_json::Value>,
	last_activity: Instant,
}

impl Default for WebSocketConnection {
	fn default() -> Self {
		Self {
			subscription_id: None,
			last_activity: Instant::now(),
		}
	}
}

impl WebSocketConnection {
	/// Whether the subscription was confirmed by the server
	pub fn is_subscribed(&self) -> bool {
		self.subscription_id.is_some()
	}

	/// Records traffic from the server
	pub fn update_activity(&mut self) {
		self.last_activity = Instant::now();
	}

	/// Time since the server was last heard from
	pub fn idle_for(&self) -> Duration {
		self.last_activity.elapsed()
	}
}
