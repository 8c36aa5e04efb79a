//! JSON-RPC subscriptions over WebSocket.
//!
//! A subscription session connects, sends the subscribe request, waits for the server to
//! confirm it and then forwards the `result` member of every notification. Dropped sessions
//! are re-established until [`WsConfig::max_reconnect_attempts`] consecutive attempts fail.

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::{
	sync::{mpsc, watch},
	time::{sleep, timeout},
};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::services::blockchain::transports::{TransportError, WebSocketConnection, WsConfig};

const SUBSCRIBE_REQUEST_ID: u64 = 1;

/// How a session ended without error
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
	/// Shutdown was requested or nobody listens anymore
	Stopped,
	/// The server closed the connection
	Disconnected { was_subscribed: bool },
}

/// Subscription client for a single socket endpoint
#[derive(Clone, Debug)]
pub struct WsSubscriptionClient {
	url: String,
	config: WsConfig,
}

impl WsSubscriptionClient {
	/// Creates a client for `url`; no connection is made until [`Self::run`]
	pub fn new(url: impl Into<String>, config: WsConfig) -> Self {
		Self {
			url: url.into(),
			config,
		}
	}

	/// The socket endpoint
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Subscribes and forwards notifications until shutdown
	///
	/// # Arguments
	/// * `method` - Subscribe method, e.g. `eth_subscribe`
	/// * `params` - Subscribe parameters
	/// * `notifications` - Receives the `result` member of each notification
	/// * `shutdown` - Stops the subscription when it flips to `true` or its sender is dropped
	///
	/// # Returns
	/// * `Ok(())` - Shutdown was requested or the receiver was dropped
	/// * `Err(TransportError)` - Too many consecutive connection failures
	pub async fn run(
		&self,
		method: &str,
		params: Value,
		notifications: mpsc::Sender<Value>,
		mut shutdown: watch::Receiver<bool>,
	) -> Result<(), TransportError> {
		let mut failures = 0u32;
		loop {
			if *shutdown.borrow() {
				return Ok(());
			}

			match self
				.session(method, &params, &notifications, &mut shutdown)
				.await
			{
				Ok(SessionEnd::Stopped) => return Ok(()),
				Ok(SessionEnd::Disconnected { was_subscribed }) => {
					tracing::warn!(url = %self.url, "Subscription connection closed");
					if was_subscribed {
						failures = 0;
					} else {
						failures += 1;
					}
				}
				Err(e) => {
					tracing::warn!(url = %self.url, "Subscription session failed: {}", e);
					failures += 1;
				}
			}

			if failures >= self.config.max_reconnect_attempts {
				return Err(TransportError::network(format!(
					"Giving up on {} after {} failed attempts",
					self.url, failures
				)));
			}

			tokio::select! {
				_ = sleep(self.config.reconnect_timeout) => {}
				_ = shutdown.changed() => return Ok(()),
			}
		}
	}

	async fn session(
		&self,
		method: &str,
		params: &Value,
		notifications: &mpsc::Sender<Value>,
		shutdown: &mut watch::Receiver<bool>,
	) -> Result<SessionEnd, TransportError> {
		let connect = connect_async(self.url.as_str());
		let (mut stream, _) = timeout(self.config.connection_timeout, connect)
			.await
			.map_err(|_| TransportError::network(format!("Timed out connecting to {}", self.url)))?
			.map_err(|e| {
				TransportError::network(format!("Failed to connect to {}: {}", self.url, e))
			})?;

		let request = json!({
			"jsonrpc": "2.0",
			"id": SUBSCRIBE_REQUEST_ID,
			"method": method,
			"params": params,
		});
		stream
			.send(Message::Text(request.to_string().into()))
			.await
			.map_err(|e| TransportError::network(format!("Failed to send {}: {}", method, e)))?;

		let mut connection = WebSocketConnection::default();
		let mut heartbeat = tokio::time::interval(self.config.heartbeat_interval);
		heartbeat.tick().await;
		let confirmation_deadline = sleep(self.config.connection_timeout);
		tokio::pin!(confirmation_deadline);

		loop {
			tokio::select! {
				_ = shutdown.changed() => {
					let _ = stream.close(None).await;
					return Ok(SessionEnd::Stopped);
				}
				_ = &mut confirmation_deadline, if !connection.is_subscribed() => {
					return Err(TransportError::network(format!(
						"{} was not confirmed by {}",
						method, self.url
					)));
				}
				_ = heartbeat.tick() => {
					if connection.idle_for() > self.config.heartbeat_interval * 2 {
						return Ok(SessionEnd::Disconnected {
							was_subscribed: connection.is_subscribed(),
						});
					}
					stream
						.send(Message::Ping(Vec::new().into()))
						.await
						.map_err(|e| TransportError::network(format!("Ping failed: {}", e)))?;
				}
				message = stream.next() => match message {
					Some(Ok(Message::Text(text))) => {
						connection.update_activity();
						let payload: Value = serde_json::from_str(text.as_str()).map_err(|e| {
							TransportError::response_parse(format!("Invalid socket message: {}", e))
						})?;
						if !self
							.handle_message(payload, &mut connection, notifications, shutdown)
							.await?
						{
							return Ok(SessionEnd::Stopped);
						}
					}
					Some(Ok(Message::Ping(payload))) => {
						connection.update_activity();
						stream
							.send(Message::Pong(payload))
							.await
							.map_err(|e| TransportError::network(format!("Pong failed: {}", e)))?;
					}
					Some(Ok(Message::Close(_))) | None => {
						return Ok(SessionEnd::Disconnected {
							was_subscribed: connection.is_subscribed(),
						});
					}
					Some(Ok(_)) => connection.update_activity(),
					Some(Err(e)) => {
						return Err(TransportError::network(format!(
							"Socket error on {}: {}",
							self.url, e
						)));
					}
				}
			}
		}
	}

	/// Returns false when the notification receiver is gone or shutdown was requested
	///
	/// Forwarding waits for room in `notifications` only until shutdown is requested.
	async fn handle_message(
		&self,
		payload: Value,
		connection: &mut WebSocketConnection,
		notifications: &mpsc::Sender<Value>,
		shutdown: &mut watch::Receiver<bool>,
	) -> Result<bool, TransportError> {
		if payload.get("id").and_then(Value::as_u64) == Some(SUBSCRIBE_REQUEST_ID) {
			if let Some(error) = payload.get("error") {
				return Err(TransportError::response_parse(format!(
					"Subscription rejected by {}: {}",
					self.url, error
				)));
			}
			let id = payload.get("result").cloned().unwrap_or(Value::Null);
			tracing::info!(url = %self.url, subscription = %id, "Subscription confirmed");
			connection.subscription_id = Some(id);
			return Ok(true);
		}

		match payload.get("params").and_then(|params| params.get("result")) {
			Some(result) => Ok(tokio::select! {
				biased;
				sent = notifications.send(result.clone()) => sent.is_ok(),
				_ = shutdown.wait_for(|stopped| *stopped) => false,
			}),
			None => {
				tracing::debug!(url = %self.url, "Ignoring socket message: {}", payload);
				Ok(true)
			}
		}
	}
}
