//! Webhook notification implementation.
//!
//! POSTs every match as JSON to a configured URL. Delivery is attempted once.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::{
	models::WatchMatch,
	services::notification::{NotificationError, Notifier},
};

/// Title of every webhook message
const WEBHOOK_TITLE: &str = "Watched address match";

/// Implementation of notifications via webhooks
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
	client: reqwest::Client,
	/// Webhook URL for message delivery
	url: String,
}

/// Represents a formatted webhook message
#[derive(Serialize, Debug)]
pub struct WebhookMessage<'a> {
	title: &'static str,
	body: String,
	#[serde(rename = "match")]
	event: &'a WatchMatch,
}

impl WebhookNotifier {
	/// Creates a new Webhook notifier instance
	///
	/// # Arguments
	/// * `url` - Webhook URL
	pub fn new(url: impl Into<String>) -> Result<Self, NotificationError> {
		let url = url.into();
		url::Url::parse(&url)
			.map_err(|e| NotificationError::config_error(format!("Invalid webhook URL {}: {}", url, e)))?;
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(10))
			.build()?;
		Ok(Self { client, url })
	}

	/// Builds the JSON payload for `event`
	pub fn build_message<'a>(&self, event: &'a WatchMatch) -> WebhookMessage<'a> {
		WebhookMessage {
			title: WEBHOOK_TITLE,
			body: event.to_string(),
			event,
		}
	}
}

#[async_trait]
impl Notifier for WebhookNotifier {
	async fn notify(&self, event: &WatchMatch) -> Result<(), NotificationError> {
		let response = self
			.client
			.post(self.url.as_str())
			.json(&self.build_message(event))
			.send()
			.await
			.map_err(|e| {
				NotificationError::network_error(format!(
					"Failed to send webhook notification: {}",
					e
				))
			})?;

		if !response.status().is_success() {
			return Err(NotificationError::network_error(format!(
				"Webhook returned error status: {}",
				response.status()
			)));
		}
		Ok(())
	}
}
