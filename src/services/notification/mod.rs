//! Match notifications.
//!
//! Notifications are fire-and-forget: a failing notifier is logged and never retried, and
//! never stops the feed that produced the match.

use async_trait::async_trait;

mod error;
mod logger;
mod webhook;

pub use error::NotificationError;
pub use logger::LogNotifier;
pub use webhook::{WebhookMessage, WebhookNotifier};

use crate::models::WatchMatch;

/// Interface for notification implementations
#[async_trait]
pub trait Notifier: Send + Sync {
	/// Delivers one match notification
	async fn notify(&self, event: &WatchMatch) -> Result<(), NotificationError>;
}

/// Fans a match out to every configured notifier
#[derive(Default)]
pub struct NotificationService {
	notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationService {
	/// Service with the log notifier and, when a URL is given, a webhook notifier
	pub fn new(webhook_url: Option<&str>) -> Result<Self, NotificationError> {
		let mut service = Self::default().with_notifier(LogNotifier);
		if let Some(url) = webhook_url {
			service = service.with_notifier(WebhookNotifier::new(url)?);
		}
		Ok(service)
	}

	/// Adds a notifier
	pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
		self.notifiers.push(Box::new(notifier));
		self
	}

	/// Number of configured notifiers
	pub fn len(&self) -> usize {
		self.notifiers.len()
	}

	/// Whether no notifier is configured
	pub fn is_empty(&self) -> bool {
		self.notifiers.is_empty()
	}
}

#[async_trait]
impl Notifier for NotificationService {
	async fn notify(&self, event: &WatchMatch) -> Result<(), NotificationError> {
		for notifier in &self.notifiers {
			if let Err(e) = notifier.notify(event).await {
				tracing::warn!(hash = %event.transaction.hash, "Notification not delivered: {}", e);
			}
		}
		Ok(())
	}
}
