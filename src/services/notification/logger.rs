//! Log line notification.

use async_trait::async_trait;

use crate::{
	models::WatchMatch,
	services::notification::{NotificationError, Notifier},
};

/// Writes one info line per match
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
	async fn notify(&self, event: &WatchMatch) -> Result<(), NotificationError> {
		tracing::info!(
			chain = %event.chain,
			address = %event.matched_address,
			hash = %event.transaction.hash,
			"{}",
			event
		);
		Ok(())
	}
}
