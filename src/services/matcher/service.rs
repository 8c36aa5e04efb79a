//! Watch matching of ingested transactions.

use futures::{Stream, StreamExt};
use std::sync::Arc;

use crate::{
	models::{Chain, StandardTransaction, WatchMatch},
	services::{
		matcher::{MatcherError, WatchedAddressStore},
		notification::Notifier,
	},
};

/// Tests every ingested transaction against the watched-address set of its chain
pub struct WatchMatcher<S, N> {
	chain: Chain,
	store: Arc<S>,
	notifier: Arc<N>,
}

impl<S: WatchedAddressStore, N: Notifier> WatchMatcher<S, N> {
	/// Creates a matcher for the transactions of `chain`
	pub fn new(chain: Chain, store: Arc<S>, notifier: Arc<N>) -> Self {
		Self {
			chain,
			store,
			notifier,
		}
	}

	/// Checks one transaction and notifies on the first watched address
	///
	/// Addresses are tested senders first, then the recipient. Testing stops at the first match,
	/// so a transaction yields at most one notification.
	///
	/// # Returns
	/// * `Ok(Some(WatchMatch))` - The notified match
	/// * `Ok(None)` - No involved address is watched
	/// * `Err(MatcherError)` - The store could not be queried
	pub async fn check(
		&self,
		transaction: &StandardTransaction,
	) -> Result<Option<WatchMatch>, MatcherError> {
		for address in transaction.involved_addresses() {
			let address = address.to_lowercase();
			if !self.store.is_watched(self.chain, &address).await? {
				continue;
			}

			let event = WatchMatch {
				chain: self.chain,
				transaction: transaction.clone(),
				matched_address: address,
			};
			if let Err(e) = self.notifier.notify(&event).await {
				tracing::warn!(hash = %transaction.hash, "Match notification failed: {}", e);
			}
			return Ok(Some(event));
		}
		Ok(None)
	}

	/// Consumes a feed until it ends
	///
	/// Store failures are logged and the feed keeps flowing.
	///
	/// # Returns
	/// * `usize` - Number of matches notified
	pub async fn run<F>(&self, feed: F) -> usize
	where
		F: Stream<Item = StandardTransaction>,
	{
		let mut feed = std::pin::pin!(feed);
		let mut matches = 0;
		while let Some(transaction) = feed.next().await {
			match self.check(&transaction).await {
				Ok(Some(_)) => matches += 1,
				Ok(None) => {}
				Err(e) => {
					tracing::error!(chain = %self.chain, hash = %transaction.hash, "Watch check failed: {}", e)
				}
			}
		}
		tracing::info!(chain = %self.chain, matches, "Transaction feed ended");
		matches
	}
}
