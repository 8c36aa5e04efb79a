//! In-memory ingestion cursor.
//!
//! Remembers the last chain head a provider instance processed. The cursor is not persisted,
//! so a restarted process starts again from the current head.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::BlockRef;

/// Last processed block of one provider instance
#[derive(Clone, Debug, Default)]
pub struct IngestionCursor {
	last: Arc<Mutex<Option<BlockRef>>>,
}

impl IngestionCursor {
	/// Creates a cursor that has not seen any block yet
	pub fn new() -> Self {
		Self::default()
	}

	/// Moves the cursor to `head` when it is newer than the last processed block
	///
	/// The cursor is advanced before the block is fetched, so a block whose processing fails
	/// is not retried on the next observation.
	///
	/// # Returns
	/// * `true` - `head` is new and must be processed
	/// * `false` - `head` was already processed
	pub async fn advance(&self, head: &BlockRef) -> bool {
		let mut last = self.last.lock().await;
		match last.as_ref() {
			Some(previous) if !head.is_newer_than(previous) => false,
			_ => {
				*last = Some(head.clone());
				true
			}
		}
	}

	/// Last processed block, None before the first observation
	pub async fn last(&self) -> Option<BlockRef> {
		self.last.lock().await.clone()
	}
}
