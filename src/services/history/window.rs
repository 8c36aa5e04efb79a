//! Ordering and reference exclusion shared by every history source.

use crate::models::{
	bitcoin::EsploraTransaction, solana::SolanaSignatureInfo, StandardTransaction,
};

/// Maximum number of pages read when no reference transaction bounds the walk
pub const MAX_HISTORY_PAGES: usize = 10;

/// Resolved reference transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryReference {
	/// Transaction identifier
	pub hash: String,
	/// Block height or slot
	pub block_number: u64,
	/// Unix timestamp in seconds
	pub timestamp: u64,
}

impl HistoryReference {
	pub fn new(hash: impl Into<String>, block_number: u64, timestamp: u64) -> Self {
		Self {
			hash: hash.into(),
			block_number,
			timestamp,
		}
	}

	/// Whether `entry` sits strictly after the reference by (block, timestamp)
	pub fn precedes<E: HistoryEntry>(&self, entry: &E) -> bool {
		entry.position() > (self.block_number, self.timestamp)
	}
}

/// Anything with an identifier and a chain position
pub trait HistoryEntry {
	fn entry_id(&self) -> &str;

	/// (block height or slot, timestamp)
	fn position(&self) -> (u64, u64);
}

impl HistoryEntry for StandardTransaction {
	fn entry_id(&self) -> &str {
		&self.hash
	}

	fn position(&self) -> (u64, u64) {
		(self.block_number, self.timestamp)
	}
}

impl HistoryEntry for EsploraTransaction {
	fn entry_id(&self) -> &str {
		&self.txid
	}

	fn position(&self) -> (u64, u64) {
		EsploraTransaction::position(self).unwrap_or_default()
	}
}

impl HistoryEntry for SolanaSignatureInfo {
	fn entry_id(&self) -> &str {
		&self.signature
	}

	fn position(&self) -> (u64, u64) {
		(self.slot, self.timestamp())
	}
}

/// Puts entries in chronological order
///
/// Entries sharing a position keep their relative chronological order, so sources listing
/// newest first are reversed before sorting.
pub fn chronological<E: HistoryEntry>(mut entries: Vec<E>, newest_first: bool) -> Vec<E> {
	if newest_first {
		entries.reverse();
	}
	entries.sort_by_key(|entry| entry.position());
	entries
}

/// Keeps the chronologically ordered entries that come after `reference`
///
/// When the reference is part of `entries` everything after it is kept. Otherwise entries are
/// kept when their (block, timestamp) position is strictly greater than the reference's.
pub fn after_reference<E: HistoryEntry>(
	mut entries: Vec<E>,
	reference: Option<&HistoryReference>,
) -> Vec<E> {
	let Some(reference) = reference else {
		return entries;
	};

	match entries
		.iter()
		.position(|entry| entry.entry_id() == reference.hash)
	{
		Some(index) => entries.split_off(index + 1),
		None => entries
			.into_iter()
			.filter(|entry| reference.precedes(entry))
			.collect(),
	}
}
