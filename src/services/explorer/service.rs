//! Depth-bounded fund-flow exploration.
//!
//! Exploring a task fetches the outbound history of its address after the task cursor and
//! submits one child task per transaction that moved a non-zero amount to another address. The
//! children are picked up by whichever worker drains the queue next, so the trace is a
//! breadth-first walk of the transaction graph spread over every worker.

use alloy::primitives::U256;
use std::{str::FromStr, sync::Arc};

use crate::{
	models::{ExplorationTask, StandardTransaction},
	services::{
		explorer::{ExplorerError, TaskQueue},
		history::HistoryFetcher,
	},
};

/// Expands exploration tasks into child tasks
pub struct Explorer<H, Q> {
	history: Arc<H>,
	queue: Arc<Q>,
}

impl<H: HistoryFetcher, Q: TaskQueue> Explorer<H, Q> {
	/// Creates an explorer
	///
	/// # Arguments
	/// * `history` - Source of address histories
	/// * `queue` - Queue receiving child tasks
	pub fn new(history: Arc<H>, queue: Arc<Q>) -> Self {
		Self { history, queue }
	}

	/// Processes one task to completion
	///
	/// A task at the depth limit is terminal. Otherwise every qualifying outbound transaction is
	/// submitted as a child task before this returns. A failed submission aborts the task, and
	/// children submitted before it are not withdrawn.
	///
	/// # Returns
	/// * `Result<usize, ExplorerError>` - Number of submitted child tasks
	pub async fn explore(&self, task: &ExplorationTask) -> Result<usize, ExplorerError> {
		if task.at_depth_limit() {
			tracing::info!(
				address = %task.address,
				chain = %task.chain,
				depth = task.depth,
				"max depth reached"
			);
			return Ok(0);
		}

		let history = self
			.history
			.fetch_history(task.chain, &task.address, task.start_tx.as_deref())
			.await?;

		let mut submitted = 0;
		for transaction in &history {
			let Some(to) = flow_target(task, transaction) else {
				continue;
			};
			let child = task.child(to, &transaction.hash, &transaction.value);
			self.queue.submit(&child).await?;
			submitted += 1;
		}

		tracing::info!(
			address = %task.address,
			chain = %task.chain,
			depth = task.depth,
			transactions = history.len(),
			submitted,
			"Explored address"
		);
		Ok(submitted)
	}
}

/// Recipient of a transaction that carries funds onward, if any
///
/// Self transfers, transfers without a recipient and zero or unparsable amounts carry nothing.
/// Addresses are compared the way the task chain compares them.
pub fn flow_target<'a>(task: &ExplorationTask, transaction: &'a StandardTransaction) -> Option<&'a str> {
	let to = transaction.to.as_deref()?;
	if task.chain.same_address(to, &task.address) {
		return None;
	}
	match U256::from_str(&transaction.value) {
		Ok(value) if !value.is_zero() => Some(to),
		Ok(_) => None,
		Err(e) => {
			tracing::warn!(hash = %transaction.hash, value = %transaction.value, "Skipping unparsable value: {}", e);
			None
		}
	}
}
