//! Queue consumption loop of an explorer worker.

use std::{sync::Arc, time::Duration};
use tokio::sync::watch;

use crate::services::{
	explorer::{Explorer, ExplorerError, QueueMessage, TaskQueue},
	history::HistoryFetcher,
};

/// Pause after a failed receive call
const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Drains the task queue through an [`Explorer`]
///
/// A message is deleted only after its task and every child submission succeeded. Anything else
/// leaves it on the queue, to be redelivered once its visibility timeout expires.
pub struct QueueConsumer<H, Q> {
	explorer: Explorer<H, Q>,
	queue: Arc<Q>,
}

impl<H: HistoryFetcher, Q: TaskQueue> QueueConsumer<H, Q> {
	/// Creates a consumer reading from and submitting to `queue`
	pub fn new(history: Arc<H>, queue: Arc<Q>) -> Self {
		Self {
			explorer: Explorer::new(history, queue.clone()),
			queue,
		}
	}

	/// Processes one message
	///
	/// # Returns
	/// * `Ok(usize)` - The task was processed and acknowledged, with this many children
	/// * `Err(ExplorerError)` - The message was left unacknowledged
	pub async fn handle(&self, message: &QueueMessage) -> Result<usize, ExplorerError> {
		let task = message
			.task()
			.map_err(|e| ExplorerError::decode_error(format!("message {}: {}", message.id, e)))?;
		let submitted = self.explorer.explore(&task).await?;
		self.queue.acknowledge(message).await?;
		Ok(submitted)
	}

	/// Receives one batch and processes its messages in order
	///
	/// # Returns
	/// * `usize` - Number of acknowledged messages
	pub async fn process_batch(&self) -> usize {
		let messages = match self.queue.receive().await {
			Ok(messages) => messages,
			Err(e) => {
				tracing::error!("Failed to receive exploration tasks: {}", e);
				return 0;
			}
		};

		self.handle_all(&messages).await
	}

	async fn handle_all(&self, messages: &[QueueMessage]) -> usize {
		let mut acknowledged = 0;
		for message in messages {
			match self.handle(message).await {
				Ok(_) => acknowledged += 1,
				Err(e) => tracing::error!(message = %message.id, "Task left for redelivery: {}", e),
			}
		}
		acknowledged
	}

	/// Polls the queue until `shutdown` flips to `true`
	///
	/// A batch in progress is finished before the loop exits. A pending long-poll is abandoned.
	pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
		tracing::info!("Explorer worker started");
		while !*shutdown.borrow() {
			tokio::select! {
				_ = shutdown.changed() => break,
				messages = self.queue.receive() => match messages {
					Ok(messages) => {
						self.handle_all(&messages).await;
					}
					Err(e) => {
						tracing::error!("Failed to receive exploration tasks: {}", e);
						tokio::select! {
							_ = tokio::time::sleep(RECEIVE_ERROR_BACKOFF) => {}
							_ = shutdown.changed() => break,
						}
					}
				}
			}
		}
		tracing::info!("Explorer worker stopped");
	}
}

