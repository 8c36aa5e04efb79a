//! Exploration task queue.
//!
//! Tasks travel as JSON bodies on an Amazon SQS FIFO queue. Every submission carries a fresh
//! deduplication id and the same message group, and a received message stays invisible to other
//! workers until it is deleted or its visibility timeout expires.

use async_trait::async_trait;
use aws_sdk_sqs::{error::DisplayErrorContext, Client};

use crate::{models::ExplorationTask, services::explorer::QueueError};

/// Message group shared by every exploration task
pub const EXPLORER_MESSAGE_GROUP: &str = "explorer-group";

/// Largest batch returned by one receive call
pub const RECEIVE_BATCH_SIZE: i32 = 5;

/// Long-poll duration of one receive call, in seconds
pub const RECEIVE_WAIT_SECONDS: i32 = 10;

/// A received, not yet acknowledged message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
	/// Queue assigned message id
	pub id: String,
	/// Raw JSON body
	pub body: String,
	/// Handle required to delete the message
	pub receipt_handle: String,
}

impl QueueMessage {
	/// Decodes the body as an exploration task
	pub fn task(&self) -> Result<ExplorationTask, serde_json::Error> {
		serde_json::from_str(&self.body)
	}
}

/// Queue carrying exploration tasks between workers
#[async_trait]
pub trait TaskQueue: Send + Sync {
	/// Publishes a task
	async fn submit(&self, task: &ExplorationTask) -> Result<(), QueueError>;

	/// Long-polls for the next batch of messages, possibly empty
	async fn receive(&self) -> Result<Vec<QueueMessage>, QueueError>;

	/// Deletes a processed message
	async fn acknowledge(&self, message: &QueueMessage) -> Result<(), QueueError>;
}

/// SQS FIFO implementation of [`TaskQueue`]
#[derive(Clone, Debug)]
pub struct SqsTaskQueue {
	client: Client,
	queue_url: String,
}

impl SqsTaskQueue {
	/// Creates a queue client using the default AWS credential chain
	///
	/// # Arguments
	/// * `queue_url` - URL of the FIFO queue
	/// * `region` - Region hosting the queue
	pub async fn new(queue_url: impl Into<String>, region: impl Into<String>) -> Self {
		let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
			.region(aws_config::Region::new(region.into()))
			.load()
			.await;
		Self::with_client(Client::new(&config), queue_url)
	}

	/// Wraps an already configured SQS client
	pub fn with_client(client: Client, queue_url: impl Into<String>) -> Self {
		Self {
			client,
			queue_url: queue_url.into(),
		}
	}

	/// URL of the queue
	pub fn queue_url(&self) -> &str {
		&self.queue_url
	}
}

#[async_trait]
impl TaskQueue for SqsTaskQueue {
	async fn submit(&self, task: &ExplorationTask) -> Result<(), QueueError> {
		let body = serde_json::to_string(task)
			.map_err(|e| QueueError::serialization_error(e.to_string()))?;

		self.client
			.send_message()
			.queue_url(&self.queue_url)
			.message_body(body)
			.message_group_id(EXPLORER_MESSAGE_GROUP)
			.message_deduplication_id(uuid::Uuid::new_v4().to_string())
			.send()
			.await
			.map_err(|e| QueueError::send_error(DisplayErrorContext(&e).to_string()))?;

		tracing::debug!(
			address = %task.address,
			chain = %task.chain,
			depth = task.depth,
			"Submitted exploration task"
		);
		Ok(())
	}

	async fn receive(&self) -> Result<Vec<QueueMessage>, QueueError> {
		let output = self
			.client
			.receive_message()
			.queue_url(&self.queue_url)
			.max_number_of_messages(RECEIVE_BATCH_SIZE)
			.wait_time_seconds(RECEIVE_WAIT_SECONDS)
			.send()
			.await
			.map_err(|e| QueueError::receive_error(DisplayErrorContext(&e).to_string()))?;

		let messages = output
			.messages()
			.iter()
			.filter_map(|message| {
				let receipt_handle = message.receipt_handle()?.to_string();
				Some(QueueMessage {
					id: message.message_id().unwrap_or_default().to_string(),
					body: message.body().unwrap_or_default().to_string(),
					receipt_handle,
				})
			})
			.collect();
		Ok(messages)
	}

	async fn acknowledge(&self, message: &QueueMessage) -> Result<(), QueueError> {
		self.client
			.delete_message()
			.queue_url(&self.queue_url)
			.receipt_handle(&message.receipt_handle)
			.send()
			.await
			.map_err(|e| QueueError::acknowledge_error(DisplayErrorContext(&e).to_string()))?;
		Ok(())
	}
}
