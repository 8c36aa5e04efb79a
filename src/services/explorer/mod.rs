//! Queue-driven fund-flow exploration.
//!
//! Workers pull [`ExplorationTask`](crate::models::ExplorationTask)s from a shared queue, follow
//! the outbound transactions of each task address and push one child task per onward flow, until
//! the depth limit is reached.

mod consumer;
mod error;
mod queue;
mod service;

pub use consumer::QueueConsumer;
pub use error::{ExplorerError, QueueError};
pub use queue::{
	QueueMessage, SqsTaskQueue, TaskQueue, EXPLORER_MESSAGE_GROUP, RECEIVE_BATCH_SIZE,
	RECEIVE_WAIT_SECONDS,
};
pub use service::{flow_target, Explorer};
