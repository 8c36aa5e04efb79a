//! Fund-flow explorer and task queue error types.

use log::error;
use std::{error::Error, fmt};

use crate::services::history::HistoryError;

/// Represents possible errors of the exploration task queue
#[derive(Debug)]
pub enum QueueError {
	/// Publishing a task failed
	SendError(String),
	/// Polling the queue failed
	ReceiveError(String),
	/// Deleting a processed message failed
	AcknowledgeError(String),
	/// A task could not be serialized
	SerializationError(String),
}

impl QueueError {
	fn format_message(&self) -> String {
		match self {
			Self::SendError(msg) => format!("Queue send error: {}", msg),
			Self::ReceiveError(msg) => format!("Queue receive error: {}", msg),
			Self::AcknowledgeError(msg) => format!("Queue acknowledge error: {}", msg),
			Self::SerializationError(msg) => format!("Task serialization error: {}", msg),
		}
	}

	/// Creates a new send error with logging
	pub fn send_error(msg: impl Into<String>) -> Self {
		let error = Self::SendError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new receive error with logging
	pub fn receive_error(msg: impl Into<String>) -> Self {
		let error = Self::ReceiveError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new acknowledge error with logging
	pub fn acknowledge_error(msg: impl Into<String>) -> Self {
		let error = Self::AcknowledgeError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new serialization error with logging
	pub fn serialization_error(msg: impl Into<String>) -> Self {
		let error = Self::SerializationError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for QueueError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for QueueError {}

/// Represents possible errors while processing an exploration task
#[derive(Debug)]
pub enum ExplorerError {
	/// The message body is not an exploration task
	DecodeError(String),
	/// The history of the task address could not be fetched
	HistoryError(String),
	/// A child task could not be submitted or the message acknowledged
	QueueError(String),
}

impl ExplorerError {
	fn format_message(&self) -> String {
		match self {
			Self::DecodeError(msg) => format!("Malformed task message: {}", msg),
			Self::HistoryError(msg) => format!("History error: {}", msg),
			Self::QueueError(msg) => format!("Queue error: {}", msg),
		}
	}

	/// Creates a new decode error with logging
	pub fn decode_error(msg: impl Into<String>) -> Self {
		let error = Self::DecodeError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new history error with logging
	pub fn history_error(msg: impl Into<String>) -> Self {
		let error = Self::HistoryError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new queue error with logging
	pub fn queue_error(msg: impl Into<String>) -> Self {
		let error = Self::QueueError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl From<HistoryError> for ExplorerError {
	fn from(error: HistoryError) -> Self {
		Self::history_error(error.to_string())
	}
}

impl From<QueueError> for ExplorerError {
	fn from(error: QueueError) -> Self {
		Self::queue_error(error.to_string())
	}
}

impl fmt::Display for ExplorerError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for ExplorerError {}
