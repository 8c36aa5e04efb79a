//! History error types.

use log::error;
use std::{error::Error, fmt};

use crate::services::blockchain::BlockChainError;

/// Represents possible errors of a history fetch
#[derive(Debug)]
pub enum HistoryError {
	/// The reference transaction could not be resolved
	ReferenceNotFound(String),

	/// An upstream call failed
	NetworkError(String),

	/// An upstream response does not have the expected shape
	ProcessingError(String),
}

impl HistoryError {
	fn format_message(&self) -> String {
		match self {
			Self::ReferenceNotFound(reference) => {
				format!("Reference transaction not found: {}", reference)
			}
			Self::NetworkError(msg) => format!("Network error: {}", msg),
			Self::ProcessingError(msg) => format!("Processing error: {}", msg),
		}
	}

	/// Creates a new reference not found error with logging
	pub fn reference_not_found(reference: impl Into<String>) -> Self {
		let error = Self::ReferenceNotFound(reference.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new network error with logging
	pub fn network_error(msg: impl Into<String>) -> Self {
		let error = Self::NetworkError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new processing error with logging
	pub fn processing_error(msg: impl Into<String>) -> Self {
		let error = Self::ProcessingError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl From<BlockChainError> for HistoryError {
	fn from(err: BlockChainError) -> Self {
		match err {
			BlockChainError::RequestError(msg) | BlockChainError::TransactionError(msg) => {
				Self::processing_error(msg)
			}
			other => Self::network_error(other.to_string()),
		}
	}
}

impl fmt::Display for HistoryError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for HistoryError {}
