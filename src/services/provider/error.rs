//! Provider error types.

use log::error;
use std::{error::Error, fmt};

use crate::services::blockchain::BlockChainError;

/// Represents possible errors raised while ingesting a chain
#[derive(Debug)]
pub enum ProviderError {
	/// The polling scheduler could not be created, started or stopped
	SchedulerError(String),

	/// A chain client call failed
	NetworkError(String),

	/// Chain data could not be turned into canonical transactions
	ProcessingError(String),

	/// The requested ingestion setup cannot be served
	ConfigurationError(String),
}

impl ProviderError {
	fn format_message(&self) -> String {
		match self {
			Self::SchedulerError(msg) => format!("Scheduler error: {}", msg),
			Self::NetworkError(msg) => format!("Network error: {}", msg),
			Self::ProcessingError(msg) => format!("Processing error: {}", msg),
			Self::ConfigurationError(msg) => format!("Configuration error: {}", msg),
		}
	}

	/// Creates a new scheduler error with logging
	pub fn scheduler_error(msg: impl Into<String>) -> Self {
		let error = Self::SchedulerError(msg.into());
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

	/// Creates a new configuration error with logging
	pub fn configuration_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigurationError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl From<BlockChainError> for ProviderError {
	fn from(err: BlockChainError) -> Self {
		Self::network_error(err.to_string())
	}
}

impl fmt::Display for ProviderError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for ProviderError {}
