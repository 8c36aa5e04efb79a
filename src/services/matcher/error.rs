//! Watch matcher error types and handling.

use log::error;
use std::{error::Error, fmt};

/// Represents possible errors while matching transactions against watched addresses
#[derive(Debug)]
pub enum MatcherError {
	/// The watched-address store could not be reached or answered with an error
	StoreError(String),
	/// The watched-address store is misconfigured
	ConfigError(String),
}

impl MatcherError {
	fn format_message(&self) -> String {
		match self {
			Self::StoreError(msg) => format!("Store error: {}", msg),
			Self::ConfigError(msg) => format!("Config error: {}", msg),
		}
	}

	/// Creates a new store error with logging
	pub fn store_error(msg: impl Into<String>) -> Self {
		let error = Self::StoreError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new configuration error with logging
	pub fn config_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl From<redis::RedisError> for MatcherError {
	fn from(error: redis::RedisError) -> Self {
		Self::store_error(error.to_string())
	}
}

impl fmt::Display for MatcherError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for MatcherError {}
