//! Blockchain error types and handling.
//!
//! Errors raised by the chain clients: transport failures, JSON-RPC level errors and
//! responses that do not have the expected shape.

use log::error;

use crate::services::blockchain::TransportError;

/// Represents possible errors that can occur during blockchain operations
#[derive(Debug)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues
	ConnectionError(String),

	/// Errors related to malformed requests or invalid responses
	RequestError(String),

	/// When a requested block cannot be found on the blockchain
	///
	/// Contains the block height, slot or hash that was not found
	BlockNotFound(String),

	/// Errors related to transaction processing
	TransactionError(String),

	/// Internal errors within the blockchain client
	InternalError(String),

	/// Errors while creating or retrieving a pooled client
	ClientPoolError(String),
}

impl BlockChainError {
	/// Formats the error message based on the error type
	fn format_message(&self) -> String {
		match self {
			Self::ConnectionError(msg) => format!("Connection error: {}", msg),
			Self::RequestError(msg) => format!("Request error: {}", msg),
			Self::BlockNotFound(block) => format!("Block not found: {}", block),
			Self::TransactionError(msg) => format!("Transaction error: {}", msg),
			Self::InternalError(msg) => format!("Internal error: {}", msg),
			Self::ClientPoolError(msg) => format!("Client pool error: {}", msg),
		}
	}

	/// Creates a new connection error with logging
	pub fn connection_error(msg: impl Into<String>) -> Self {
		let error = Self::ConnectionError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new request error with logging
	pub fn request_error(msg: impl Into<String>) -> Self {
		let error = Self::RequestError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new block not found error with logging
	pub fn block_not_found(block: impl ToString) -> Self {
		let error = Self::BlockNotFound(block.to_string());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new transaction error with logging
	pub fn transaction_error(msg: impl Into<String>) -> Self {
		let error = Self::TransactionError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new internal error with logging
	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new client pool error with logging
	pub fn client_pool_error(msg: impl Into<String>) -> Self {
		let error = Self::ClientPoolError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

// Standard error trait implementations
impl std::fmt::Display for BlockChainError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for BlockChainError {}

/// Transport failures become connection errors, undecodable payloads request errors
impl From<TransportError> for BlockChainError {
	fn from(err: TransportError) -> Self {
		match err {
			TransportError::ResponseParse(_) | TransportError::RequestSerialization(_) => {
				Self::request_error(err.to_string())
			}
			_ => Self::connection_error(err.to_string()),
		}
	}
}
