//! Transport error types.
//!
//! Errors raised while moving a request to an RPC node and reading its answer back. They carry
//! no knowledge of the RPC semantics, which the chain clients interpret.

use log::error;

/// Represents possible errors of a transport round trip
#[derive(Debug)]
pub enum TransportError {
	/// The request never produced an HTTP response
	Network(String),

	/// The endpoint answered with a non-success status
	Http {
		status: u16,
		url: String,
		body: String,
	},

	/// The response body is not valid JSON
	ResponseParse(String),

	/// The request body could not be serialized
	RequestSerialization(String),

	/// Switching to a fallback endpoint failed
	UrlRotation(String),
}

impl TransportError {
	fn format_message(&self) -> String {
		match self {
			Self::Network(msg) => format!("Network error: {}", msg),
			Self::Http { status, url, body } => {
				format!("HTTP error {} from {}: {}", status, url, body)
			}
			Self::ResponseParse(msg) => format!("Response parse error: {}", msg),
			Self::RequestSerialization(msg) => format!("Request serialization error: {}", msg),
			Self::UrlRotation(msg) => format!("URL rotation error: {}", msg),
		}
	}

	/// Creates a new network error with logging
	pub fn network(msg: impl Into<String>) -> Self {
		let error = Self::Network(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new HTTP status error with logging
	pub fn http(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
		let error = Self::Http {
			status,
			url: url.into(),
			body: body.into(),
		};
		error!("{}", error.format_message());
		error
	}

	/// Creates a new response parse error with logging
	pub fn response_parse(msg: impl Into<String>) -> Self {
		let error = Self::ResponseParse(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new request serialization error with logging
	pub fn request_serialization(msg: impl Into<String>) -> Self {
		let error = Self::RequestSerialization(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new URL rotation error with logging
	pub fn url_rotation(msg: impl Into<String>) -> Self {
		let error = Self::UrlRotation(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl std::fmt::Display for TransportError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for TransportError {}
