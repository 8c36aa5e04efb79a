//! Utility modules shared across the services.
//!
//! - http: Retrying HTTP clients
//! - logging: Console and file logging setup

pub mod http;
pub mod logging;

pub use http::{create_retryable_http_client, HttpRetryConfig};
pub use logging::{setup_logging, LoggingConfig};
