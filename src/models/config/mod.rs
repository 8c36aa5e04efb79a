//! Process configuration.
//!
//! Configuration is sourced from the environment (optionally seeded from a `.env` file) and
//! validated at startup. Any validation failure is fatal for the process.

mod error;
mod service_config;

pub use error::ConfigError;
pub use service_config::{ChainEndpoints, ServiceConfig, DEFAULT_BITCOIN_HISTORY_URL};
