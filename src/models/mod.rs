//! Domain models and data structures for transaction ingestion and fund-flow tracing.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `blockchain`: Chain identifiers, the canonical transaction shape and raw chain payloads
//! - `config`: Environment-sourced process configuration and validation
//! - `core`: Core domain models (exploration tasks, watch matches)

mod blockchain;
mod config;
mod core;

// Re-export blockchain types
pub use blockchain::{
	bitcoin, evm, is_integer_amount, solana, AddressList, BlockRef, Chain, ConnectionMode,
	ParseChainError, StandardTransaction,
};

// Re-export core types
pub use core::{ExplorationTask, WatchMatch, MAX_DEPTH};

// Re-export config types
pub use config::{ChainEndpoints, ConfigError, ServiceConfig, DEFAULT_BITCOIN_HISTORY_URL};
