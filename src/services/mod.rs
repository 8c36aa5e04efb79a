//! Core services.
//!
//! - `blockchain`: RPC transports, chain clients and the client pool
//! - `provider`: Per-chain ingestion turned into transaction feeds
//! - `history`: Per-chain address history after a reference transaction
//! - `matcher`: Watched-address matching of ingested transactions
//! - `notification`: Delivery of watch matches
//! - `explorer`: Queue-driven, depth-bounded fund-flow tracing

pub mod blockchain;
pub mod explorer;
pub mod history;
pub mod matcher;
pub mod notification;
pub mod provider;
