//! Multi-chain transaction ingestion and fund-flow tracing.
//!
//! Transactions from Ethereum, Bitcoin and Solana are normalized into one
//! [`StandardTransaction`](models::StandardTransaction) shape and consumed by:
//!
//! - the watch matcher, which reports transactions touching a watched address
//! - the fund-flow explorer, which follows outbound flows from a seed address over a shared
//!   work queue, up to a bounded depth

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
