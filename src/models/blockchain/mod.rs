//! Chain-level model definitions.
//!
//! Contains the closed set of supported chains, the ingestion connection modes, the canonical
//! [`StandardTransaction`] every chain adapter normalizes into, and the raw RPC payloads of
//! each chain.

mod chain;
mod transaction;

pub mod bitcoin;
pub mod evm;
pub mod solana;

pub use chain::{BlockRef, Chain, ConnectionMode, ParseChainError};
pub use transaction::{is_integer_amount, AddressList, StandardTransaction};
