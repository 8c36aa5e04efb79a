//! Solana JSON-RPC payloads.

mod block;
mod transaction;

pub use block::{Block as SolanaBlock, SignatureInfo as SolanaSignatureInfo};
pub use transaction::{
	ConfirmedTransaction as SolanaConfirmedTransaction, Transaction as SolanaTransaction,
};
