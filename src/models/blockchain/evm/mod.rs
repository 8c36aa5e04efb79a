//! Ethereum JSON-RPC payloads.

mod block;
mod transaction;
mod transfer;

pub use block::Block as EVMBlock;
pub use transaction::Transaction as EVMTransaction;
pub use transfer::{AssetTransfer as EVMAssetTransfer, AssetTransfersPage as EVMAssetTransfersPage};
