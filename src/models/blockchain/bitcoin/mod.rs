//! Bitcoin Core RPC and Esplora REST payloads.

mod amount;
mod block;
mod esplora;
mod transaction;

pub use amount::btc_to_sats;
pub use block::Block as BitcoinBlock;
pub use esplora::{EsploraTransaction, EsploraTxStatus};
pub use transaction::{degraded_transaction, Transaction as BitcoinTransaction};
