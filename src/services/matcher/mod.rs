//! Real-time address watching.
//!
//! Every transaction of a chain feed is tested against the externally maintained watched-address
//! set of that chain, and the first watched address found is reported to the notifiers.

mod error;
mod service;
mod store;

pub use error::MatcherError;
pub use service::WatchMatcher;
pub use store::{
	watched_addresses_key, RedisWatchedAddressStore, WatchedAddressStore,
	WATCHED_ADDRESSES_KEY_PREFIX,
};
