//! Chain identifiers, connection modes and block references.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

/// Supported blockchains
///
/// The set is closed at compile time. The textual form (`ETHEREUM`, `BITCOIN`, `SOLANA`) is used
/// for environment configuration, queue payloads and watched-address store keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Chain {
	/// Ethereum and EVM compatible account-based chains
	Ethereum,
	/// Bitcoin (UTXO based)
	Bitcoin,
	/// Solana (slot based)
	Solana,
}

/// Error returned when a chain identifier is not part of the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported chain: {0}")]
pub struct ParseChainError(pub String);

impl Chain {
	/// All supported chains, in declaration order
	pub const ALL: [Chain; 3] = [Chain::Ethereum, Chain::Bitcoin, Chain::Solana];

	/// Canonical upper-case identifier
	pub fn as_str(&self) -> &'static str {
		match self {
			Chain::Ethereum => "ETHEREUM",
			Chain::Bitcoin => "BITCOIN",
			Chain::Solana => "SOLANA",
		}
	}

	/// Default interval between two polling ticks
	pub fn default_poll_interval(&self) -> Duration {
		match self {
			Chain::Ethereum => Duration::from_secs(8),
			Chain::Bitcoin => Duration::from_secs(10),
			Chain::Solana => Duration::from_secs(8),
		}
	}

	/// Whether the chain can be ingested through a socket subscription
	pub fn supports_socket(&self) -> bool {
		!matches!(self, Chain::Bitcoin)
	}

	/// Whether `a` and `b` denote the same account
	///
	/// Ethereum hex addresses compare without case since checksummed and lower-case forms are
	/// used interchangeably. Base58 and bech32 forms are compared as given.
	pub fn same_address(&self, a: &str, b: &str) -> bool {
		match self {
			Chain::Ethereum => a.eq_ignore_ascii_case(b),
			Chain::Bitcoin | Chain::Solana => a == b,
		}
	}
}

impl fmt::Display for Chain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Chain {
	type Err = ParseChainError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"ETHEREUM" => Ok(Chain::Ethereum),
			"BITCOIN" => Ok(Chain::Bitcoin),
			"SOLANA" => Ok(Chain::Solana),
			_ => Err(ParseChainError(s.to_string())),
		}
	}
}

/// Ingestion strategy for a chain provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
	/// Timer driven polling of the chain head
	#[default]
	Polling,
	/// Push notifications over a socket subscription
	Socket,
}

impl fmt::Display for ConnectionMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConnectionMode::Polling => f.write_str("polling"),
			ConnectionMode::Socket => f.write_str("socket"),
		}
	}
}

/// Identifier of an observed chain head
///
/// Account and slot based chains identify heads by height; Bitcoin identifies them by block
/// hash, which can only be compared for equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRef {
	/// Block height or slot number
	Height(u64),
	/// Block hash
	Hash(String),
}

impl BlockRef {
	/// Returns true when `self` should be processed after `last` was already processed.
	///
	/// Heights must be strictly greater. Hashes only need to differ. Mixed variants are always
	/// considered newer.
	pub fn is_newer_than(&self, last: &BlockRef) -> bool {
		match (self, last) {
			(BlockRef::Height(current), BlockRef::Height(previous)) => current > previous,
			(BlockRef::Hash(current), BlockRef::Hash(previous)) => current != previous,
			_ => true,
		}
	}
}

impl fmt::Display for BlockRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BlockRef::Height(height) => write!(f, "{}", height),
			BlockRef::Hash(hash) => f.write_str(hash),
		}
	}
}
