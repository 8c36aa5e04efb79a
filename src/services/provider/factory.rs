//! Provider selection by chain.

use async_trait::async_trait;
use serde_json::Value;

use crate::{
	models::{BlockRef, Chain, ConnectionMode, StandardTransaction},
	services::{
		blockchain::ClientPoolTrait,
		provider::{
			BitcoinProvider, ChainProvider, EvmProvider, ProviderError, SocketSubscription,
			SolanaProvider,
		},
	},
};

/// Provider of any supported chain, backed by the clients of pool `P`
pub enum AnyChainProvider<P: ClientPoolTrait> {
	Evm(EvmProvider<P::EvmClient>),
	Bitcoin(BitcoinProvider<P::BitcoinClient>),
	Solana(SolanaProvider<P::SolanaClient>),
}

/// Selects the provider for `chain` and checks that it can ingest in `mode`
///
/// # Errors
/// * `ConfigurationError` - `mode` is not supported by `chain`
/// * `NetworkError` - The chain client could not be created
pub async fn create_provider<P: ClientPoolTrait>(
	chain: Chain,
	mode: ConnectionMode,
	pool: &P,
) -> Result<AnyChainProvider<P>, ProviderError> {
	tracing::info!(%chain, %mode, "Creating chain provider");
	if mode == ConnectionMode::Socket && !chain.supports_socket() {
		return Err(ProviderError::configuration_error(format!(
			"Unsupported connection mode {} for {}",
			mode, chain
		)));
	}

	let provider = match chain {
		Chain::Ethereum => AnyChainProvider::Evm(EvmProvider::new(pool.get_evm_client().await?)),
		Chain::Bitcoin => {
			AnyChainProvider::Bitcoin(BitcoinProvider::new(pool.get_bitcoin_client().await?))
		}
		Chain::Solana => {
			AnyChainProvider::Solana(SolanaProvider::new(pool.get_solana_client().await?))
		}
	};
	Ok(provider)
}

#[async_trait]
impl<P: ClientPoolTrait> ChainProvider for AnyChainProvider<P> {
	fn chain(&self) -> Chain {
		match self {
			Self::Evm(provider) => provider.chain(),
			Self::Bitcoin(provider) => provider.chain(),
			Self::Solana(provider) => provider.chain(),
		}
	}

	async fn latest_head(&self) -> Result<BlockRef, ProviderError> {
		match self {
			Self::Evm(provider) => provider.latest_head().await,
			Self::Bitcoin(provider) => provider.latest_head().await,
			Self::Solana(provider) => provider.latest_head().await,
		}
	}

	async fn block_transactions(
		&self,
		head: &BlockRef,
	) -> Result<Vec<StandardTransaction>, ProviderError> {
		match self {
			Self::Evm(provider) => provider.block_transactions(head).await,
			Self::Bitcoin(provider) => provider.block_transactions(head).await,
			Self::Solana(provider) => provider.block_transactions(head).await,
		}
	}

	fn socket_subscription(&self) -> Option<SocketSubscription> {
		match self {
			Self::Evm(provider) => provider.socket_subscription(),
			Self::Bitcoin(provider) => provider.socket_subscription(),
			Self::Solana(provider) => provider.socket_subscription(),
		}
	}

	fn head_from_notification(&self, notification: &Value) -> Option<BlockRef> {
		match self {
			Self::Evm(provider) => provider.head_from_notification(notification),
			Self::Bitcoin(provider) => provider.head_from_notification(notification),
			Self::Solana(provider) => provider.head_from_notification(notification),
		}
	}
}
