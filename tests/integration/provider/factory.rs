use std::sync::Arc;

use blokbustr::{
	models::{Chain, ConnectionMode},
	services::provider::{create_provider, ChainProvider, ProviderError},
};

use crate::integration::mocks::{
	MockBitcoinClientTrait, MockEvmClientTrait, MockSolanaClientTrait, StaticClientPool,
};

fn full_pool() -> StaticClientPool {
	StaticClientPool {
		evm: Some(Arc::new(MockEvmClientTrait::new())),
		bitcoin: Some(Arc::new(MockBitcoinClientTrait::new())),
		esplora: None,
		solana: Some(Arc::new(MockSolanaClientTrait::new())),
	}
}

#[tokio::test]
async fn test_provider_per_chain() {
	let pool = full_pool();
	for chain in Chain::ALL {
		let provider = create_provider(chain, ConnectionMode::Polling, &pool)
			.await
			.unwrap();
		assert_eq!(provider.chain(), chain);
	}
}

#[tokio::test]
async fn test_bitcoin_socket_mode_is_rejected() {
	let result = create_provider(Chain::Bitcoin, ConnectionMode::Socket, &full_pool()).await;
	assert!(matches!(result, Err(ProviderError::ConfigurationError(_))));
}

#[tokio::test]
async fn test_socket_mode_for_subscribing_chains() {
	let pool = full_pool();
	for chain in [Chain::Ethereum, Chain::Solana] {
		let provider = create_provider(chain, ConnectionMode::Socket, &pool)
			.await
			.unwrap();
		assert!(provider.socket_subscription().is_some());
	}
}

#[tokio::test]
async fn test_missing_client_is_an_error() {
	let result =
		create_provider(Chain::Solana, ConnectionMode::Polling, &StaticClientPool::default()).await;
	assert!(matches!(result, Err(ProviderError::NetworkError(_))));
}
