use async_trait::async_trait;
use serde_json::json;
use std::{
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc, Mutex,
	},
	time::Duration,
};

use blokbustr::{
	models::{
		evm::{EVMAssetTransfersPage, EVMBlock, EVMTransaction},
		BlockRef,
	},
	services::{
		blockchain::{BlockChainError, EvmClientTrait},
		provider::{ChainProvider, EvmProvider, ProviderError, EVM_DETAIL_BATCH_SIZE},
	},
};

use crate::integration::mocks::MockEvmClientTrait;

fn block(hashes: &[&str]) -> EVMBlock {
	serde_json::from_value(json!({
		"number": "0x64",
		"hash": "0xblock",
		"timestamp": "0x6553f100",
		"transactions": hashes,
	}))
	.unwrap()
}

fn transaction(hash: &str, to: &str, value: &str) -> EVMTransaction {
	serde_json::from_value(json!({
		"hash": hash,
		"from": "0xsender",
		"to": to,
		"value": value,
		"blockNumber": "0x64",
	}))
	.unwrap()
}

#[tokio::test]
async fn test_block_transactions_keep_block_order() {
	let mut client = MockEvmClientTrait::new();
	client
		.expect_get_block_by_number()
		.withf(|number| *number == 100)
		.times(1)
		.returning(|_| Ok(block(&["0x1", "0x2", "0x3"])));
	client
		.expect_get_transaction_by_hash()
		.times(3)
		.returning(|hash| Ok(Some(transaction(hash, "0xrecipient", "0x5"))));

	let provider = EvmProvider::new(Arc::new(client));
	let transactions = provider
		.block_transactions(&BlockRef::Height(100))
		.await
		.unwrap();

	let hashes: Vec<&str> = transactions.iter().map(|tx| tx.hash.as_str()).collect();
	assert_eq!(hashes, vec!["0x1", "0x2", "0x3"]);
	assert!(transactions
		.iter()
		.all(|tx| tx.value == "5" && tx.timestamp == 1_700_000_000 && tx.block_number == 100));
}

#[tokio::test]
async fn test_missing_and_failed_lookups_are_dropped() {
	let mut client = MockEvmClientTrait::new();
	client
		.expect_get_block_by_number()
		.returning(|_| Ok(block(&["0xok", "0xmissing", "0xfailing"])));
	client
		.expect_get_transaction_by_hash()
		.returning(|hash| match hash {
			"0xok" => Ok(Some(transaction("0xok", "0xrecipient", "0x1"))),
			"0xmissing" => Ok(None),
			_ => Err(BlockChainError::request_error("rate limited")),
		});

	let provider = EvmProvider::new(Arc::new(client));
	let transactions = provider
		.block_transactions(&BlockRef::Height(100))
		.await
		.unwrap();
	assert_eq!(transactions.len(), 1);
	assert_eq!(transactions[0].hash, "0xok");
}

#[tokio::test]
async fn test_block_fetch_failure_is_an_error() {
	let mut client = MockEvmClientTrait::new();
	client
		.expect_get_block_by_number()
		.returning(|number| Err(BlockChainError::block_not_found(number)));

	let provider = EvmProvider::new(Arc::new(client));
	let result = provider.block_transactions(&BlockRef::Height(7)).await;
	assert!(matches!(result, Err(ProviderError::NetworkError(_))));
}

#[tokio::test]
async fn test_hash_head_is_rejected() {
	let provider = EvmProvider::new(Arc::new(MockEvmClientTrait::new()));
	let result = provider
		.block_transactions(&BlockRef::Hash("0xabc".to_string()))
		.await;
	assert!(matches!(result, Err(ProviderError::ProcessingError(_))));
}

#[tokio::test]
async fn test_latest_head_and_notifications() {
	let mut client = MockEvmClientTrait::new();
	client
		.expect_get_latest_block_number()
		.returning(|| Ok(19_000_000));
	let provider = EvmProvider::new(Arc::new(client));

	assert_eq!(
		provider.latest_head().await.unwrap(),
		BlockRef::Height(19_000_000)
	);
	assert_eq!(
		provider.head_from_notification(&json!({"number": "0x10", "hash": "0xh"})),
		Some(BlockRef::Height(16))
	);
	assert_eq!(provider.head_from_notification(&json!({"hash": "0xh"})), None);
	assert_eq!(
		provider.socket_subscription().unwrap().method,
		"eth_subscribe"
	);
}

/// Client recording how many transaction lookups overlap
struct InFlightClient {
	hashes: Vec<String>,
	in_flight: AtomicUsize,
	max_in_flight: AtomicUsize,
	started: Mutex<Vec<String>>,
}

impl InFlightClient {
	fn with_hashes(count: usize) -> Self {
		Self {
			hashes: (0..count).map(|i| format!("0x{}", i)).collect(),
			in_flight: AtomicUsize::new(0),
			max_in_flight: AtomicUsize::new(0),
			started: Mutex::new(Vec::new()),
		}
	}
}

#[async_trait]
impl EvmClientTrait for InFlightClient {
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError> {
		Ok(100)
	}

	async fn get_block_by_number(&self, _number: u64) -> Result<EVMBlock, BlockChainError> {
		let hashes: Vec<&str> = self.hashes.iter().map(String::as_str).collect();
		Ok(block(&hashes))
	}

	async fn get_transaction_by_hash(
		&self,
		hash: &str,
	) -> Result<Option<EVMTransaction>, BlockChainError> {
		let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
		self.max_in_flight.fetch_max(now, Ordering::SeqCst);
		self.started.lock().unwrap().push(hash.to_string());

		tokio::time::sleep(Duration::from_millis(20)).await;

		self.in_flight.fetch_sub(1, Ordering::SeqCst);
		Ok(Some(transaction(hash, "0xrecipient", "0x1")))
	}

	async fn get_asset_transfers(
		&self,
		_from_address: &str,
		_from_block: Option<u64>,
		_page_key: Option<String>,
	) -> Result<EVMAssetTransfersPage, BlockChainError> {
		Ok(EVMAssetTransfersPage::default())
	}
}

#[tokio::test]
async fn test_transaction_lookups_run_in_sequential_batches() {
	let client = Arc::new(InFlightClient::with_hashes(7));
	let provider = EvmProvider::new(client.clone());

	let transactions = provider
		.block_transactions(&BlockRef::Height(100))
		.await
		.unwrap();

	assert_eq!(transactions.len(), 7);
	assert_eq!(
		client.max_in_flight.load(Ordering::SeqCst),
		EVM_DETAIL_BATCH_SIZE
	);
	// Batches start in block order
	assert_eq!(*client.started.lock().unwrap(), client.hashes);
}
