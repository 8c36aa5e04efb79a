use serde_json::json;
use std::sync::Arc;

use blokbustr::{
	models::{
		evm::{EVMAssetTransfersPage, EVMBlock, EVMTransaction},
		Chain,
	},
	services::history::{HistoryError, HistoryFetcher, HistoryService, MAX_HISTORY_PAGES},
};

use crate::integration::mocks::{MockEvmClientTrait, StaticClientPool};

const SENDER: &str = "0xabc";
const BLOCK_100_TIME: &str = "2023-11-14T22:13:20.000Z";

fn transfer(hash: &str, block: u64, time: &str) -> serde_json::Value {
	json!({
		"blockNum": format!("0x{:x}", block),
		"hash": hash,
		"from": SENDER,
		"to": "0xdef",
		"rawContract": {"value": "0x3e8"},
		"metadata": {"blockTimestamp": time}
	})
}

fn page(transfers: Vec<serde_json::Value>, page_key: Option<&str>) -> EVMAssetTransfersPage {
	serde_json::from_value(json!({"transfers": transfers, "pageKey": page_key})).unwrap()
}

fn full_page(page_index: usize) -> EVMAssetTransfersPage {
	let transfers = (0..1000)
		.map(|i| transfer(&format!("0x{}-{}", page_index, i), 100 + page_index as u64, BLOCK_100_TIME))
		.collect();
	page(transfers, Some("more"))
}

fn expect_reference(client: &mut MockEvmClientTrait) {
	client
		.expect_get_transaction_by_hash()
		.withf(|hash| hash == "0xref")
		.times(1)
		.returning(|_| {
			Ok(Some(
				serde_json::from_value::<EVMTransaction>(json!({
					"hash": "0xref",
					"from": "0xfunder",
					"to": SENDER,
					"value": "0x3e8",
					"blockNumber": "0x64"
				}))
				.unwrap(),
			))
		});
	client
		.expect_get_block_by_number()
		.withf(|number| *number == 100)
		.times(1)
		.returning(|_| {
			Ok(serde_json::from_value::<EVMBlock>(json!({
				"number": "0x64",
				"timestamp": "0x6553f100",
				"transactions": ["0xref"]
			}))
			.unwrap())
		});
}

fn service(client: MockEvmClientTrait) -> HistoryService<StaticClientPool> {
	HistoryService::new(Arc::new(StaticClientPool {
		evm: Some(Arc::new(client)),
		..Default::default()
	}))
}

#[tokio::test]
async fn test_history_starts_after_reference() {
	let mut client = MockEvmClientTrait::new();
	expect_reference(&mut client);
	client
		.expect_get_asset_transfers()
		.withf(|address, from_block, page_key| {
			address == SENDER && *from_block == Some(100) && page_key.is_none()
		})
		.times(1)
		.returning(|_, _, _| {
			Ok(page(
				vec![
					transfer("0xref", 100, BLOCK_100_TIME),
					transfer("0xnext", 101, "2023-11-14T22:13:32.000Z"),
				],
				None,
			))
		});

	let history = service(client)
		.fetch_history(Chain::Ethereum, SENDER, Some("0xref"))
		.await
		.unwrap();

	assert_eq!(history.len(), 1);
	assert_eq!(history[0].hash, "0xnext");
	assert_eq!(history[0].value, "1000");
	assert_eq!(history[0].block_number, 101);
}

#[tokio::test]
async fn test_same_block_is_excluded_when_reference_is_absent() {
	let mut client = MockEvmClientTrait::new();
	expect_reference(&mut client);
	client.expect_get_asset_transfers().returning(|_, _, _| {
		Ok(page(
			vec![
				transfer("0xsibling", 100, BLOCK_100_TIME),
				transfer("0xlater", 102, "2023-11-14T22:13:44.000Z"),
			],
			None,
		))
	});

	let history = service(client)
		.fetch_history(Chain::Ethereum, SENDER, Some("0xref"))
		.await
		.unwrap();
	let hashes: Vec<&str> = history.iter().map(|tx| tx.hash.as_str()).collect();
	assert_eq!(hashes, vec!["0xlater"]);
}

#[tokio::test]
async fn test_unknown_reference_fetches_nothing() {
	let mut client = MockEvmClientTrait::new();
	client
		.expect_get_transaction_by_hash()
		.returning(|_| Ok(None));
	client.expect_get_asset_transfers().times(0);

	let result = service(client)
		.fetch_history(Chain::Ethereum, SENDER, Some("0xmissing"))
		.await;
	assert!(matches!(result, Err(HistoryError::ReferenceNotFound(_))));
}

#[tokio::test]
async fn test_recent_pages_are_followed_and_reordered() {
	let mut client = MockEvmClientTrait::new();
	client
		.expect_get_asset_transfers()
		.withf(|_, from_block, page_key| from_block.is_none() && page_key.is_none())
		.times(1)
		.returning(|_, _, _| Ok(full_page(1)));
	client
		.expect_get_asset_transfers()
		.withf(|_, _, page_key| page_key.as_deref() == Some("more"))
		.times(1)
		.returning(|_, _, _| Ok(page(vec![transfer("0xoldest", 50, BLOCK_100_TIME)], None)));

	let history = service(client)
		.fetch_history(Chain::Ethereum, SENDER, None)
		.await
		.unwrap();
	assert_eq!(history.len(), 1001);
	assert_eq!(history[0].hash, "0xoldest");
	// Newest first within a block becomes oldest first
	assert_eq!(history[1].hash, "0x1-999");
	assert_eq!(history.last().unwrap().hash, "0x1-0");
}

#[tokio::test]
async fn test_unbounded_history_is_capped() {
	let mut client = MockEvmClientTrait::new();
	client
		.expect_get_asset_transfers()
		.times(MAX_HISTORY_PAGES)
		.returning(|_, _, _| Ok(full_page(1)));

	let history = service(client)
		.fetch_history(Chain::Ethereum, SENDER, None)
		.await
		.unwrap();
	assert_eq!(history.len(), 1000 * MAX_HISTORY_PAGES);
}
