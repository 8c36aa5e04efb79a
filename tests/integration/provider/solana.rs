use serde_json::json;
use std::sync::Arc;

use blokbustr::{
	models::{solana::SolanaBlock, BlockRef},
	services::provider::{ChainProvider, SolanaProvider},
};

use crate::integration::mocks::MockSolanaClientTrait;

fn block_with_pruned_meta() -> SolanaBlock {
	serde_json::from_value(json!({
		"blockhash": "bh",
		"blockTime": 1700000000,
		"transactions": [
			{
				"transaction": {
					"signatures": ["sig1"],
					"message": {"accountKeys": ["payer", "recipient"], "header": {"numRequiredSignatures": 1}}
				},
				"meta": {"preBalances": [1000, 0], "postBalances": [700, 250]}
			},
			{
				"transaction": {
					"signatures": ["sig2"],
					"message": {"accountKeys": ["payer", "other"], "header": {"numRequiredSignatures": 1}}
				},
				"meta": null
			}
		]
	}))
	.unwrap()
}

#[tokio::test]
async fn test_transactions_without_meta_are_skipped() {
	let mut client = MockSolanaClientTrait::new();
	client
		.expect_get_block()
		.withf(|slot| *slot == 250)
		.returning(|_| Ok(Some(block_with_pruned_meta())));

	let provider = SolanaProvider::new(Arc::new(client));
	let transactions = provider
		.block_transactions(&BlockRef::Height(250))
		.await
		.unwrap();

	assert_eq!(transactions.len(), 1);
	assert_eq!(transactions[0].hash, "sig1");
	assert_eq!(transactions[0].to.as_deref(), Some("recipient"));
	assert_eq!(transactions[0].value, "250");
	assert_eq!(transactions[0].block_number, 250);
	assert_eq!(transactions[0].timestamp, 1_700_000_000);
}

#[tokio::test]
async fn test_skipped_slot_yields_nothing() {
	let mut client = MockSolanaClientTrait::new();
	client.expect_get_block().returning(|_| Ok(None));

	let provider = SolanaProvider::new(Arc::new(client));
	assert!(provider
		.block_transactions(&BlockRef::Height(251))
		.await
		.unwrap()
		.is_empty());
}

#[tokio::test]
async fn test_slot_notifications() {
	let provider = SolanaProvider::new(Arc::new(MockSolanaClientTrait::new()));
	assert_eq!(
		provider.head_from_notification(&json!({"parent": 9, "root": 1, "slot": 10})),
		Some(BlockRef::Height(10))
	);
	assert_eq!(provider.socket_subscription().unwrap().method, "slotSubscribe");
}
