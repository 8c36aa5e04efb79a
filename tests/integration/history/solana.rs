use serde_json::json;
use std::sync::Arc;

use blokbustr::{
	models::{
		solana::{SolanaConfirmedTransaction, SolanaSignatureInfo},
		Chain,
	},
	services::history::{HistoryError, HistoryFetcher, HistoryService},
};

use crate::integration::mocks::{MockSolanaClientTrait, StaticClientPool};

const ADDRESS: &str = "TrackedWallet";

fn signature(sig: &str, slot: u64) -> SolanaSignatureInfo {
	serde_json::from_value(json!({"signature": sig, "slot": slot, "blockTime": 1_700_000_000 + slot}))
		.unwrap()
}

fn confirmed(sig: &str, slot: u64, signer: &str, recipient: &str) -> SolanaConfirmedTransaction {
	serde_json::from_value(json!({
		"slot": slot,
		"blockTime": 1_700_000_000 + slot,
		"transaction": {
			"signatures": [sig],
			"message": {"accountKeys": [signer, recipient], "header": {"numRequiredSignatures": 1}}
		},
		"meta": {"preBalances": [5000, 0], "postBalances": [1000, 3000]}
	}))
	.unwrap()
}

fn service(client: MockSolanaClientTrait) -> HistoryService<StaticClientPool> {
	HistoryService::new(Arc::new(StaticClientPool {
		solana: Some(Arc::new(client)),
		..Default::default()
	}))
}

#[tokio::test]
async fn test_signed_transactions_after_reference() {
	let mut client = MockSolanaClientTrait::new();
	client
		.expect_get_signatures_for_address()
		.withf(|address, before, _| address == ADDRESS && before.is_none())
		.times(1)
		.returning(|_, _, _| {
			Ok(vec![
				signature("incoming", 103),
				signature("outgoing", 102),
				signature("ref", 100),
				signature("older", 99),
			])
		});
	client.expect_get_transaction().returning(|sig| {
		Ok(match sig {
			"ref" => Some(confirmed("ref", 100, "Funder", ADDRESS)),
			"outgoing" => Some(confirmed("outgoing", 102, ADDRESS, "NextHop")),
			"incoming" => Some(confirmed("incoming", 103, "Stranger", ADDRESS)),
			_ => None,
		})
	});

	let history = service(client)
		.fetch_history(Chain::Solana, ADDRESS, Some("ref"))
		.await
		.unwrap();

	assert_eq!(history.len(), 1);
	assert_eq!(history[0].hash, "outgoing");
	assert_eq!(history[0].to.as_deref(), Some("NextHop"));
	assert_eq!(history[0].value, "3000");
	assert_eq!(history[0].block_number, 102);
}

#[tokio::test]
async fn test_history_is_chronological() {
	let mut client = MockSolanaClientTrait::new();
	client.expect_get_signatures_for_address().returning(|_, _, _| {
		Ok(vec![signature("s3", 30), signature("s2", 20), signature("s1", 10)])
	});
	client
		.expect_get_transaction()
		.returning(|sig| {
			let slot = sig[1..].parse::<u64>().unwrap() * 10;
			Ok(Some(confirmed(sig, slot, ADDRESS, "Other")))
		});

	let history = service(client)
		.fetch_history(Chain::Solana, ADDRESS, None)
		.await
		.unwrap();
	let hashes: Vec<&str> = history.iter().map(|tx| tx.hash.as_str()).collect();
	assert_eq!(hashes, vec!["s1", "s2", "s3"]);
}

#[tokio::test]
async fn test_unknown_reference() {
	let mut client = MockSolanaClientTrait::new();
	client.expect_get_transaction().returning(|_| Ok(None));
	client.expect_get_signatures_for_address().times(0);

	let result = service(client)
		.fetch_history(Chain::Solana, ADDRESS, Some("missing"))
		.await;
	assert!(matches!(result, Err(HistoryError::ReferenceNotFound(_))));
}

#[tokio::test]
async fn test_missing_client_is_network_error() {
	let result = HistoryService::new(Arc::new(StaticClientPool::default()))
		.fetch_history(Chain::Solana, ADDRESS, None)
		.await;
	assert!(matches!(result, Err(HistoryError::NetworkError(_))));
}
