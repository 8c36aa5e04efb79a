use serde_json::json;
use std::sync::Arc;

use blokbustr::{
	models::{bitcoin::EsploraTransaction, Chain},
	services::{
		blockchain::ESPLORA_PAGE_SIZE,
		history::{HistoryError, HistoryFetcher, HistoryService, MAX_HISTORY_PAGES},
	},
};

use crate::integration::mocks::{FakeEsploraClient, StaticClientPool};

const ADDRESS: &str = "bc1qtracked";

fn esplora_tx(txid: &str, sender: &str, height: u64) -> EsploraTransaction {
	serde_json::from_value(json!({
		"txid": txid,
		"vin": [{"prevout": {"scriptpubkey_address": sender, "value": 100000}}],
		"vout": [
			{"scriptpubkey_address": "bc1qnext", "value": 70000},
			{"scriptpubkey_address": sender, "value": 29000}
		],
		"status": {"confirmed": true, "block_height": height, "block_time": 1_700_000_000 + height * 600}
	}))
	.unwrap()
}

/// Spends by the tracked address, newest first, from `newest` down to `oldest`
fn spends(newest: u64, oldest: u64) -> Vec<EsploraTransaction> {
	(oldest..=newest)
		.rev()
		.map(|height| esplora_tx(&format!("t{}", height), ADDRESS, height))
		.collect()
}

fn service(esplora: Arc<FakeEsploraClient>) -> HistoryService<StaticClientPool> {
	HistoryService::new(Arc::new(StaticClientPool {
		esplora: Some(esplora),
		..Default::default()
	}))
}

#[tokio::test]
async fn test_history_after_reference_is_chronological() {
	let mut history = vec![esplora_tx("incoming", "bc1qsomeoneelse", 104)];
	history.extend(spends(103, 101));
	let esplora = Arc::new(FakeEsploraClient::new(history, ESPLORA_PAGE_SIZE));

	let result = service(esplora)
		.fetch_history(Chain::Bitcoin, ADDRESS, Some("t101"))
		.await
		.unwrap();

	let txids: Vec<&str> = result.iter().map(|tx| tx.hash.as_str()).collect();
	assert_eq!(txids, vec!["t102", "t103"]);
	assert_eq!(result[0].to.as_deref(), Some("bc1qnext"));
	assert_eq!(result[0].value, "70000");
}

#[tokio::test]
async fn test_paging_stops_once_reference_is_reached() {
	let esplora = Arc::new(FakeEsploraClient::new(spends(130, 101), ESPLORA_PAGE_SIZE));

	let result = service(esplora.clone())
		.fetch_history(Chain::Bitcoin, ADDRESS, Some("t120"))
		.await
		.unwrap();
	assert_eq!(esplora.pages_requested(), 1);
	assert_eq!(result.len(), 10);
	assert_eq!(result.first().unwrap().hash, "t121");
}

#[tokio::test]
async fn test_reference_on_second_page() {
	let esplora = Arc::new(FakeEsploraClient::new(spends(130, 101), ESPLORA_PAGE_SIZE));

	let result = service(esplora.clone())
		.fetch_history(Chain::Bitcoin, ADDRESS, Some("t105"))
		.await
		.unwrap();
	assert_eq!(esplora.pages_requested(), 2);
	assert_eq!(result.len(), 25);
	assert_eq!(result.first().unwrap().hash, "t106");
	assert_eq!(result.last().unwrap().hash, "t130");
}

#[tokio::test]
async fn test_history_without_reference_is_capped() {
	let esplora = Arc::new(FakeEsploraClient::new(spends(1300, 1001), ESPLORA_PAGE_SIZE));

	let result = service(esplora.clone())
		.fetch_history(Chain::Bitcoin, ADDRESS, None)
		.await
		.unwrap();
	assert_eq!(esplora.pages_requested(), MAX_HISTORY_PAGES);
	assert_eq!(result.len(), ESPLORA_PAGE_SIZE * MAX_HISTORY_PAGES);
}

#[tokio::test]
async fn test_unknown_reference() {
	let esplora = Arc::new(FakeEsploraClient::new(spends(103, 101), ESPLORA_PAGE_SIZE));

	let result = service(esplora.clone())
		.fetch_history(Chain::Bitcoin, ADDRESS, Some("nope"))
		.await;
	assert!(matches!(result, Err(HistoryError::ReferenceNotFound(_))));
	assert_eq!(esplora.pages_requested(), 0);
}
