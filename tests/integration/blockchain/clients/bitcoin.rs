use serde_json::json;

use blokbustr::services::blockchain::{BitcoinClient, BitcoinClientTrait, BlockChainError};

use crate::integration::mocks::{rpc_response, transport_returning, MockRpcTransport};

#[tokio::test]
async fn test_get_best_block_hash() {
	let client = BitcoinClient::new_with_transport(transport_returning(
		"getbestblockhash",
		json!("00000000000000000001"),
	));
	assert_eq!(
		client.get_best_block_hash().await.unwrap(),
		"00000000000000000001"
	);
}

#[tokio::test]
async fn test_get_block_uses_verbosity_one() {
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.withf(|method, params| method == "getblock" && params == &Some(json!(["bh", 1])))
		.times(1)
		.returning(|_, _| {
			Ok(rpc_response(json!({
				"hash": "bh",
				"height": 820000,
				"time": 1700000000,
				"tx": ["t1", "t2"]
			})))
		});

	let block = BitcoinClient::new_with_transport(transport)
		.get_block("bh")
		.await
		.unwrap();
	assert_eq!(block.height, 820000);
	assert_eq!(block.tx, vec!["t1", "t2"]);
}

#[tokio::test]
async fn test_get_raw_transaction() {
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.withf(|method, params| method == "getrawtransaction" && params == &Some(json!(["t1", 2])))
		.times(1)
		.returning(|_, _| {
			Ok(rpc_response(json!({
				"txid": "t1",
				"vin": [{"txid": "prev", "vout": 0, "prevout": {"scriptPubKey": {"address": "bc1qsender"}}}],
				"vout": [
					{"value": 0.015, "n": 0, "scriptPubKey": {"address": "bc1qrecipient"}},
					{"value": 0.5, "n": 1, "scriptPubKey": {"address": "bc1qsender"}}
				]
			})))
		});

	let tx = BitcoinClient::new_with_transport(transport)
		.get_raw_transaction("t1")
		.await
		.unwrap();
	let standard = tx.to_standard(820000, 1_700_000_000);
	assert_eq!(standard.from.as_vec(), vec!["bc1qsender"]);
	assert_eq!(standard.to.as_deref(), Some("bc1qrecipient"));
	assert_eq!(standard.value, "1500000");
}

#[tokio::test]
async fn test_malformed_transaction_is_transaction_error() {
	let client = BitcoinClient::new_with_transport(transport_returning(
		"getrawtransaction",
		json!({"unexpected": true}),
	));
	let result = client.get_raw_transaction("t1").await;
	assert!(matches!(result, Err(BlockChainError::TransactionError(_))));
}
