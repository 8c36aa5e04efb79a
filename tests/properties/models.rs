use alloy::primitives::U256;
use blokbustr::models::{
	bitcoin::btc_to_sats, evm::EVMTransaction, is_integer_amount, solana::SolanaBlock,
};
use proptest::{prelude::*, test_runner::Config};
use serde_json::json;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_btc_amounts_become_whole_satoshis(
		whole in 0u64..21_000_000,
		fraction in 0u64..100_000_000,
	) {
		let raw = format!("{}.{:08}", whole, fraction);
		let number: serde_json::Number = serde_json::from_str(&raw).unwrap();
		let sats = btc_to_sats(&number).unwrap();

		prop_assert!(is_integer_amount(&sats));
		prop_assert_eq!(sats, (whole * 100_000_000 + fraction).to_string());
	}

	#[test]
	fn test_evm_values_are_decimal(limbs in any::<[u64; 4]>(), timestamp in any::<u32>()) {
		let value = U256::from_limbs(limbs);
		let tx: EVMTransaction = serde_json::from_value(json!({
			"hash": "0x01",
			"from": "0xaa",
			"to": "0xbb",
			"value": format!("0x{:x}", value),
			"blockNumber": "0x1"
		}))
		.unwrap();

		let standard = tx.to_standard(u64::from(timestamp));
		prop_assert!(is_integer_amount(&standard.value));
		prop_assert_eq!(standard.value, value.to_string());
	}

	#[test]
	fn test_solana_values_are_lamport_deltas(
		balances in prop::collection::vec((any::<u32>(), any::<u32>()), 2..6),
	) {
		let keys: Vec<String> = (0..balances.len()).map(|i| format!("acct{}", i)).collect();
		let pre: Vec<u64> = balances.iter().map(|(pre, _)| u64::from(*pre)).collect();
		let post: Vec<u64> = balances.iter().map(|(_, post)| u64::from(*post)).collect();
		let block: SolanaBlock = serde_json::from_value(json!({
			"blockTime": 1_700_000_000,
			"transactions": [{
				"transaction": {
					"signatures": ["sig"],
					"message": {"accountKeys": keys, "header": {"numRequiredSignatures": 1}}
				},
				"meta": {"preBalances": pre, "postBalances": post}
			}]
		}))
		.unwrap();

		let standard = block.transactions[0].to_standard(1, 1_700_000_000).unwrap();
		prop_assert!(is_integer_amount(&standard.value));

		let expected = (1..balances.len())
			.find(|&i| post[i] > pre[i])
			.map(|i| (post[i] - pre[i]).to_string())
			.unwrap_or_else(|| "0".to_string());
		prop_assert_eq!(standard.value, expected);
	}
}
