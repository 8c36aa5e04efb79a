use blokbustr::{models::BlockRef, services::provider::IngestionCursor};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_each_height_is_processed_at_most_once(
		heights in prop::collection::vec(0u64..50, 1..40),
	) {
		let runtime = tokio::runtime::Runtime::new().unwrap();
		let accepted: Vec<u64> = runtime.block_on(async {
			let cursor = IngestionCursor::new();
			let mut accepted = Vec::new();
			for height in &heights {
				if cursor.advance(&BlockRef::Height(*height)).await {
					accepted.push(*height);
				}
			}
			accepted
		});

		prop_assert!(accepted.windows(2).all(|pair| pair[0] < pair[1]));
		prop_assert_eq!(accepted.first(), heights.first());
		prop_assert_eq!(accepted.last(), heights.iter().max());
	}

	#[test]
	fn test_repeated_hash_is_processed_once(
		hash in "[0-9a-f]{64}",
		repeats in 1usize..10,
	) {
		let runtime = tokio::runtime::Runtime::new().unwrap();
		let processed = runtime.block_on(async {
			let cursor = IngestionCursor::new();
			let mut processed = 0;
			for _ in 0..repeats {
				if cursor.advance(&BlockRef::Hash(hash.clone())).await {
					processed += 1;
				}
			}
			processed
		});
		prop_assert_eq!(processed, 1);
	}
}
