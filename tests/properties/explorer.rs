use crate::properties::strategies::{address_strategy, chain_strategy, history_strategy};

use async_trait::async_trait;
use blokbustr::{
	models::{Chain, ExplorationTask, StandardTransaction, MAX_DEPTH},
	services::{
		explorer::{Explorer, QueueError, QueueMessage, TaskQueue},
		history::{HistoryError, HistoryFetcher},
	},
};
use proptest::{prelude::*, test_runner::Config};
use std::sync::{Arc, Mutex};

struct FixedHistory(Vec<StandardTransaction>);

#[async_trait]
impl HistoryFetcher for FixedHistory {
	async fn fetch_history(
		&self,
		_chain: Chain,
		_address: &str,
		_from_tx: Option<&str>,
	) -> Result<Vec<StandardTransaction>, HistoryError> {
		Ok(self.0.clone())
	}
}

#[derive(Default)]
struct CollectingQueue(Mutex<Vec<ExplorationTask>>);

#[async_trait]
impl TaskQueue for CollectingQueue {
	async fn submit(&self, task: &ExplorationTask) -> Result<(), QueueError> {
		self.0.lock().unwrap().push(task.clone());
		Ok(())
	}

	async fn receive(&self) -> Result<Vec<QueueMessage>, QueueError> {
		Ok(Vec::new())
	}

	async fn acknowledge(&self, _message: &QueueMessage) -> Result<(), QueueError> {
		Ok(())
	}
}

fn task_and_history() -> impl Strategy<Value = (ExplorationTask, Vec<StandardTransaction>)> {
	(chain_strategy(), address_strategy(), 0u32..=MAX_DEPTH + 2).prop_flat_map(
		|(chain, address, depth)| {
			let mut task = ExplorationTask::seed(chain, address.clone(), None, "1");
			task.depth = depth;
			(Just(task), history_strategy(address))
		},
	)
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_children_never_exceed_max_depth((task, history) in task_and_history()) {
		let queue = Arc::new(CollectingQueue::default());
		let explorer = Explorer::new(Arc::new(FixedHistory(history.clone())), queue.clone());

		let runtime = tokio::runtime::Runtime::new().unwrap();
		let submitted = runtime.block_on(explorer.explore(&task)).unwrap();
		let children = queue.0.lock().unwrap().clone();

		prop_assert_eq!(submitted, children.len());
		prop_assert!(children.iter().all(|child| child.depth <= MAX_DEPTH));
		prop_assert!(children.iter().all(|child| child.depth == task.depth + 1));
		prop_assert!(children.iter().all(|child| child.chain == task.chain));
		prop_assert!(children.iter().all(|child| child.address != task.address));
		prop_assert!(children.iter().all(|child| child.amount_to_track != "0"));
		if task.depth >= MAX_DEPTH {
			prop_assert!(children.is_empty());
		}
	}
}
