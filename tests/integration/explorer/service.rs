use std::sync::Arc;
use tracing_test::traced_test;

use blokbustr::{
	models::{Chain, ExplorationTask, StandardTransaction, MAX_DEPTH},
	services::explorer::{Explorer, ExplorerError, QueueError},
};

use crate::integration::mocks::{MockTaskQueue, RecordingQueue, StubHistoryFetcher};

fn seed() -> ExplorationTask {
	ExplorationTask::seed(Chain::Ethereum, "A", Some("X".to_string()), "10")
}

fn outbound(hash: &str, to: Option<&str>, value: &str, block: u64) -> StandardTransaction {
	StandardTransaction::new(hash, "A", to.map(str::to_string), value, block, 1_700_000_000)
}

#[tokio::test]
async fn test_flow_produces_child_task() {
	let history = Arc::new(StubHistoryFetcher::returning(vec![outbound(
		"Y",
		Some("B"),
		"7",
		101,
	)]));
	let queue = Arc::new(RecordingQueue::default());
	let explorer = Explorer::new(history.clone(), queue.clone());

	assert_eq!(explorer.explore(&seed()).await.unwrap(), 1);

	let submitted = queue.submitted();
	assert_eq!(submitted.len(), 1);
	assert_eq!(submitted[0].address, "B");
	assert_eq!(submitted[0].start_tx.as_deref(), Some("Y"));
	assert_eq!(submitted[0].amount_to_track, "7");
	assert_eq!(submitted[0].chain, Chain::Ethereum);
	assert_eq!(submitted[0].depth, 1);

	let calls = history.calls.lock().unwrap().clone();
	assert_eq!(
		calls,
		vec![(Chain::Ethereum, "A".to_string(), Some("X".to_string()))]
	);
}

#[tokio::test]
#[traced_test]
async fn test_depth_limit_submits_nothing() {
	let history = Arc::new(StubHistoryFetcher::returning(vec![outbound(
		"Y",
		Some("B"),
		"7",
		101,
	)]));
	let queue = Arc::new(RecordingQueue::default());
	let explorer = Explorer::new(history.clone(), queue.clone());

	let mut task = seed();
	task.depth = MAX_DEPTH;
	assert_eq!(explorer.explore(&task).await.unwrap(), 0);

	assert!(queue.submitted().is_empty());
	assert_eq!(history.call_count(), 0);
	assert!(logs_contain("max depth reached"));
}

#[tokio::test]
async fn test_self_transfer_is_not_followed() {
	let history = Arc::new(StubHistoryFetcher::returning(vec![outbound(
		"Y",
		Some("A"),
		"7",
		101,
	)]));
	let queue = Arc::new(RecordingQueue::default());

	let submitted = Explorer::new(history, queue.clone())
		.explore(&seed())
		.await
		.unwrap();
	assert_eq!(submitted, 0);
	assert!(queue.submitted().is_empty());
}

#[tokio::test]
async fn test_zero_value_is_not_followed() {
	let history = Arc::new(StubHistoryFetcher::returning(vec![
		outbound("Y", Some("B"), "0", 101),
		outbound("Z", None, "5", 102),
	]));
	let queue = Arc::new(RecordingQueue::default());

	let submitted = Explorer::new(history, queue.clone())
		.explore(&seed())
		.await
		.unwrap();
	assert_eq!(submitted, 0);
	assert!(queue.submitted().is_empty());
}

#[tokio::test]
async fn test_children_follow_history_order() {
	let history = Arc::new(StubHistoryFetcher::returning(vec![
		outbound("Y1", Some("B"), "3", 101),
		outbound("Y2", Some("C"), "4", 102),
		outbound("Y3", Some("B"), "1", 103),
	]));
	let queue = Arc::new(RecordingQueue::default());

	let mut task = seed();
	task.depth = MAX_DEPTH - 1;
	let submitted = Explorer::new(history, queue.clone())
		.explore(&task)
		.await
		.unwrap();
	assert_eq!(submitted, 3);

	let children = queue.submitted();
	let hops: Vec<(&str, &str)> = children
		.iter()
		.map(|child| (child.address.as_str(), child.start_tx.as_deref().unwrap()))
		.collect();
	assert_eq!(hops, vec![("B", "Y1"), ("C", "Y2"), ("B", "Y3")]);
	assert!(children.iter().all(|child| child.depth == MAX_DEPTH));
}

#[tokio::test]
async fn test_history_failure_is_reported() {
	let history = Arc::new(StubHistoryFetcher::failing("X"));
	let mut queue = MockTaskQueue::new();
	queue.expect_submit().times(0);

	let result = Explorer::new(history, Arc::new(queue)).explore(&seed()).await;
	assert!(matches!(result, Err(ExplorerError::HistoryError(_))));
}

#[tokio::test]
async fn test_submit_failure_is_reported() {
	let history = Arc::new(StubHistoryFetcher::returning(vec![outbound(
		"Y",
		Some("B"),
		"7",
		101,
	)]));
	let mut queue = MockTaskQueue::new();
	queue
		.expect_submit()
		.times(1)
		.returning(|_| Err(QueueError::send_error("throttled")));

	let result = Explorer::new(history, Arc::new(queue)).explore(&seed()).await;
	assert!(matches!(result, Err(ExplorerError::QueueError(_))));
}
