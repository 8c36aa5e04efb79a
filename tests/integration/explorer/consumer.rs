use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;

use blokbustr::services::explorer::{ExplorerError, QueueConsumer, QueueError, QueueMessage};

use crate::integration::mocks::{MockTaskQueue, StubHistoryFetcher};

fn message(id: &str, body: serde_json::Value) -> QueueMessage {
	QueueMessage {
		id: id.to_string(),
		body: body.to_string(),
		receipt_handle: format!("receipt-{}", id),
	}
}

fn task_body(depth: u32) -> serde_json::Value {
	json!({
		"address": "A",
		"startTx": "X",
		"amountToTrack": "10",
		"chain": "ETHEREUM",
		"depth": depth
	})
}

#[tokio::test]
async fn test_processed_message_is_acknowledged() {
	let mut queue = MockTaskQueue::new();
	queue.expect_submit().times(0);
	queue
		.expect_acknowledge()
		.withf(|message| message.receipt_handle == "receipt-1")
		.times(1)
		.returning(|_| Ok(()));

	let consumer = QueueConsumer::new(
		Arc::new(StubHistoryFetcher::returning(vec![])),
		Arc::new(queue),
	);
	assert_eq!(consumer.handle(&message("1", task_body(0))).await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_message_is_left_on_queue() {
	let mut queue = MockTaskQueue::new();
	queue.expect_acknowledge().times(0);

	let history = Arc::new(StubHistoryFetcher::returning(vec![]));
	let consumer = QueueConsumer::new(history.clone(), Arc::new(queue));
	let result = consumer
		.handle(&message("1", json!({"address": "A"})))
		.await;

	assert!(matches!(result, Err(ExplorerError::DecodeError(_))));
	assert_eq!(history.call_count(), 0);
}

#[tokio::test]
async fn test_failed_exploration_is_left_on_queue() {
	let mut queue = MockTaskQueue::new();
	queue.expect_acknowledge().times(0);

	let consumer = QueueConsumer::new(
		Arc::new(StubHistoryFetcher::failing("X")),
		Arc::new(queue),
	);
	let result = consumer.handle(&message("1", task_body(0))).await;
	assert!(matches!(result, Err(ExplorerError::HistoryError(_))));
}

#[tokio::test]
async fn test_batch_counts_acknowledged_messages() {
	let mut queue = MockTaskQueue::new();
	queue.expect_receive().times(1).returning(|| {
		Ok(vec![
			message("ok", task_body(5)),
			message("broken", json!("not a task")),
			message("also-ok", task_body(5)),
		])
	});
	queue
		.expect_acknowledge()
		.times(2)
		.returning(|message| {
			assert_ne!(message.id, "broken");
			Ok(())
		});

	let consumer = QueueConsumer::new(
		Arc::new(StubHistoryFetcher::returning(vec![])),
		Arc::new(queue),
	);
	assert_eq!(consumer.process_batch().await, 2);
}

#[tokio::test]
async fn test_receive_failure_processes_nothing() {
	let mut queue = MockTaskQueue::new();
	queue
		.expect_receive()
		.returning(|| Err(QueueError::receive_error("access denied")));
	queue.expect_acknowledge().times(0);

	let consumer = QueueConsumer::new(
		Arc::new(StubHistoryFetcher::returning(vec![])),
		Arc::new(queue),
	);
	assert_eq!(consumer.process_batch().await, 0);
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
	let mut queue = MockTaskQueue::new();
	queue.expect_receive().returning(|| Ok(vec![]));

	let consumer = QueueConsumer::new(
		Arc::new(StubHistoryFetcher::returning(vec![])),
		Arc::new(queue),
	);
	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let stopper = tokio::spawn(async move {
		tokio::time::sleep(std::time::Duration::from_millis(50)).await;
		let _ = shutdown_tx.send(true);
	});

	tokio::time::timeout(std::time::Duration::from_secs(5), consumer.run(shutdown_rx))
		.await
		.unwrap();
	stopper.await.unwrap();
}
