//! Bootstrap of the `watch`, `explore` and `seed` commands.
//!
//! Each command builds its services from the [`ServiceConfig`], runs until its shutdown signal
//! fires and releases what it started. Startup failures are returned to the caller, which maps
//! them to a non-zero exit code.

use std::{error::Error, sync::Arc};
use tokio::sync::watch;
use tokio_cron_scheduler::JobScheduler;

use crate::{
	models::{is_integer_amount, Chain, ConnectionMode, ExplorationTask, ServiceConfig},
	services::{
		blockchain::ClientPool,
		explorer::{QueueConsumer, SqsTaskQueue, TaskQueue},
		history::HistoryService,
		matcher::{RedisWatchedAddressStore, WatchMatcher},
		notification::NotificationService,
		provider::{create_provider, FeedOptions, TransactionFeedService},
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Feed options of the watcher for `chain` in `mode`
///
/// # Errors
/// Returns an error when socket mode is selected without a socket endpoint
pub fn feed_options(
	config: &ServiceConfig,
	chain: Chain,
	mode: ConnectionMode,
) -> Result<FeedOptions> {
	match mode {
		ConnectionMode::Polling => Ok(FeedOptions::polling(config.poll_interval(chain))),
		ConnectionMode::Socket => {
			let url = config
				.endpoints(chain)
				.and_then(|endpoints| endpoints.socket.clone())
				.ok_or_else(|| format!("{}_SOCKET is required for socket connections", chain))?;
			Ok(FeedOptions::socket(url))
		}
	}
}

/// Builds the depth 0 task of a trace
///
/// # Arguments
/// * `chain` - Chain identifier, case-insensitive
/// * `address` - Seed address
/// * `start_tx` - Transaction after which the trace starts, the full history when None
/// * `amount` - Amount to track as a decimal integer, 0 when None
pub fn seed_task(
	chain: &str,
	address: &str,
	start_tx: Option<&str>,
	amount: Option<&str>,
) -> Result<ExplorationTask> {
	let chain: Chain = chain.parse()?;
	let address = address.trim();
	if address.is_empty() {
		return Err("Seed address must not be empty".into());
	}
	let amount = amount.unwrap_or("0");
	if !is_integer_amount(amount) {
		return Err(format!("Amount must be a non-negative integer, got '{}'", amount).into());
	}
	Ok(ExplorationTask::seed(
		chain,
		address,
		start_tx.map(str::to_string),
		amount,
	))
}

/// Runs the watcher until `shutdown` fires
///
/// Transactions of the configured chain are matched against the watched-address store and
/// every match is notified.
pub async fn run_watcher(
	config: Arc<ServiceConfig>,
	mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
	let (chain, mode) = config.validate_watcher()?;
	let options = feed_options(&config, chain, mode)?;

	let store = RedisWatchedAddressStore::new(config.require_redis_url()?).await?;
	let notifier = NotificationService::new(config.notify_webhook_url.as_deref())?;
	let matcher = WatchMatcher::new(chain, Arc::new(store), Arc::new(notifier));

	let pool = ClientPool::new(config.clone());
	let provider = create_provider(chain, mode, &pool).await?;
	let feed_service = TransactionFeedService::<_, JobScheduler>::new(Arc::new(provider));
	let (feed, handle) = feed_service.subscribe(options).await?;
	tracing::info!(%chain, %mode, "Watcher started");

	let matching = matcher.run(feed);
	tokio::pin!(matching);
	tokio::select! {
		_ = &mut matching => {
			tracing::warn!(%chain, "Transaction feed closed unexpectedly");
			handle.stop().await?;
			return Ok(());
		}
		_ = shutdown.changed() => {}
	}

	tracing::info!(%chain, "Stopping watcher");
	// Matching keeps draining the feed until every producer has let go of it
	let (stopped, matched) = tokio::join!(handle.stop(), &mut matching);
	stopped?;
	tracing::info!(%chain, matched, "Watcher stopped");
	Ok(())
}

/// Runs an explorer worker until `shutdown` fires
pub async fn run_explorer(
	config: Arc<ServiceConfig>,
	shutdown: watch::Receiver<bool>,
) -> Result<()> {
	let queue_url = config.require_queue_url()?;
	let queue = Arc::new(SqsTaskQueue::new(queue_url, config.aws_region.as_str()).await);
	let history = Arc::new(HistoryService::new(Arc::new(ClientPool::new(
		config.clone(),
	))));

	QueueConsumer::new(history, queue).run(shutdown).await;
	Ok(())
}

/// Submits the seed task of a new trace
pub async fn run_seed(config: Arc<ServiceConfig>, task: ExplorationTask) -> Result<()> {
	let queue = SqsTaskQueue::new(config.require_queue_url()?, config.aws_region.as_str()).await;
	queue.submit(&task).await?;
	tracing::info!(
		chain = %task.chain,
		address = %task.address,
		start_tx = task.start_tx.as_deref().unwrap_or("-"),
		"Seed task submitted"
	);
	Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix
pub async fn wait_for_shutdown_signal() {
	#[cfg(unix)]
	{
		use tokio::signal::unix::{signal, SignalKind};
		match signal(SignalKind::terminate()) {
			Ok(mut terminate) => {
				tokio::select! {
					_ = tokio::signal::ctrl_c() => {}
					_ = terminate.recv() => {}
				}
				return;
			}
			Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
		}
	}

	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!("Error waiting for Ctrl+C: {}", e);
	}
}
