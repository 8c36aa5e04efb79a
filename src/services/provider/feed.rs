//! Transaction feed driven by polling or socket notifications.
//!
//! [`TransactionFeedService::subscribe`] returns a stream of canonical transactions together with
//! a [`FeedHandle`]. The stream ends once the handle is stopped and in-flight work drained.

use futures::Stream;
use std::{
	marker::PhantomData,
	pin::Pin,
	sync::Arc,
	task::{Context, Poll},
	time::Duration,
};
use tokio::{
	sync::{mpsc, watch, Mutex},
	task::JoinHandle,
};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
	models::{BlockRef, Chain, ConnectionMode, StandardTransaction},
	services::{
		blockchain::{WsConfig, WsSubscriptionClient},
		provider::{ChainProvider, IngestionCursor, JobSchedulerTrait, ProviderError},
	},
};

/// Number of transactions buffered between the provider and the consumer
const FEED_BUFFER: usize = 1024;

/// Number of socket notifications buffered before head processing
const NOTIFICATION_BUFFER: usize = 64;

type SenderSlot = Arc<Mutex<Option<mpsc::Sender<StandardTransaction>>>>;

/// How a feed ingests its chain
#[derive(Debug, Clone)]
pub struct FeedOptions {
	/// Polling or socket ingestion
	pub mode: ConnectionMode,
	/// Interval between two polling ticks
	pub poll_interval: Duration,
	/// Socket endpoint, required in socket mode
	pub socket_url: Option<String>,
	/// Socket connection settings
	pub ws_config: WsConfig,
}

impl FeedOptions {
	/// Polling every `poll_interval`
	pub fn polling(poll_interval: Duration) -> Self {
		Self {
			mode: ConnectionMode::Polling,
			poll_interval,
			socket_url: None,
			ws_config: WsConfig::default(),
		}
	}

	/// Subscribing on `socket_url`
	pub fn socket(socket_url: impl Into<String>) -> Self {
		Self {
			mode: ConnectionMode::Socket,
			poll_interval: Duration::ZERO,
			socket_url: Some(socket_url.into()),
			ws_config: WsConfig::default(),
		}
	}
}

/// Stream of canonical transactions, in block order
pub struct TransactionFeed {
	receiver: mpsc::Receiver<StandardTransaction>,
}

impl Stream for TransactionFeed {
	type Item = StandardTransaction;

	fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		self.get_mut().receiver.poll_recv(cx)
	}
}

/// Scheduled work behind a [`TransactionFeed`]
pub struct FeedHandle<S: JobSchedulerTrait = JobScheduler> {
	chain: Chain,
	scheduler: Option<S>,
	sender: SenderSlot,
	shutdown: watch::Sender<bool>,
	tasks: Vec<JoinHandle<()>>,
}

impl<S: JobSchedulerTrait> FeedHandle<S> {
	/// Chain fed by this handle
	pub fn chain(&self) -> Chain {
		self.chain
	}

	/// Stops scheduling new ticks and closes the feed
	///
	/// Requests already in flight are allowed to finish. Their transactions are delivered while
	/// the feed has room and dropped once it is full, so stopping never waits on the reader.
	pub async fn stop(mut self) -> Result<(), ProviderError> {
		let _ = self.shutdown.send(true);
		self.sender.lock().await.take();

		if let Some(mut scheduler) = self.scheduler.take() {
			scheduler.shutdown().await.map_err(|e| {
				ProviderError::scheduler_error(format!("Failed to stop scheduler: {}", e))
			})?;
		}
		for task in self.tasks.drain(..) {
			if let Err(e) = task.await {
				tracing::warn!(chain = %self.chain, "Feed task ended abnormally: {}", e);
			}
		}

		tracing::info!(chain = %self.chain, "Transaction feed stopped");
		Ok(())
	}
}

/// Turns a [`ChainProvider`] into a running transaction feed
pub struct TransactionFeedService<P: ChainProvider, S: JobSchedulerTrait = JobScheduler> {
	provider: Arc<P>,
	cursor: IngestionCursor,
	_scheduler: PhantomData<S>,
}

impl<P: ChainProvider + 'static, S: JobSchedulerTrait + 'static> TransactionFeedService<P, S> {
	/// Creates a service with a fresh ingestion cursor
	pub fn new(provider: Arc<P>) -> Self {
		Self {
			provider,
			cursor: IngestionCursor::new(),
			_scheduler: PhantomData,
		}
	}

	/// Cursor shared by every tick of this service
	pub fn cursor(&self) -> &IngestionCursor {
		&self.cursor
	}

	/// Starts ingesting and returns the feed with its handle
	///
	/// # Errors
	/// * `ConfigurationError` - Socket mode on a chain without subscriptions, or no socket URL
	/// * `SchedulerError` - The polling job could not be scheduled
	pub async fn subscribe(
		&self,
		options: FeedOptions,
	) -> Result<(TransactionFeed, FeedHandle<S>), ProviderError> {
		let chain = self.provider.chain();
		let (sender, receiver) = mpsc::channel(FEED_BUFFER);
		let sender: SenderSlot = Arc::new(Mutex::new(Some(sender)));
		let (shutdown, _) = watch::channel(false);

		let mut handle = FeedHandle {
			chain,
			scheduler: None,
			sender: sender.clone(),
			shutdown,
			tasks: Vec::new(),
		};

		match options.mode {
			ConnectionMode::Polling => {
				handle.scheduler = Some(
					self.schedule_polling(options.poll_interval, sender, handle.shutdown.subscribe())
						.await?,
				);
			}
			ConnectionMode::Socket => {
				handle.tasks = self.spawn_socket(&options, sender, &handle.shutdown)?;
			}
		}

		tracing::info!(%chain, mode = %options.mode, "Transaction feed started");
		Ok((TransactionFeed { receiver }, handle))
	}

	async fn schedule_polling(
		&self,
		interval: Duration,
		sender: SenderSlot,
		stopped: watch::Receiver<bool>,
	) -> Result<S, ProviderError> {
		let scheduler = S::new().await.map_err(|e| {
			ProviderError::scheduler_error(format!("Failed to create scheduler: {}", e))
		})?;

		let provider = self.provider.clone();
		let cursor = self.cursor.clone();
		let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
			let provider = provider.clone();
			let cursor = cursor.clone();
			let sender = sender.clone();
			let stopped = stopped.clone();
			Box::pin(async move {
				let Some(sender) = sender.lock().await.clone() else {
					return;
				};
				if let Err(e) = poll_once(provider.as_ref(), &cursor, &sender, &stopped).await {
					tracing::error!(chain = %provider.chain(), "Polling tick failed: {}", e);
				}
			})
		})
		.map_err(|e| ProviderError::scheduler_error(format!("Failed to create job: {}", e)))?;

		scheduler
			.add(job)
			.await
			.map_err(|e| ProviderError::scheduler_error(format!("Failed to add job: {}", e)))?;
		scheduler
			.start()
			.await
			.map_err(|e| ProviderError::scheduler_error(format!("Failed to start scheduler: {}", e)))?;

		Ok(scheduler)
	}

	fn spawn_socket(
		&self,
		options: &FeedOptions,
		sender: SenderSlot,
		shutdown: &watch::Sender<bool>,
	) -> Result<Vec<JoinHandle<()>>, ProviderError> {
		let chain = self.provider.chain();
		let subscription = self.provider.socket_subscription().ok_or_else(|| {
			ProviderError::configuration_error(format!(
				"{} does not support socket subscriptions",
				chain
			))
		})?;
		let url = options.socket_url.clone().ok_or_else(|| {
			ProviderError::configuration_error(format!("No socket endpoint configured for {}", chain))
		})?;

		let client = WsSubscriptionClient::new(url, options.ws_config.clone());
		let (notifications, mut incoming) = mpsc::channel(NOTIFICATION_BUFFER);
		let shutdown_rx = shutdown.subscribe();
		let subscriber = tokio::spawn(async move {
			if let Err(e) = client
				.run(subscription.method, subscription.params, notifications, shutdown_rx)
				.await
			{
				tracing::error!(%chain, "Socket subscription ended: {}", e);
			}
		});

		let provider = self.provider.clone();
		let cursor = self.cursor.clone();
		let mut stopped = shutdown.subscribe();
		let processor = tokio::spawn(async move {
			loop {
				let notification = tokio::select! {
					_ = stopped.wait_for(|stopped| *stopped) => break,
					notification = incoming.recv() => match notification {
						Some(notification) => notification,
						None => break,
					},
				};
				let Some(head) = provider.head_from_notification(&notification) else {
					tracing::debug!(%chain, "Ignoring notification without head: {}", notification);
					continue;
				};
				let Some(sender) = sender.lock().await.clone() else {
					break;
				};
				if let Err(e) =
					process_head(provider.as_ref(), &cursor, head, &sender, &stopped).await
				{
					tracing::error!(%chain, "Failed to process notified block: {}", e);
				}
			}
		});

		Ok(vec![subscriber, processor])
	}
}

/// Reads the chain head once and processes it when new
pub async fn poll_once<P: ChainProvider + ?Sized>(
	provider: &P,
	cursor: &IngestionCursor,
	sender: &mpsc::Sender<StandardTransaction>,
	stopped: &watch::Receiver<bool>,
) -> Result<usize, ProviderError> {
	let head = provider.latest_head().await?;
	process_head(provider, cursor, head, sender, stopped).await
}

/// Emits the transactions of `head` unless the cursor already covers it
///
/// # Arguments
/// * `provider` - Provider of the chain
/// * `cursor` - Cursor deciding whether `head` is new
/// * `head` - Head to process
/// * `sender` - Feed end
/// * `stopped` - Flips to `true` when the feed is stopped
///
/// # Returns
/// * `Result<usize, ProviderError>` - Number of transactions emitted
pub async fn process_head<P: ChainProvider + ?Sized>(
	provider: &P,
	cursor: &IngestionCursor,
	head: BlockRef,
	sender: &mpsc::Sender<StandardTransaction>,
	stopped: &watch::Receiver<bool>,
) -> Result<usize, ProviderError> {
	if !cursor.advance(&head).await {
		tracing::debug!(chain = %provider.chain(), %head, "Head already processed");
		return Ok(0);
	}
	tracing::debug!(chain = %provider.chain(), %head, "New head detected");

	let transactions = provider.block_transactions(&head).await?;
	let mut stopped = stopped.clone();
	let mut emitted = 0;
	for transaction in transactions {
		// A full feed only blocks until the feed is stopped
		let delivered = tokio::select! {
			biased;
			sent = sender.send(transaction) => sent.is_ok(),
			_ = stopped.wait_for(|stopped| *stopped) => false,
		};
		if !delivered {
			tracing::debug!(
				chain = %provider.chain(),
				%head,
				emitted,
				"Feed closed or stopped, dropping remaining transactions"
			);
			break;
		}
		emitted += 1;
	}
	Ok(emitted)
}
