//! Scheduler abstraction for polling jobs.

use async_trait::async_trait;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Result type of scheduler operations
pub type SchedulerResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Operations the transaction feed needs from a job scheduler
#[async_trait]
pub trait JobSchedulerTrait: Send + Sync + Sized {
	async fn new() -> SchedulerResult<Self>;
	async fn add(&self, job: Job) -> SchedulerResult<()>;
	async fn start(&self) -> SchedulerResult<()>;
	async fn shutdown(&mut self) -> SchedulerResult<()>;
}

#[async_trait]
impl JobSchedulerTrait for JobScheduler {
	async fn new() -> SchedulerResult<Self> {
		Ok(JobScheduler::new().await?)
	}

	async fn add(&self, job: Job) -> SchedulerResult<()> {
		JobScheduler::add(self, job).await?;
		Ok(())
	}

	async fn start(&self) -> SchedulerResult<()> {
		JobScheduler::start(self).await?;
		Ok(())
	}

	async fn shutdown(&mut self) -> SchedulerResult<()> {
		JobScheduler::shutdown(self).await?;
		Ok(())
	}
}
