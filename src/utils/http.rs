//! Retrying HTTP clients shared by the RPC transports and the Esplora client.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
	policies::ExponentialBackoff, Jitter, RetryTransientMiddleware, RetryableStrategy,
};
use std::time::Duration;

/// Retry policy of outgoing HTTP requests
#[derive(Debug, Clone)]
pub struct HttpRetryConfig {
	/// Retries after the first attempt
	pub max_retries: u32,
	/// Exponent base of the backoff
	pub base_for_backoff: u32,
	/// Backoff before the first retry
	pub initial_backoff: Duration,
	/// Upper bound of a single backoff
	pub max_backoff: Duration,
	/// Randomization applied to every backoff
	pub jitter: Jitter,
}

impl Default for HttpRetryConfig {
	fn default() -> Self {
		Self {
			max_retries: 3,
			base_for_backoff: 2,
			initial_backoff: Duration::from_millis(250),
			max_backoff: Duration::from_secs(10),
			jitter: Jitter::Full,
		}
	}
}

impl HttpRetryConfig {
	/// Exponential backoff policy described by this configuration
	pub fn retry_policy(&self) -> ExponentialBackoff {
		ExponentialBackoff::builder()
			.base(self.base_for_backoff)
			.retry_bounds(self.initial_backoff, self.max_backoff)
			.jitter(self.jitter)
			.build_with_max_retries(self.max_retries)
	}
}

/// Wraps `base_client` in a retry middleware
///
/// # Arguments
/// * `config` - Retry policy
/// * `base_client` - Client performing the requests
/// * `custom_strategy` - Decides which failures are retried, reqwest-retry's default when None
///
/// # Returns
/// * `ClientWithMiddleware` - Client retrying transient failures
pub fn create_retryable_http_client<S>(
	config: &HttpRetryConfig,
	base_client: reqwest::Client,
	custom_strategy: Option<S>,
) -> ClientWithMiddleware
where
	S: RetryableStrategy + Send + Sync + 'static,
{
	let retry_policy = config.retry_policy();
	let builder = ClientBuilder::new(base_client);
	match custom_strategy {
		Some(strategy) => builder.with(RetryTransientMiddleware::new_with_policy_and_strategy(
			retry_policy,
			strategy,
		)),
		None => builder.with(RetryTransientMiddleware::new_with_policy(retry_policy)),
	}
	.build()
}
