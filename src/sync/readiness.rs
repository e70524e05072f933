//! Bounded polling of the admin API's health endpoint.
//!
//! The admin API typically starts alongside this tool, so the synchronizer polls the
//! readiness probe with a fixed delay after every unhealthy answer. Each check is bounded by a
//! request timeout, so a port that accepts connections but never answers still counts as a
//! failed attempt. After the first healthy answer the probe waits for an additional grace
//! period before any client operation is issued. Exhausting every attempt is fatal.

// self
use crate::{
	_prelude::*,
	directory::{ClientDirectory, DirectoryError},
	error::SyncError,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	sync::Synchronizer,
};

/// Readiness polling policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadinessProbe {
	/// Maximum number of health checks; values below 1 are treated as 1.
	pub attempts: u32,
	/// Pause after an unhealthy answer.
	pub retry_delay: Duration,
	/// Pause after the first healthy answer.
	pub grace_period: Duration,
	/// Upper bound for a single health check.
	pub request_timeout: Duration,
}
impl ReadinessProbe {
	const DEFAULT_ATTEMPTS: u32 = 10;
	const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);
	const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
	const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

	/// Overrides the maximum number of health checks.
	pub fn with_attempts(mut self, attempts: u32) -> Self {
		self.attempts = attempts;

		self
	}

	/// Overrides the pause after an unhealthy answer.
	pub fn with_retry_delay(mut self, delay: Duration) -> Self {
		self.retry_delay = delay;

		self
	}

	/// Overrides the pause after the first healthy answer.
	pub fn with_grace_period(mut self, grace: Duration) -> Self {
		self.grace_period = grace;

		self
	}

	/// Overrides the upper bound for a single health check.
	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Polls `directory` until it reports healthy or the attempts run out.
	pub async fn wait_until_ready<D>(&self, directory: &D) -> Result<(), SyncError>
	where
		D: ?Sized + ClientDirectory,
	{
		const KIND: OperationKind = OperationKind::HealthCheck;

		let attempts = self.attempts.max(1);
		let mut attempt = 1;

		tracing::info!(attempts, "Waiting for the admin API to become ready.");

		loop {
			obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

			let e = match self.check(directory).await {
				Ok(()) => {
					obs::record_operation_outcome(KIND, OperationOutcome::Applied);
					tracing::info!(
						attempt,
						grace_period = ?self.grace_period,
						"Admin API is ready, waiting for the grace period."
					);
					tokio::time::sleep(self.grace_period).await;

					return Ok(());
				},
				Err(e) => e,
			};

			tracing::warn!(
				attempt,
				error = %e,
				retry_delay = ?self.retry_delay,
				"Admin API is not ready."
			);
			tokio::time::sleep(self.retry_delay).await;

			if attempt >= attempts {
				obs::record_operation_outcome(KIND, OperationOutcome::Failure);
				tracing::error!(attempts, error = %e, "Admin API did not become ready.");

				return Err(SyncError::NotReady { attempts, source: e });
			}

			attempt += 1;
		}
	}

	async fn check<D>(&self, directory: &D) -> Result<(), DirectoryError>
	where
		D: ?Sized + ClientDirectory,
	{
		let span = OperationSpan::new(OperationKind::HealthCheck);

		tokio::time::timeout(self.request_timeout, span.instrument(directory.health_check()))
			.await
			.map_err(|_| DirectoryError::TimedOut { timeout: self.request_timeout })?
	}
}
impl Default for ReadinessProbe {
	fn default() -> Self {
		Self {
			attempts: Self::DEFAULT_ATTEMPTS,
			retry_delay: Self::DEFAULT_RETRY_DELAY,
			grace_period: Self::DEFAULT_GRACE_PERIOD,
			request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
		}
	}
}

impl<D> Synchronizer<D>
where
	D: ?Sized + ClientDirectory,
{
	/// Blocks until the admin API is ready, using the configured [`ReadinessProbe`].
	pub async fn wait_until_ready(&self) -> Result<(), SyncError> {
		self.probe.wait_until_ready(self.directory.as_ref()).await
	}
}
