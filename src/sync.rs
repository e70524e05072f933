//! Convergence of the admin API's client registry to the desired configuration.

pub mod plan;
pub mod readiness;
pub mod reconcile;

pub use plan::*;
pub use readiness::*;
pub use reconcile::*;

// std
use std::path::Path;
// self
use crate::{
	_prelude::*,
	config::{ClientId, Configuration},
	directory::{ClientDirectory, DirectoryError, DirectoryFuture},
	error::SyncError,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

/// Drives one synchronization run against a [`ClientDirectory`].
///
/// Work is strictly sequential: every gateway call is awaited before the next one is issued,
/// and the first unrecoverable failure aborts the run.
#[derive(Clone)]
pub struct Synchronizer<D>
where
	D: ?Sized + ClientDirectory,
{
	/// Gateway used for every admin API call.
	pub directory: Arc<D>,
	/// Readiness polling policy applied before reconciling.
	pub probe: ReadinessProbe,
}
impl<D> Synchronizer<D>
where
	D: ?Sized + ClientDirectory,
{
	/// Creates a synchronizer with the default readiness policy.
	pub fn new(directory: impl Into<Arc<D>>) -> Self {
		Self { directory: directory.into(), probe: ReadinessProbe::default() }
	}

	/// Overrides the readiness policy.
	pub fn with_probe(mut self, probe: ReadinessProbe) -> Self {
		self.probe = probe;

		self
	}

	/// Waits for the admin API, then reconciles every configured client.
	pub async fn run(&self, config: &Configuration) -> Result<SyncReport, SyncError> {
		tracing::info!(clients = config.clients.len(), "Synchronizing configuration.");

		for (id, _) in config.clients.iter().filter(|(_, client)| client.secret.is_empty()) {
			tracing::warn!(client_id = %id, "Client is configured with an empty secret.");
		}

		self.wait_until_ready().await?;

		let report = self.reconcile_clients(&config.clients).await?;

		tracing::info!(
			deleted = report.deleted.len(),
			already_absent = report.already_absent.len(),
			updated = report.updated.len(),
			created = report.created.len(),
			fallbacks = report.fallbacks.len(),
			"Synchronization complete."
		);
		obs::record_report(&report);

		Ok(report)
	}

	/// Loads the configuration file at `path` and runs one synchronization.
	///
	/// Configuration problems surface as [`Error::Config`] before the admin API is contacted;
	/// synchronization failures surface as [`Error::Sync`].
	pub async fn run_file(&self, path: impl AsRef<Path>) -> Result<SyncReport> {
		let config = Configuration::load(path)?;

		Ok(self.run(&config).await?)
	}

	/// Issues one gateway call inside an operation span.
	async fn observe<'a, T>(
		&self,
		kind: OperationKind,
		client_id: Option<&ClientId>,
		call: DirectoryFuture<'a, T>,
	) -> Result<T, DirectoryError> {
		let span = match client_id {
			Some(id) => OperationSpan::for_client(kind, id),
			None => OperationSpan::new(kind),
		};

		obs::record_operation_outcome(kind, OperationOutcome::Attempt);

		span.instrument(call).await
	}

	/// Logs a fatal per-client failure and wraps it for the caller.
	fn fail(
		&self,
		operation: OperationKind,
		client_id: &ClientId,
		source: DirectoryError,
	) -> SyncError {
		tracing::error!(
			%client_id,
			%operation,
			error = %source,
			"Failed to {operation} client {client_id}."
		);
		obs::record_operation_outcome(operation, OperationOutcome::Failure);

		SyncError::Operation { operation, client_id: client_id.clone(), source }
	}
}
impl<D> Debug for Synchronizer<D>
where
	D: ?Sized + ClientDirectory,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Synchronizer").field("probe", &self.probe).finish()
	}
}
