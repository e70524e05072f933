//! Delete/update/create phases with single-hop fallbacks.
//!
//! The remote listing is only a snapshot: between listing and mutating, another actor may
//! remove or register a client. The phases therefore tolerate exactly the violations that
//! still lead to the desired end state:
//!
//! - a delete answered with 404 already reached its goal;
//! - an update answered with 404 is retried once as a create;
//! - a create answered with 409 is retried once as an update.
//!
//! A fallback call never falls back again, so a client flapping between both states fails
//! the run instead of looping.

// self
use crate::{
	_prelude::*,
	config::{ClientConfig, ClientId},
	directory::{ClientDirectory, DirectoryError, Outcome, RemoteClient},
	error::SyncError,
	obs::{self, OperationKind, OperationOutcome},
	request::{CreateClientRequest, UpdateClientRequest},
	sync::{SyncPlan, Synchronizer},
};

/// Fallback hop taken for a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fallback {
	/// Update answered 404; the client was created instead.
	UpdateToCreate,
	/// Create answered 409; the client was updated instead.
	CreateToUpdate,
}

/// Summary of the changes applied by one reconciliation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
	/// Clients removed from the registry.
	pub deleted: Vec<ClientId>,
	/// Clients scheduled for deletion that were already gone.
	pub already_absent: Vec<ClientId>,
	/// Clients whose registration was replaced.
	pub updated: Vec<ClientId>,
	/// Clients newly registered.
	pub created: Vec<ClientId>,
	/// Fallback hops, in the order they were taken.
	pub fallbacks: Vec<(ClientId, Fallback)>,
}

impl<D> Synchronizer<D>
where
	D: ?Sized + ClientDirectory,
{
	/// Converges the registry to `desired`.
	///
	/// Lists the registry once, then deletes, updates, and creates in that order. The first
	/// unrecoverable failure is logged and returned; remaining items and phases are skipped.
	pub async fn reconcile_clients(
		&self,
		desired: &BTreeMap<ClientId, ClientConfig>,
	) -> Result<SyncReport, SyncError> {
		let actual = self.list_clients().await?;
		let plan = SyncPlan::new(desired.keys(), actual.iter().map(|client| &client.client_id));
		let mut report = SyncReport::default();

		tracing::info!(
			delete = plan.delete.len(),
			update = plan.update.len(),
			create = plan.create.len(),
			"Planned client synchronization."
		);

		for id in &plan.delete {
			tracing::info!(client_id = %id, "Deleting client.");

			self.delete_client(id, &mut report).await?;
		}
		for (id, config) in desired.iter().filter(|(id, _)| plan.update.contains(*id)) {
			tracing::info!(client_id = %id, "Updating client.");

			self.update_client(id, config, &mut report).await?;
		}
		for (id, config) in desired.iter().filter(|(id, _)| plan.create.contains(*id)) {
			tracing::info!(client_id = %id, "Creating client.");

			self.create_client(id, config, &mut report).await?;
		}

		Ok(report)
	}

	async fn list_clients(&self) -> Result<Vec<RemoteClient>, SyncError> {
		const KIND: OperationKind = OperationKind::List;

		match self.observe(KIND, None, self.directory.list()).await {
			Ok(clients) => {
				obs::record_operation_outcome(KIND, OperationOutcome::Applied);

				Ok(clients)
			},
			Err(source) => {
				tracing::error!(error = %source, "Failed to list remote clients.");
				obs::record_operation_outcome(KIND, OperationOutcome::Failure);

				Err(SyncError::List { source })
			},
		}
	}

	async fn delete_client(&self, id: &ClientId, report: &mut SyncReport) -> Result<(), SyncError> {
		const KIND: OperationKind = OperationKind::Delete;

		let removed = self
			.observe(KIND, Some(id), self.directory.delete(id))
			.await
			.and_then(|outcome| match outcome {
				Outcome::NotFound { .. } => Ok(false),
				other => other.into_result().map(|()| true),
			})
			.map_err(|e| self.fail(KIND, id, e))?;

		if removed {
			obs::record_operation_outcome(KIND, OperationOutcome::Applied);
			report.deleted.push(id.clone());
		} else {
			tracing::info!(client_id = %id, "Client is already absent.");
			obs::record_operation_outcome(KIND, OperationOutcome::Absent);
			report.already_absent.push(id.clone());
		}

		Ok(())
	}

	async fn update_client(
		&self,
		id: &ClientId,
		config: &ClientConfig,
		report: &mut SyncReport,
	) -> Result<(), SyncError> {
		const KIND: OperationKind = OperationKind::Update;

		let request = UpdateClientRequest::build(id, config);

		match self.observe(KIND, Some(id), self.directory.update(id, &request)).await {
			Ok(Outcome::NotFound { .. }) => {
				tracing::warn!(client_id = %id, "Client vanished before update; creating it.");
				obs::record_operation_outcome(KIND, OperationOutcome::Fallback);
				report.fallbacks.push((id.clone(), Fallback::UpdateToCreate));

				self.create_once(id, config).await?;

				report.created.push(id.clone());
			},
			result => {
				self.applied(KIND, id, result.and_then(Outcome::into_result))?;

				report.updated.push(id.clone());
			},
		}

		Ok(())
	}

	async fn create_client(
		&self,
		id: &ClientId,
		config: &ClientConfig,
		report: &mut SyncReport,
	) -> Result<(), SyncError> {
		const KIND: OperationKind = OperationKind::Create;

		let request = CreateClientRequest::build(id, config);

		match self.observe(KIND, Some(id), self.directory.create(&request)).await {
			Ok(Outcome::Conflict { .. }) => {
				tracing::warn!(client_id = %id, "Client appeared before create; updating it.");
				obs::record_operation_outcome(KIND, OperationOutcome::Fallback);
				report.fallbacks.push((id.clone(), Fallback::CreateToUpdate));

				self.update_once(id, config).await?;

				report.updated.push(id.clone());
			},
			result => {
				self.applied(KIND, id, result.and_then(Outcome::into_result))?;

				report.created.push(id.clone());
			},
		}

		Ok(())
	}

	/// Create issued as a fallback; a 409 here is fatal.
	async fn create_once(&self, id: &ClientId, config: &ClientConfig) -> Result<(), SyncError> {
		let request = CreateClientRequest::build(id, config);
		let result = self
			.observe(OperationKind::Create, Some(id), self.directory.create(&request))
			.await
			.and_then(Outcome::into_result);

		self.applied(OperationKind::Create, id, result)
	}

	/// Update issued as a fallback; a 404 here is fatal.
	async fn update_once(&self, id: &ClientId, config: &ClientConfig) -> Result<(), SyncError> {
		let request = UpdateClientRequest::build(id, config);
		let result = self
			.observe(OperationKind::Update, Some(id), self.directory.update(id, &request))
			.await
			.and_then(Outcome::into_result);

		self.applied(OperationKind::Update, id, result)
	}

	fn applied(
		&self,
		kind: OperationKind,
		id: &ClientId,
		result: Result<(), DirectoryError>,
	) -> Result<(), SyncError> {
		result.map_err(|e| self.fail(kind, id, e))?;
		obs::record_operation_outcome(kind, OperationOutcome::Applied);

		Ok(())
	}
}
