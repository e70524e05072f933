//! Thread-safe in-memory [`ClientDirectory`] for local dry runs and tests.
//!
//! The registry behaves like the admin API (creating an existing id conflicts, updating or
//! deleting a missing id is not found). On top of that it keeps a journal of every call and
//! accepts scripted one-shot responses, so callers can reproduce races between listing and
//! mutating without a live server.

// std
use std::collections::VecDeque;
// self
use crate::{
	_prelude::*,
	config::ClientId,
	directory::{ClientDirectory, DirectoryError, DirectoryFuture, Outcome, RemoteClient},
	error::TransportError,
	obs::OperationKind,
	request::{ClientPayload, CreateClientRequest, UpdateClientRequest},
};

type Registry = BTreeMap<ClientId, Option<ClientPayload>>;

/// Call recorded by [`MemoryDirectory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectoryCall {
	/// Health check.
	HealthCheck,
	/// Client listing.
	List,
	/// Create for the given id.
	Create(ClientId),
	/// Update for the given id.
	Update(ClientId),
	/// Delete for the given id.
	Delete(ClientId),
}
impl DirectoryCall {
	/// Operation kind of the call.
	pub fn kind(&self) -> OperationKind {
		match self {
			Self::HealthCheck => OperationKind::HealthCheck,
			Self::List => OperationKind::List,
			Self::Create(_) => OperationKind::Create,
			Self::Update(_) => OperationKind::Update,
			Self::Delete(_) => OperationKind::Delete,
		}
	}

	/// Client targeted by the call, if any.
	pub fn client_id(&self) -> Option<&ClientId> {
		match self {
			Self::Create(id) | Self::Update(id) | Self::Delete(id) => Some(id),
			Self::HealthCheck | Self::List => None,
		}
	}
}

/// One-shot response injected ahead of the registry's own behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedResponse {
	/// Answer with the given HTTP status.
	///
	/// Mutations report it without touching the registry. Health checks and listings treat a
	/// 2xx status as success and answer from the registry as usual.
	Status(u16),
	/// Fail as if the connection was refused.
	ConnectionRefused,
	/// Accept the call and never answer.
	Hang,
}

#[derive(Debug)]
struct Script {
	kind: OperationKind,
	client_id: Option<ClientId>,
	response: ScriptedResponse,
}
impl Script {
	fn matches(&self, call: &DirectoryCall) -> bool {
		self.kind == call.kind()
			&& self.client_id.as_ref().is_none_or(|id| Some(id) == call.client_id())
	}
}

#[derive(Debug, Default)]
struct State {
	registry: RwLock<Registry>,
	journal: Mutex<Vec<DirectoryCall>>,
	scripts: Mutex<Vec<Script>>,
	stale_listings: Mutex<VecDeque<Vec<ClientId>>>,
}

/// In-process client registry with a call journal.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory(Arc<State>);
impl MemoryDirectory {
	/// Creates a directory pre-populated with `ids` (without payloads).
	pub fn with_clients<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<ClientId>,
	{
		let this = Self::default();

		this.0.registry.write().extend(ids.into_iter().map(|id| (id.into(), None)));

		this
	}

	/// Queues a one-shot response for the next matching call.
	///
	/// With `client_id` set only calls for that client match; otherwise any call of `kind`
	/// does. Scripts are consumed in the order they were queued.
	pub fn script(&self, kind: OperationKind, client_id: Option<&str>, response: ScriptedResponse) {
		let client_id = client_id.map(ClientId::from);

		self.0.scripts.lock().push(Script { kind, client_id, response });
	}

	/// Makes the next listing report `ids` instead of the registry contents.
	pub fn stale_listing<I, S>(&self, ids: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<ClientId>,
	{
		self.0.stale_listings.lock().push_back(ids.into_iter().map(Into::into).collect());
	}

	/// Adds or replaces a client outside of the gateway operations.
	pub fn insert(&self, id: impl Into<ClientId>) {
		self.0.registry.write().insert(id.into(), None);
	}

	/// Removes a client outside of the gateway operations.
	pub fn remove(&self, id: &str) -> bool {
		self.0.registry.write().remove(id).is_some()
	}

	/// Registered client identifiers in ascending order.
	pub fn client_ids(&self) -> Vec<ClientId> {
		self.0.registry.read().keys().cloned().collect()
	}

	/// Last payload written for `id`, if the client was created or updated through the gateway.
	pub fn payload(&self, id: &str) -> Option<ClientPayload> {
		self.0.registry.read().get(id).cloned().flatten()
	}

	/// Every call received so far, in order.
	pub fn calls(&self) -> Vec<DirectoryCall> {
		self.0.journal.lock().clone()
	}

	/// Calls received so far that targeted `id`.
	pub fn calls_for(&self, id: &str) -> Vec<DirectoryCall> {
		self.0
			.journal
			.lock()
			.iter()
			.filter(|call| call.client_id().is_some_and(|target| target.as_str() == id))
			.cloned()
			.collect()
	}

	/// Forgets the recorded calls.
	pub fn clear_calls(&self) {
		self.0.journal.lock().clear();
	}

	/// Records the call and returns the scripted response queued for it, if any.
	fn intercept(&self, call: DirectoryCall) -> Option<ScriptedResponse> {
		let scripted = {
			let mut scripts = self.0.scripts.lock();

			scripts
				.iter()
				.position(|script| script.matches(&call))
				.map(|idx| scripts.remove(idx).response)
		};

		self.0.journal.lock().push(call);

		scripted
	}

	async fn scripted_outcome(response: ScriptedResponse) -> Result<Outcome, DirectoryError> {
		match response {
			ScriptedResponse::Status(status) =>
				Outcome::from_status(status, reason(status)).ok_or_else(|| DirectoryError::Status {
					status,
					reason: reason(status).into(),
				}),
			ScriptedResponse::ConnectionRefused => Err(connection_refused()),
			ScriptedResponse::Hang => std::future::pending().await,
		}
	}

	async fn scripted_read(response: ScriptedResponse) -> Result<(), DirectoryError> {
		match response {
			ScriptedResponse::Status(200..=299) => Ok(()),
			ScriptedResponse::Status(status) =>
				Err(DirectoryError::Status { status, reason: reason(status).into() }),
			ScriptedResponse::ConnectionRefused => Err(connection_refused()),
			ScriptedResponse::Hang => std::future::pending().await,
		}
	}

	fn write_now(&self, id: &ClientId, payload: &ClientPayload, create: bool) -> Outcome {
		let mut registry = self.0.registry.write();
		let exists = registry.contains_key(id);

		match (create, exists) {
			(true, true) => Outcome::Conflict { reason: reason(Outcome::CONFLICT).into() },
			(false, false) => Outcome::NotFound { reason: reason(Outcome::NOT_FOUND).into() },
			_ => {
				registry.insert(id.clone(), Some(payload.clone()));

				Outcome::Applied
			},
		}
	}
}
impl ClientDirectory for MemoryDirectory {
	fn health_check(&self) -> DirectoryFuture<'_, ()> {
		Box::pin(async move {
			match self.intercept(DirectoryCall::HealthCheck) {
				Some(response) => Self::scripted_read(response).await,
				None => Ok(()),
			}
		})
	}

	fn list(&self) -> DirectoryFuture<'_, Vec<RemoteClient>> {
		Box::pin(async move {
			if let Some(response) = self.intercept(DirectoryCall::List) {
				Self::scripted_read(response).await?;
			}

			let ids = match self.0.stale_listings.lock().pop_front() {
				Some(ids) => ids,
				None => self.client_ids(),
			};

			Ok(ids.into_iter().map(RemoteClient::new).collect())
		})
	}

	fn create<'a>(&'a self, request: &'a CreateClientRequest) -> DirectoryFuture<'a, Outcome> {
		Box::pin(async move {
			let id = &request.client_id;

			match self.intercept(DirectoryCall::Create(id.clone())) {
				Some(response) => Self::scripted_outcome(response).await,
				None => Ok(self.write_now(id, request.payload(), true)),
			}
		})
	}

	fn update<'a>(
		&'a self,
		id: &'a ClientId,
		request: &'a UpdateClientRequest,
	) -> DirectoryFuture<'a, Outcome> {
		Box::pin(async move {
			match self.intercept(DirectoryCall::Update(id.clone())) {
				Some(response) => Self::scripted_outcome(response).await,
				None => Ok(self.write_now(id, request.payload(), false)),
			}
		})
	}

	fn delete<'a>(&'a self, id: &'a ClientId) -> DirectoryFuture<'a, Outcome> {
		Box::pin(async move {
			if let Some(response) = self.intercept(DirectoryCall::Delete(id.clone())) {
				return Self::scripted_outcome(response).await;
			}

			Ok(match self.0.registry.write().remove(id) {
				Some(_) => Outcome::Applied,
				None => Outcome::NotFound { reason: reason(Outcome::NOT_FOUND).into() },
			})
		})
	}
}

fn reason(status: u16) -> &'static str {
	match status {
		200 => "OK",
		201 => "Created",
		204 => "No Content",
		400 => "Bad Request",
		404 => "Not Found",
		409 => "Conflict",
		500 => "Internal Server Error",
		502 => "Bad Gateway",
		503 => "Service Unavailable",
		_ => "Unknown Status",
	}
}

fn connection_refused() -> DirectoryError {
	let source = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");

	TransportError::Io(source).into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::ClientConfig;

	fn create_request(id: &str) -> CreateClientRequest {
		CreateClientRequest::build(&ClientId::new(id), &ClientConfig::new("https://x", "/cb", "s"))
	}

	fn update_request(id: &str) -> UpdateClientRequest {
		UpdateClientRequest::build(&ClientId::new(id), &ClientConfig::new("https://y", "/cb", "s"))
	}

	#[tokio::test]
	async fn registry_mirrors_admin_api_semantics() {
		let directory = MemoryDirectory::with_clients(["app1"]);
		let app1 = ClientId::new("app1");
		let app2 = ClientId::new("app2");

		assert_eq!(
			directory.create(&create_request("app1")).await.expect("Create should answer."),
			Outcome::Conflict { reason: "Conflict".into() }
		);
		assert_eq!(
			directory.update(&app2, &update_request("app2")).await.expect("Update should answer."),
			Outcome::NotFound { reason: "Not Found".into() }
		);
		assert_eq!(
			directory.update(&app1, &update_request("app1")).await.expect("Update should answer."),
			Outcome::Applied
		);
		assert_eq!(
			directory.payload("app1").map(|payload| payload.redirect_uris),
			Some(vec!["https://y/cb".to_owned()])
		);
		assert_eq!(
			directory.delete(&app1).await.expect("Delete should answer."),
			Outcome::Applied
		);
		assert_eq!(
			directory.delete(&app1).await.expect("Delete should answer."),
			Outcome::NotFound { reason: "Not Found".into() }
		);
		assert!(directory.client_ids().is_empty());
		assert_eq!(directory.calls().len(), 5);
		assert_eq!(directory.calls_for("app2"), vec![DirectoryCall::Update(app2)]);
	}

	#[tokio::test]
	async fn scripts_are_one_shot_and_scoped_to_clients() {
		let directory = MemoryDirectory::default();

		directory.script(OperationKind::Create, Some("app2"), ScriptedResponse::Status(500));

		assert_eq!(
			directory.create(&create_request("app1")).await.expect("Unscripted create succeeds."),
			Outcome::Applied
		);

		let err = directory
			.create(&create_request("app2"))
			.await
			.expect_err("Scripted create should fail.");

		assert_eq!(err.status(), Some(500));
		assert_eq!(
			directory.create(&create_request("app2")).await.expect("Script was consumed."),
			Outcome::Applied
		);
	}

	#[tokio::test]
	async fn stale_listing_reports_snapshot_once() {
		let directory = MemoryDirectory::with_clients(["live"]);

		directory.stale_listing(["ghost"]);

		let first = directory.list().await.expect("Listing should succeed.");
		let second = directory.list().await.expect("Listing should succeed.");

		assert_eq!(first, vec![RemoteClient::new("ghost")]);
		assert_eq!(second, vec![RemoteClient::new("live")]);
	}

	#[tokio::test]
	async fn health_check_honors_scripted_failures() {
		let directory = MemoryDirectory::default();

		directory.script(OperationKind::HealthCheck, None, ScriptedResponse::ConnectionRefused);

		let err = directory.health_check().await.expect_err("Scripted health check should fail.");

		assert!(matches!(err, DirectoryError::Transport(_)));
		assert!(directory.health_check().await.is_ok());
		assert_eq!(directory.calls(), vec![DirectoryCall::HealthCheck, DirectoryCall::HealthCheck]);
	}

	#[tokio::test]
	async fn scripted_success_statuses_answer_reads_normally() {
		let directory = MemoryDirectory::with_clients(["app1"]);

		directory.script(OperationKind::HealthCheck, None, ScriptedResponse::Status(200));
		directory.script(OperationKind::List, None, ScriptedResponse::Status(204));

		directory.health_check().await.expect("A scripted 200 health check should succeed.");

		assert_eq!(
			directory.list().await.expect("A scripted 204 listing should succeed."),
			vec![RemoteClient::new("app1")]
		);

		directory.script(OperationKind::List, None, ScriptedResponse::Status(502));

		let err = directory.list().await.expect_err("A scripted 502 listing should fail.");

		assert_eq!(err.status(), Some(502));
	}

	#[tokio::test(start_paused = true)]
	async fn hanging_script_never_answers() {
		let directory = MemoryDirectory::default();

		directory.script(OperationKind::HealthCheck, None, ScriptedResponse::Hang);

		let pending =
			tokio::time::timeout(Duration::from_secs(60), directory.health_check()).await;

		assert!(pending.is_err(), "A hanging health check should outlive the deadline.");
		assert!(directory.health_check().await.is_ok());
	}
}
