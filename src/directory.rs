//! Gateway contract for the identity provider's client registry, plus built-in
//! implementations.
//!
//! Every call performs exactly one request/response cycle. Mutations report the two
//! statuses the synchronizer branches on (404 and 409) as an [`Outcome`] instead of an
//! error, so fallback decisions are plain pattern matches. Everything else that goes wrong
//! is a [`DirectoryError`].

#[cfg(feature = "reqwest")] pub mod hydra;
pub mod memory;

#[cfg(feature = "reqwest")] pub use hydra::{AdminEndpoint, HydraDirectory};
pub use memory::{DirectoryCall, MemoryDirectory, ScriptedResponse};

// self
use crate::{
	_prelude::*,
	config::ClientId,
	error::TransportError,
	request::{CreateClientRequest, UpdateClientRequest},
};

/// Future returned by [`ClientDirectory`] operations.
pub type DirectoryFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, DirectoryError>> + 'a + Send>>;

/// Client registry operations exposed by the admin API.
pub trait ClientDirectory
where
	Self: Send + Sync,
{
	/// Succeeds when the service reports itself ready.
	fn health_check(&self) -> DirectoryFuture<'_, ()>;

	/// Lists every registered client.
	fn list(&self) -> DirectoryFuture<'_, Vec<RemoteClient>>;

	/// Registers a new client.
	fn create<'a>(&'a self, request: &'a CreateClientRequest) -> DirectoryFuture<'a, Outcome>;

	/// Replaces the registration of `id`.
	fn update<'a>(
		&'a self,
		id: &'a ClientId,
		request: &'a UpdateClientRequest,
	) -> DirectoryFuture<'a, Outcome>;

	/// Removes the registration of `id`.
	fn delete<'a>(&'a self, id: &'a ClientId) -> DirectoryFuture<'a, Outcome>;
}

/// Client as reported by the admin API. Fields other than the identifier are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteClient {
	/// Client identifier.
	pub client_id: ClientId,
}
impl RemoteClient {
	/// Wraps an identifier.
	pub fn new(client_id: impl Into<ClientId>) -> Self {
		Self { client_id: client_id.into() }
	}
}

/// Result of a mutation that reached the admin API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
	/// The remote answered with a 2xx status.
	Applied,
	/// The remote answered 404: the targeted client does not exist.
	NotFound {
		/// Reason phrase returned with the status.
		reason: String,
	},
	/// The remote answered 409: the client already exists.
	Conflict {
		/// Reason phrase returned with the status.
		reason: String,
	},
}
impl Outcome {
	/// HTTP status that maps to [`Outcome::NotFound`].
	pub const NOT_FOUND: u16 = 404;
	/// HTTP status that maps to [`Outcome::Conflict`].
	pub const CONFLICT: u16 = 409;

	/// Classifies a response status. Returns `None` for statuses that are plain failures.
	pub fn from_status(status: u16, reason: impl Into<String>) -> Option<Self> {
		match status {
			200..=299 => Some(Self::Applied),
			Self::NOT_FOUND => Some(Self::NotFound { reason: reason.into() }),
			Self::CONFLICT => Some(Self::Conflict { reason: reason.into() }),
			_ => None,
		}
	}

	/// Treats anything but [`Outcome::Applied`] as a status failure.
	pub fn into_result(self) -> Result<(), DirectoryError> {
		match self {
			Self::Applied => Ok(()),
			Self::NotFound { reason } =>
				Err(DirectoryError::Status { status: Self::NOT_FOUND, reason }),
			Self::Conflict { reason } =>
				Err(DirectoryError::Status { status: Self::CONFLICT, reason }),
		}
	}
}

/// Failures reported by [`ClientDirectory`] implementations.
#[derive(Debug, ThisError)]
pub enum DirectoryError {
	/// The request never produced a response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The remote answered with a non-2xx status.
	#[error("Admin API returned HTTP {status}: {reason}.")]
	Status {
		/// Numeric HTTP status.
		status: u16,
		/// Reason phrase.
		reason: String,
	},
	/// A request body could not be encoded.
	#[error("Failed to encode the request body.")]
	Encode {
		/// Serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// The client list could not be decoded.
	#[error("Admin API returned a malformed client list.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// No response arrived before the caller's deadline.
	#[error("Admin API did not answer within {timeout:?}.")]
	TimedOut {
		/// Deadline that elapsed.
		timeout: Duration,
	},
	/// A request URL could not be derived from the configured base URL.
	#[error("Cannot build an admin API URL from `{url}`.")]
	InvalidEndpoint {
		/// Base URL in use.
		url: String,
	},
}
impl DirectoryError {
	/// Returns the HTTP status for [`DirectoryError::Status`].
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}
