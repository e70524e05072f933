//! Crate-level error types shared by the loader, the gateway, and the synchronizer.

// self
use crate::{_prelude::*, config::ClientId, directory::DirectoryError, obs::OperationKind};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Synchronization could not complete.
	#[error(transparent)]
	Sync(#[from] SyncError),
}

/// Configuration and startup failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Configuration file could not be read.
	#[error("Failed to read configuration file {path}.")]
	Read {
		/// Path that was requested.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration file is not valid JSON or misses a required field.
	#[error("Failed to parse configuration file {path} at `{}`.", .source.path())]
	Parse {
		/// Path that was requested.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Admin API base URL cannot be used to address client endpoints.
	#[error("Admin API URL `{url}` is invalid.")]
	InvalidAdminUrl {
		/// Offending URL.
		url: String,
		/// Underlying parsing failure, when the URL did not parse at all.
		#[source]
		source: Option<url::ParseError>,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (connect, TLS, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the admin API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the admin API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Fatal synchronization failure.
///
/// Every variant is logged where it is raised, so callers only need to decide how to exit.
#[derive(Debug, ThisError)]
pub enum SyncError {
	/// The admin API never reported itself healthy.
	#[error("Admin API did not become ready after {attempts} attempts.")]
	NotReady {
		/// Number of health checks performed.
		attempts: u32,
		/// Failure reported by the final health check.
		#[source]
		source: DirectoryError,
	},
	/// The remote client list could not be fetched.
	#[error("Failed to list remote clients.")]
	List {
		/// Gateway failure.
		#[source]
		source: DirectoryError,
	},
	/// A per-client operation failed and could not be recovered by a fallback.
	#[error("Failed to {operation} client `{client_id}`.")]
	Operation {
		/// Operation that failed.
		operation: OperationKind,
		/// Client the operation targeted.
		client_id: ClientId,
		/// Gateway failure.
		#[source]
		source: DirectoryError,
	},
}
impl SyncError {
	/// Returns the gateway failure underlying this error.
	pub fn directory_error(&self) -> &DirectoryError {
		match self {
			Self::NotReady { source, .. }
			| Self::List { source }
			| Self::Operation { source, .. } => source,
		}
	}
}
