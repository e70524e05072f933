//! Observability helpers for admin API operations.
//!
//! # Feature Flags
//!
//! - Spans named `hydra_sync.operation` carry the `operation` and `client_id` fields and wrap
//!   every gateway call issued by the synchronizer.
//! - Enable `metrics` to increment the `hydra_sync_operation_total` counter for every
//!   attempt/applied/absent/fallback/failure, labeled by `operation` + `outcome`.

mod metrics;
mod span;

pub use self::{metrics::*, span::*};

// self
use crate::_prelude::*;

/// Admin API operations issued by the synchronizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// `GET /health/ready`.
	HealthCheck,
	/// `GET /admin/clients`.
	List,
	/// `POST /admin/clients`.
	Create,
	/// `PUT /admin/clients/{id}`.
	Update,
	/// `DELETE /admin/clients/{id}`.
	Delete,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::HealthCheck => "health_check",
			OperationKind::List => "list",
			OperationKind::Create => "create",
			OperationKind::Update => "update",
			OperationKind::Delete => "delete",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Request about to be sent.
	Attempt,
	/// Remote accepted the operation.
	Applied,
	/// Delete targeted a client that was already gone.
	Absent,
	/// Existence assumption was violated and the complementary operation was issued.
	Fallback,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Applied => "applied",
			OperationOutcome::Absent => "absent",
			OperationOutcome::Fallback => "fallback",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
