//! Counters published through the `metrics` facade; every function is a no-op without the
//! `metrics` feature.

// self
use crate::{
	obs::{OperationKind, OperationOutcome},
	sync::SyncReport,
};

const OPERATION_TOTAL: &str = "hydra_sync_operation_total";
const CLIENT_CHANGE_TOTAL: &str = "hydra_sync_client_change_total";

/// Counts one operation outcome, labeled by `operation` and `outcome`.
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	increment(OPERATION_TOTAL, &[("operation", kind.as_str()), ("outcome", outcome.as_str())], 1);
}

/// Counts the client changes applied by a finished run, labeled by `change`.
pub fn record_report(report: &SyncReport) {
	let changes = [
		("deleted", report.deleted.len()),
		("already_absent", report.already_absent.len()),
		("updated", report.updated.len()),
		("created", report.created.len()),
		("fallback", report.fallbacks.len()),
	];

	for (change, count) in changes.into_iter().filter(|(_, count)| *count > 0) {
		increment(CLIENT_CHANGE_TOTAL, &[("change", change)], count as u64);
	}
}

#[cfg(feature = "metrics")]
fn increment(name: &'static str, labels: &[(&'static str, &'static str)], by: u64) {
	let labels =
		labels.iter().map(|&(key, value)| metrics::Label::new(key, value)).collect::<Vec<_>>();

	metrics::counter!(name, labels).increment(by);
}

#[cfg(not(feature = "metrics"))]
fn increment(_: &'static str, _: &[(&'static str, &'static str)], _: u64) {}
