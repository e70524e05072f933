// std
use std::time::Duration;
// crates.io
use tokio::time::Instant;
// self
use hydra_client_sync::{
	directory::{DirectoryCall, DirectoryError, MemoryDirectory, ScriptedResponse},
	error::SyncError,
	obs::OperationKind,
	sync::ReadinessProbe,
};

fn fail_health_checks(directory: &MemoryDirectory, count: usize) {
	for _ in 0..count {
		directory.script(OperationKind::HealthCheck, None, ScriptedResponse::Status(503));
	}
}

fn assert_elapsed(start: Instant, expected: Duration) {
	let elapsed = start.elapsed();

	assert!(
		elapsed >= expected && elapsed < expected + Duration::from_millis(100),
		"Expected roughly {expected:?} of paused time, observed {elapsed:?}."
	);
}

#[tokio::test(start_paused = true)]
async fn ready_on_first_attempt_waits_only_for_grace_period() {
	let directory = MemoryDirectory::default();
	let start = Instant::now();

	ReadinessProbe::default()
		.wait_until_ready(&directory)
		.await
		.expect("A healthy admin API should be ready immediately.");

	assert_elapsed(start, Duration::from_secs(5));
	assert_eq!(directory.calls(), vec![DirectoryCall::HealthCheck]);
}

#[tokio::test(start_paused = true)]
async fn ready_on_third_attempt_stops_polling() {
	let directory = MemoryDirectory::default();
	let start = Instant::now();

	fail_health_checks(&directory, 2);

	ReadinessProbe::default()
		.wait_until_ready(&directory)
		.await
		.expect("The admin API should be ready on the third attempt.");

	assert_elapsed(start, Duration::from_secs(2 + 5));
	assert_eq!(directory.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn ready_on_last_attempt_still_succeeds() {
	let directory = MemoryDirectory::default();

	fail_health_checks(&directory, 9);

	ReadinessProbe::default()
		.wait_until_ready(&directory)
		.await
		.expect("Success on the tenth attempt is still within bounds.");

	assert_eq!(directory.calls().len(), 10);
}

#[tokio::test(start_paused = true)]
async fn never_ready_fails_after_ten_attempts() {
	let directory = MemoryDirectory::default();
	let start = Instant::now();

	fail_health_checks(&directory, 11);

	let err = ReadinessProbe::default()
		.wait_until_ready(&directory)
		.await
		.expect_err("Ten failed health checks should be fatal.");

	assert!(matches!(err, SyncError::NotReady { attempts: 10, .. }));
	assert_eq!(err.directory_error().status(), Some(503));
	assert_eq!(directory.calls().len(), 10);
	assert_elapsed(start, Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn connection_failures_count_as_unready() {
	let directory = MemoryDirectory::default();

	directory.script(OperationKind::HealthCheck, None, ScriptedResponse::ConnectionRefused);

	ReadinessProbe::default()
		.with_grace_period(Duration::ZERO)
		.wait_until_ready(&directory)
		.await
		.expect("A refused connection should be retried.");

	assert_eq!(directory.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn silent_admin_api_times_out_each_attempt() {
	let directory = MemoryDirectory::default();
	let start = Instant::now();

	directory.script(OperationKind::HealthCheck, None, ScriptedResponse::Hang);
	directory.script(OperationKind::HealthCheck, None, ScriptedResponse::Hang);

	let err = ReadinessProbe::default()
		.with_attempts(2)
		.with_request_timeout(Duration::from_secs(3))
		.wait_until_ready(&directory)
		.await
		.expect_err("A health check that never answers should count as a failed attempt.");

	assert!(matches!(err, SyncError::NotReady { attempts: 2, .. }));
	assert!(matches!(
		err.directory_error(),
		DirectoryError::TimedOut { timeout } if timeout.as_secs() == 3
	));
	assert_eq!(directory.calls().len(), 2);
	assert_elapsed(start, Duration::from_secs(3 + 1 + 3 + 1));
}

#[tokio::test(start_paused = true)]
async fn silent_attempt_is_retried() {
	let directory = MemoryDirectory::default();
	let start = Instant::now();

	directory.script(OperationKind::HealthCheck, None, ScriptedResponse::Hang);

	ReadinessProbe::default()
		.wait_until_ready(&directory)
		.await
		.expect("A healthy answer after a timed out attempt should succeed.");

	assert_eq!(directory.calls().len(), 2);
	assert_elapsed(start, Duration::from_secs(5 + 1 + 5));
}

#[tokio::test(start_paused = true)]
async fn zero_attempts_still_checks_once() {
	let directory = MemoryDirectory::default();

	fail_health_checks(&directory, 1);

	let err = ReadinessProbe::default()
		.with_attempts(0)
		.wait_until_ready(&directory)
		.await
		.expect_err("A single failed check exhausts a zero-attempt policy.");

	assert!(matches!(err, SyncError::NotReady { attempts: 1, .. }));
	assert_eq!(directory.calls().len(), 1);
}
