// std
use std::time::Duration;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use hydra_client_sync::{
	config::Configuration,
	directory::HydraDirectory,
	error::SyncError,
	obs::OperationKind,
	sync::{Fallback, ReadinessProbe, Synchronizer},
	url::Url,
};

fn synchronizer(server: &MockServer) -> Synchronizer<HydraDirectory> {
	let base = Url::parse(&server.base_url()).expect("Mock server URL should parse.");
	let directory = HydraDirectory::new(base).expect("Gateway should build for the mock server.");

	Synchronizer::new(directory).with_probe(
		ReadinessProbe::default()
			.with_attempts(2)
			.with_retry_delay(Duration::ZERO)
			.with_grace_period(Duration::ZERO),
	)
}

const SINGLE_CLIENT: &str =
	r#"{"clients": {"app1": {"callback": "/cb", "secret": "s", "url": "https://x"}}}"#;

fn config(json: &str) -> Configuration {
	Configuration::from_slice(json.as_bytes()).expect("Test configuration should parse.")
}

#[tokio::test]
async fn stale_client_is_deleted_and_configured_client_updated() {
	let server = MockServer::start_async().await;
	let ready = server
		.mock_async(|when, then| {
			when.method(GET).path("/health/ready");
			then.status(200);
		})
		.await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/clients");
			then.status(200).json_body(json!([{ "client_id": "app1" }, { "client_id": "app2" }]));
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/admin/clients/app2");
			then.status(204);
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT).path("/admin/clients/app1").json_body(json!({
				"client_id": "app1",
				"client_name": "app1",
				"client_secret": "s",
				"redirect_uris": ["https://x/cb"],
			}));
			then.status(200);
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/clients");
			then.status(201);
		})
		.await;
	let report = synchronizer(&server)
		.run(&config(SINGLE_CLIENT))
		.await
		.expect("Synchronization should succeed.");

	ready.assert_async().await;
	list.assert_async().await;
	delete.assert_async().await;
	update.assert_async().await;
	create.assert_calls_async(0).await;

	assert_eq!(report.deleted.len(), 1);
	assert_eq!(report.updated.len(), 1);
	assert!(report.created.is_empty());
}

#[tokio::test]
async fn vanished_client_is_recreated_over_http() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/health/ready");
			then.status(200);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/clients");
			then.status(200).json_body(json!([{ "client_id": "app1" }]));
		})
		.await;

	let update = server
		.mock_async(|when, then| {
			when.method(PUT).path("/admin/clients/app1");
			then.status(404);
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/clients").json_body(json!({
				"client_id": "app1",
				"client_name": "app1",
				"client_secret": "s",
				"redirect_uris": ["https://x/cb"],
				"scope": "openid",
			}));
			then.status(201);
		})
		.await;
	let report = synchronizer(&server)
		.run(&config(
			r#"{"clients": {"app1": {
				"callback": "/cb", "secret": "s", "url": "https://x", "scopes": ["openid"]
			}}}"#,
		))
		.await
		.expect("The update fallback should recreate the client.");

	update.assert_async().await;
	create.assert_async().await;

	assert_eq!(report.fallbacks.len(), 1);
	assert_eq!(report.fallbacks[0].1, Fallback::UpdateToCreate);
}

#[tokio::test]
async fn unready_admin_api_skips_listing() {
	let server = MockServer::start_async().await;
	let ready = server
		.mock_async(|when, then| {
			when.method(GET).path("/health/ready");
			then.status(503);
		})
		.await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/clients");
			then.status(200).json_body(json!([]));
		})
		.await;
	let err = synchronizer(&server)
		.run(&Configuration::default())
		.await
		.expect_err("An admin API that never becomes ready should fail the run.");

	assert!(matches!(err, SyncError::NotReady { attempts: 2, .. }));

	ready.assert_calls_async(2).await;
	list.assert_calls_async(0).await;
}

#[tokio::test]
async fn server_error_on_create_fails_the_run() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/health/ready");
			then.status(200);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/clients");
			then.status(200).json_body(json!([]));
		})
		.await;

	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/clients");
			then.status(500);
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT);
			then.status(200);
		})
		.await;
	let err = synchronizer(&server)
		.run(&config(SINGLE_CLIENT))
		.await
		.expect_err("A server error on create is fatal.");

	assert!(matches!(err, SyncError::Operation { operation: OperationKind::Create, .. }));

	create.assert_async().await;
	update.assert_calls_async(0).await;
}
