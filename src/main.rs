//! Command-line entry point: load the client configuration, resolve the admin API, and run one
//! synchronization.

// std
use std::{path::PathBuf, process::ExitCode, time::Duration};
// crates.io
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;
// self
use hydra_client_sync::{
	directory::{AdminEndpoint, HydraDirectory},
	error::Error,
	sync::{ReadinessProbe, SyncReport, Synchronizer},
	url::Url,
};

const EXIT_SYNC_FAILURE: u8 = 1;

#[derive(Debug, Parser)]
#[command(author, version, about = "Synchronize OAuth 2.0 clients with the Ory Hydra admin API")]
struct Cli {
	/// Path to the JSON configuration file.
	config: PathBuf,
	/// Admin API host.
	#[arg(long, env = "SCORPION__SERVER__HOST", default_value = AdminEndpoint::DEFAULT_HOST)]
	host: String,
	/// Admin API port.
	#[arg(
		long,
		env = "SCORPION__SERVER__PORTS__ADMIN",
		default_value_t = AdminEndpoint::DEFAULT_PORT
	)]
	port: u16,
	/// Full admin API base URL; overrides --host and --port.
	#[arg(long, value_name = "URL")]
	admin_url: Option<Url>,
	/// Maximum number of readiness checks.
	#[arg(long, default_value_t = 10)]
	ready_attempts: u32,
	/// Seconds to wait after a failed readiness check.
	#[arg(long, default_value_t = 1)]
	ready_retry_secs: u64,
	/// Seconds to wait after the admin API reports ready.
	#[arg(long, default_value_t = 5)]
	ready_grace_secs: u64,
	/// Seconds a single readiness check may take.
	#[arg(long, default_value_t = 5)]
	ready_timeout_secs: u64,
}
impl Cli {
	fn base_url(&self) -> Result<Url> {
		match &self.admin_url {
			Some(url) => Ok(url.clone()),
			None => AdminEndpoint::new(&self.host, self.port)
				.url()
				.wrap_err("Failed to build the admin API URL."),
		}
	}

	fn probe(&self) -> ReadinessProbe {
		ReadinessProbe::default()
			.with_attempts(self.ready_attempts)
			.with_retry_delay(Duration::from_secs(self.ready_retry_secs))
			.with_grace_period(Duration::from_secs(self.ready_grace_secs))
			.with_request_timeout(Duration::from_secs(self.ready_timeout_secs))
	}
}

/// Maps a finished run to a process status: synchronization failures exit with 1 after being
/// logged, configuration failures propagate as reports.
fn exit_status(result: std::result::Result<SyncReport, Error>) -> Result<u8> {
	match result {
		Ok(_) => Ok(0),
		Err(Error::Sync(e)) => {
			tracing::error!(error = %e, "Failed to synchronize configuration.");

			Ok(EXIT_SYNC_FAILURE)
		},
		Err(e) => Err(e).wrap_err("Failed to load configuration."),
	}
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
	color_eyre::install()?;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let cli = Cli::parse();
	let directory = HydraDirectory::new(cli.base_url()?)
		.wrap_err("Failed to construct the admin API client.")?;
	let synchronizer = Synchronizer::<HydraDirectory>::new(directory).with_probe(cli.probe());
	let status = exit_status(synchronizer.run_file(&cli.config).await)?;

	Ok(ExitCode::from(status))
}
