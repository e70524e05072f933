//! reqwest-backed [`ClientDirectory`] for the Ory Hydra admin API.

// crates.io
use reqwest::{Method, RequestBuilder, Response, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	config::ClientId,
	directory::{ClientDirectory, DirectoryError, DirectoryFuture, Outcome, RemoteClient},
	error::{ConfigError, TransportError},
	request::{CreateClientRequest, UpdateClientRequest},
};

/// Host and port of the admin API.
///
/// Resolved once at startup and handed to [`HydraDirectory`]; never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminEndpoint {
	/// Host name or address.
	pub host: String,
	/// Admin port.
	pub port: u16,
}
impl AdminEndpoint {
	/// Default host used when none is configured.
	pub const DEFAULT_HOST: &'static str = "localhost";
	/// Default admin port used when none is configured.
	pub const DEFAULT_PORT: u16 = 20001;

	/// Creates an endpoint description.
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self { host: host.into(), port }
	}

	/// Builds the plain-HTTP base URL of the admin API.
	pub fn url(&self) -> Result<Url, ConfigError> {
		let raw = format!("http://{}:{}", self.host, self.port);

		Url::parse(&raw)
			.map_err(|source| ConfigError::InvalidAdminUrl { url: raw, source: Some(source) })
	}
}
impl Default for AdminEndpoint {
	fn default() -> Self {
		Self::new(Self::DEFAULT_HOST, Self::DEFAULT_PORT)
	}
}

/// Admin API gateway backed by a shared reqwest client.
///
/// The base URL may carry a path prefix; request paths are appended to it.
#[derive(Clone, Debug)]
pub struct HydraDirectory {
	client: ReqwestClient,
	base: Url,
}
impl HydraDirectory {
	/// Upper bound for a whole request/response cycle on the default client.
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

	/// Creates a gateway for `base` with a default reqwest client.
	pub fn new(base: Url) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(Self::DEFAULT_TIMEOUT).build()?;

		Self::with_client(base, client)
	}

	/// Creates a gateway for `endpoint` with a default reqwest client.
	pub fn from_endpoint(endpoint: &AdminEndpoint) -> Result<Self, ConfigError> {
		Self::new(endpoint.url()?)
	}

	/// Creates a gateway that reuses a caller-provided reqwest client.
	pub fn with_client(base: Url, client: ReqwestClient) -> Result<Self, ConfigError> {
		if base.cannot_be_a_base() {
			return Err(ConfigError::InvalidAdminUrl { url: base.into(), source: None });
		}

		Ok(Self { client, base })
	}

	/// Base URL in use.
	pub fn base_url(&self) -> &Url {
		&self.base
	}

	fn endpoint(&self, segments: &[&str]) -> Result<Url, DirectoryError> {
		let mut url = self.base.clone();

		url.path_segments_mut()
			.map_err(|_| DirectoryError::InvalidEndpoint { url: self.base.to_string() })?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}

	fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, DirectoryError> {
		Ok(self.client.request(method, self.endpoint(segments)?))
	}

	fn json_request(
		&self,
		method: Method,
		segments: &[&str],
		body: &impl Serialize,
	) -> Result<RequestBuilder, DirectoryError> {
		let body = serde_json::to_vec(body).map_err(|source| DirectoryError::Encode { source })?;

		Ok(self.request(method, segments)?.header(CONTENT_TYPE, "application/json").body(body))
	}

	async fn send(request: RequestBuilder) -> Result<(u16, String, Response), DirectoryError> {
		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status();
		let reason = status.canonical_reason().unwrap_or("Unknown Status").to_owned();

		Ok((status.as_u16(), reason, response))
	}

	async fn mutate(request: RequestBuilder) -> Result<Outcome, DirectoryError> {
		let (status, reason, _) = Self::send(request).await?;

		Outcome::from_status(status, reason.clone())
			.ok_or(DirectoryError::Status { status, reason })
	}

	async fn fetch(request: RequestBuilder) -> Result<Response, DirectoryError> {
		let (status, reason, response) = Self::send(request).await?;

		if !(200..300).contains(&status) {
			return Err(DirectoryError::Status { status, reason });
		}

		Ok(response)
	}
}
impl ClientDirectory for HydraDirectory {
	fn health_check(&self) -> DirectoryFuture<'_, ()> {
		Box::pin(async move {
			Self::fetch(self.request(Method::GET, &["health", "ready"])?).await?;

			Ok(())
		})
	}

	fn list(&self) -> DirectoryFuture<'_, Vec<RemoteClient>> {
		Box::pin(async move {
			let response = Self::fetch(self.request(Method::GET, &["admin", "clients"])?).await?;
			let bytes = response.bytes().await.map_err(TransportError::from)?;
			let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

			serde_path_to_error::deserialize(&mut deserializer)
				.map_err(|source| DirectoryError::Decode { source })
		})
	}

	fn create<'a>(&'a self, request: &'a CreateClientRequest) -> DirectoryFuture<'a, Outcome> {
		Box::pin(async move {
			Self::mutate(self.json_request(Method::POST, &["admin", "clients"], request)?).await
		})
	}

	fn update<'a>(
		&'a self,
		id: &'a ClientId,
		request: &'a UpdateClientRequest,
	) -> DirectoryFuture<'a, Outcome> {
		Box::pin(async move {
			let segments = ["admin", "clients", id.as_str()];

			Self::mutate(self.json_request(Method::PUT, &segments, request)?).await
		})
	}

	fn delete<'a>(&'a self, id: &'a ClientId) -> DirectoryFuture<'a, Outcome> {
		Box::pin(async move {
			Self::mutate(self.request(Method::DELETE, &["admin", "clients", id.as_str()])?).await
		})
	}
}
