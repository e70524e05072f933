//! Desired-state model loaded from the JSON configuration file.
//!
//! The file is a single object with a `clients` map keyed by client identifier. Only field
//! presence is checked: required fields (`callback`, `secret`, `url`, and `path` inside a
//! `frontchannel` block) fail the load when missing, unknown fields are ignored, and values
//! are taken verbatim.

pub mod id;
pub mod secret;

pub use id::ClientId;
pub use secret::ClientSecret;

// std
use std::{fs, path::Path};
// self
use crate::{_prelude::*, error::ConfigError};

/// Desired state for every managed client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Configuration {
	/// Client definitions keyed by identifier.
	#[serde(default)]
	pub clients: BTreeMap<ClientId, ClientConfig>,
}
impl Configuration {
	/// Reads and parses the configuration file at `path`.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let bytes = fs::read(path)
			.map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;

		Self::from_slice(&bytes)
			.map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
	}

	/// Parses configuration JSON, reporting the path of the first offending field.
	pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
		let mut deserializer = serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(&mut deserializer)
	}
}

/// Desired state for one OAuth client.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
	/// Callback path appended to [`url`](Self::url) to form the redirect URI.
	pub callback: String,
	/// Client secret.
	pub secret: ClientSecret,
	/// Base URL of the client application.
	pub url: String,
	/// Grant types, sent verbatim.
	#[serde(default)]
	pub grants: Option<Vec<String>>,
	/// Scopes, sent as a space-delimited string.
	#[serde(default)]
	pub scopes: Option<Vec<String>>,
	/// Endpoint-specific settings.
	#[serde(default)]
	pub endpoints: Option<EndpointsConfig>,
	/// Logout settings.
	#[serde(default)]
	pub logout: Option<LogoutConfig>,
}
impl ClientConfig {
	/// Creates a configuration with only the required fields set.
	pub fn new(
		url: impl Into<String>,
		callback: impl Into<String>,
		secret: impl Into<String>,
	) -> Self {
		Self {
			callback: callback.into(),
			secret: ClientSecret::new(secret),
			url: url.into(),
			grants: None,
			scopes: None,
			endpoints: None,
			logout: None,
		}
	}

	/// Sets the grant types.
	pub fn with_grants<I, S>(mut self, grants: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.grants = Some(grants.into_iter().map(Into::into).collect());

		self
	}

	/// Sets the scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = Some(scopes.into_iter().map(Into::into).collect());

		self
	}

	/// Sets the token endpoint authentication method.
	pub fn with_token_auth(mut self, auth: impl Into<String>) -> Self {
		self.endpoints =
			Some(EndpointsConfig { token: Some(TokenEndpointConfig { auth: Some(auth.into()) }) });

		self
	}

	/// Sets the logout settings.
	pub fn with_logout(mut self, logout: LogoutConfig) -> Self {
		self.logout = Some(logout);

		self
	}

	/// Returns the configured token endpoint authentication method, if any.
	pub fn token_auth(&self) -> Option<&str> {
		self.endpoints.as_ref()?.token.as_ref()?.auth.as_deref()
	}

	/// Joins the base URL with a configured path.
	pub fn absolute(&self, path: &str) -> String {
		format!("{}{path}", self.url)
	}
}

/// Endpoint-specific settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct EndpointsConfig {
	/// Token endpoint settings.
	#[serde(default)]
	pub token: Option<TokenEndpointConfig>,
}

/// Token endpoint settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TokenEndpointConfig {
	/// Client authentication method (e.g. `client_secret_post`).
	#[serde(default)]
	pub auth: Option<String>,
}

/// Logout settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LogoutConfig {
	/// Front-channel logout settings.
	#[serde(default)]
	pub frontchannel: Option<FrontChannelLogoutConfig>,
	/// Post-logout redirect paths, relative to the client URL.
	#[serde(default)]
	pub redirects: Option<Vec<String>>,
}

/// Front-channel logout settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FrontChannelLogoutConfig {
	/// Logout path, relative to the client URL.
	pub path: String,
	/// Whether the logout request must carry the session.
	#[serde(default)]
	pub session: Option<bool>,
}
