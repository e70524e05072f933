//! Wire payloads for the admin API's create and update endpoints.
//!
//! Both payloads are projections of a [`ClientConfig`]. Optional values that are not
//! configured are left out of the serialized JSON entirely: the admin API treats an absent
//! field differently from an explicit `null`.

// std
use std::ops::Deref;
// self
use crate::{
	_prelude::*,
	config::{ClientConfig, ClientId, ClientSecret},
};

macro_rules! def_request {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
		#[serde(transparent)]
		pub struct $name(ClientPayload);
		impl $name {
			/// Builds the request for `id` from its desired configuration.
			pub fn build(id: &ClientId, config: &ClientConfig) -> Self {
				Self(ClientPayload::from_config(id, config))
			}

			/// Returns the payload carried by this request.
			pub fn payload(&self) -> &ClientPayload {
				&self.0
			}
		}
		impl Deref for $name {
			type Target = ClientPayload;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
	};
}

def_request!(CreateClientRequest, "Body of `POST /admin/clients`.");
def_request!(UpdateClientRequest, "Body of `PUT /admin/clients/{id}`.");

/// Client registration fields shared by create and update requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClientPayload {
	/// Client identifier.
	pub client_id: ClientId,
	/// Display name, mirrored from the identifier.
	pub client_name: ClientId,
	/// Client secret.
	pub client_secret: ClientSecret,
	/// Whether front-channel logout requests must carry the session.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub frontchannel_logout_session_required: Option<bool>,
	/// Absolute front-channel logout URI.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub frontchannel_logout_uri: Option<String>,
	/// Grant types.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub grant_types: Option<Vec<String>>,
	/// Absolute post-logout redirect URIs.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub post_logout_redirect_uris: Option<Vec<String>>,
	/// Absolute redirect URIs.
	pub redirect_uris: Vec<String>,
	/// Space-delimited scope string.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Token endpoint authentication method.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub token_endpoint_auth_method: Option<String>,
}
impl ClientPayload {
	/// Maps a desired client configuration onto the wire fields.
	pub fn from_config(id: &ClientId, config: &ClientConfig) -> Self {
		let frontchannel =
			config.logout.as_ref().and_then(|logout| logout.frontchannel.as_ref());
		// Redirects are populated whenever logout is configured, even without frontchannel.
		let post_logout_redirect_uris = config.logout.as_ref().map(|logout| {
			logout
				.redirects
				.iter()
				.flatten()
				.map(|path| config.absolute(path))
				.collect::<Vec<_>>()
		});

		Self {
			client_id: id.clone(),
			client_name: id.clone(),
			client_secret: config.secret.clone(),
			frontchannel_logout_session_required: frontchannel.and_then(|fc| fc.session),
			frontchannel_logout_uri: frontchannel.map(|fc| config.absolute(&fc.path)),
			grant_types: config.grants.clone(),
			post_logout_redirect_uris,
			redirect_uris: vec![config.absolute(&config.callback)],
			scope: format_scope(config.scopes.as_deref()),
			token_endpoint_auth_method: config.token_auth().map(ToOwned::to_owned),
		}
	}
}

/// Joins scopes with a single space; `None` when nothing is configured.
fn format_scope(scopes: Option<&[String]>) -> Option<String> {
	match scopes {
		Some(scopes) if !scopes.is_empty() => Some(scopes.join(" ")),
		_ => None,
	}
}
