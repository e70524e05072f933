//! Opaque client identifier shared by the configuration model and the admin API.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// OAuth client identifier.
///
/// Identifiers are compared by exact string equality. No trimming, case folding, or
/// validation is applied, because the admin API is the authority on what it accepts.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);
impl ClientId {
	/// Wraps a raw identifier.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for ClientId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ClientId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ClientId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<&str> for ClientId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for ClientId {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<ClientId> for String {
	fn from(value: ClientId) -> Self {
		value.0
	}
}
impl Debug for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ClientId({})", self.0)
	}
}
impl Display for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_are_not_normalized() {
		let lower = ClientId::new("app");
		let upper = ClientId::new("App");
		let padded = ClientId::new(" app");

		assert_ne!(lower, upper);
		assert_ne!(lower, padded);
		assert_eq!(padded.as_str(), " app");
	}

	#[test]
	fn identifiers_serialize_as_plain_strings() {
		let id: ClientId =
			serde_json::from_str("\"app1\"").expect("Identifier should deserialize from a string.");

		assert_eq!(id, ClientId::from("app1"));
		assert_eq!(format!("{id:?}"), "ClientId(app1)");
		assert_eq!(
			serde_json::to_string(&id).expect("Identifier should serialize to JSON."),
			"\"app1\""
		);
	}
}
