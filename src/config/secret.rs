//! Client secrets as they travel from the configuration file to the admin API.

// self
use crate::_prelude::*;

const REDACTED: &str = "***";

/// Client secret that is sent verbatim on the wire but never formatted.
///
/// Both `Debug` and `Display` print a fixed placeholder, so payloads and configurations can be
/// logged with `?`/`%` without leaking the value. Comparison is exact; an empty string is
/// accepted since the admin API is the authority on secret policy.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(Box<str>);
impl ClientSecret {
	/// Wraps a secret value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into().into_boxed_str())
	}

	/// Raw secret for building request bodies; never pass this to a formatter.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Whether the configured value is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl From<&str> for ClientSecret {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for ClientSecret {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl Debug for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ClientSecret({REDACTED})")
	}
}
impl Display for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}
