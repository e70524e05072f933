//! Declarative OAuth 2.0 client reconciliation for Ory Hydra: load the desired client set from
//! JSON, wait for the admin API to become ready, then converge its registry with idempotent
//! deletes and single-hop create/update fallbacks.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod directory;
pub mod error;
pub mod obs;
pub mod request;
pub mod sync;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(feature = "cli")] use {clap as _, color_eyre as _, tracing_subscriber as _};
#[cfg(test)] use httpmock as _;
