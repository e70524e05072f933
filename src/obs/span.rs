// crates.io
use tracing::{Span, instrument::Instrumented};
// self
use crate::{_prelude::*, obs::OperationKind};

/// Span wrapper used around every admin API call.
#[derive(Clone, Debug)]
pub struct OperationSpan(Span);
impl OperationSpan {
	/// Creates a span for an operation that is not tied to a single client.
	pub fn new(kind: OperationKind) -> Self {
		Self(tracing::info_span!(
			"hydra_sync.operation",
			operation = kind.as_str(),
			client_id = tracing::field::Empty
		))
	}

	/// Creates a span for an operation targeting `client_id`.
	pub fn for_client(kind: OperationKind, client_id: &str) -> Self {
		let this = Self::new(kind);

		this.0.record("client_id", client_id);

		this
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.0.clone())
	}
}
