//! Set arithmetic between desired and actual client identifiers.

// self
use crate::{_prelude::*, config::ClientId};

/// Operations required to converge the actual client set to the desired one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncPlan {
	/// Registered but no longer desired.
	pub delete: BTreeSet<ClientId>,
	/// Registered and desired.
	pub update: BTreeSet<ClientId>,
	/// Desired but not registered.
	pub create: BTreeSet<ClientId>,
}
impl SyncPlan {
	/// Computes `actual − desired`, `actual ∩ desired`, and `desired − actual`.
	///
	/// Duplicate identifiers on either side collapse into one operation.
	pub fn new<'a, Des, Act>(desired: Des, actual: Act) -> Self
	where
		Des: IntoIterator<Item = &'a ClientId>,
		Act: IntoIterator<Item = &'a ClientId>,
	{
		let desired = desired.into_iter().collect::<BTreeSet<_>>();
		let actual = actual.into_iter().collect::<BTreeSet<_>>();

		Self {
			delete: actual.difference(&desired).map(|id| (*id).clone()).collect(),
			update: actual.intersection(&desired).map(|id| (*id).clone()).collect(),
			create: desired.difference(&actual).map(|id| (*id).clone()).collect(),
		}
	}

	/// Total number of planned operations.
	pub fn len(&self) -> usize {
		self.delete.len() + self.update.len() + self.create.len()
	}

	/// Returns true when nothing is registered or desired.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
