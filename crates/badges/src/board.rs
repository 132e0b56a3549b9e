//! Shared badge counter state.
//!
//! Each badge moves through `Unrefreshed -> Refreshed -> Stale` and back to
//! `Unrefreshed` on reset. The caller drives invalidation; the aggregator
//! drives refreshes. Reads never block on a refresh in flight.

use std::sync::Arc;

use cockpit_registry::ActionDescriptor;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Lifecycle state of one badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum BadgeState {
	/// No count yet; the descriptor default is shown.
	Unrefreshed,
	Refreshed { count: u64 },
	/// Last count is still shown but a refresh is due.
	Stale { count: u64 },
}

#[derive(Debug, Clone, Copy)]
struct BadgeEntry {
	default_count: u64,
	state: BadgeState,
	/// Generation of the refresh that last wrote this entry.
	generation: u64,
}

impl BadgeEntry {
	fn count(&self) -> u64 {
		match self.state {
			BadgeState::Unrefreshed => self.default_count,
			BadgeState::Refreshed { count } | BadgeState::Stale { count } => count,
		}
	}
}

/// Badge counts keyed by action api name. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct BadgeBoard {
	inner: Arc<RwLock<FxHashMap<String, BadgeEntry>>>,
}

impl BadgeBoard {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an unrefreshed badge unless one already exists.
	pub fn seed(&self, api: &str, default_count: u64) {
		let mut guard = self.inner.write();
		if !guard.contains_key(api) {
			guard.insert(
				api.to_owned(),
				BadgeEntry {
					default_count,
					state: BadgeState::Unrefreshed,
					generation: 0,
				},
			);
		}
	}

	/// Seeds every badge-carrying action.
	pub fn seed_actions<'a>(&self, actions: impl IntoIterator<Item = &'a ActionDescriptor>) {
		for action in actions {
			if let Some(badge) = action.badge() {
				self.seed(&action.api, badge.default_count);
			}
		}
	}

	/// Count to display: the last refreshed value, or the default.
	pub fn count(&self, api: &str) -> Option<u64> {
		self.inner.read().get(api).map(BadgeEntry::count)
	}

	pub fn state(&self, api: &str) -> Option<BadgeState> {
		self.inner.read().get(api).map(|e| e.state)
	}

	/// Marks every refreshed badge stale.
	pub fn invalidate(&self) {
		for entry in self.inner.write().values_mut() {
			if let BadgeState::Refreshed { count } = entry.state {
				entry.state = BadgeState::Stale { count };
			}
		}
	}

	/// Marks one badge stale. Returns `false` if it was not refreshed.
	pub fn invalidate_badge(&self, api: &str) -> bool {
		let mut guard = self.inner.write();
		match guard.get_mut(api) {
			Some(entry) => match entry.state {
				BadgeState::Refreshed { count } => {
					entry.state = BadgeState::Stale { count };
					true
				}
				_ => false,
			},
			None => false,
		}
	}

	/// Returns every badge to its default.
	pub fn reset(&self) {
		for entry in self.inner.write().values_mut() {
			entry.state = BadgeState::Unrefreshed;
		}
	}

	/// Records a refreshed count unless a newer generation already wrote it.
	pub(crate) fn apply(&self, api: &str, generation: u64, count: u64) -> bool {
		let mut guard = self.inner.write();
		let Some(entry) = guard.get_mut(api) else {
			return false;
		};
		if generation < entry.generation {
			return false;
		}
		entry.generation = generation;
		entry.state = BadgeState::Refreshed { count };
		true
	}

	/// Current counts sorted by api name.
	pub fn snapshot(&self) -> Vec<(String, u64)> {
		let guard = self.inner.read();
		let mut counts: Vec<_> = guard.iter().map(|(api, e)| (api.clone(), e.count())).collect();
		counts.sort_by(|a, b| a.0.cmp(&b.0));
		counts
	}
}
