//! Hierarchical permission levels and the registry of currently granted levels.
//!
//! A [`PermissionRegistry`] is an explicitly owned handle. The application
//! creates one at startup and hands clones of it to every component that
//! gates behavior on permissions; all clones observe the same grant set.
//!
//! Containment is hierarchical rather than a total order:
//!
//! - `Admin` implies every level.
//! - `Developer` implies `Maintainer` and `User`.
//! - `Maintainer` implies `User`.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Authorization tier gating commands and UI elements.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum PermissionLevel {
	/// No restriction. Callers treat a `None` requirement as always satisfied.
	#[default]
	None,
	User,
	Developer,
	Maintainer,
	Admin,
}

impl PermissionLevel {
	/// Returns true when holding `self` satisfies a request for `requested`.
	pub const fn covers(self, requested: PermissionLevel) -> bool {
		if self as u8 == requested as u8 {
			return true;
		}
		match self {
			Self::Admin => true,
			Self::Developer => matches!(requested, Self::Maintainer | Self::User),
			Self::Maintainer => matches!(requested, Self::User),
			Self::None | Self::User => false,
		}
	}
}

/// Raised by [`PermissionRegistry::require`] when a level is not held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("permission '{required}' is required")]
pub struct PermissionDenied {
	pub required: PermissionLevel,
}

/// Shared set of granted permission levels.
#[derive(Debug, Default, Clone)]
pub struct PermissionRegistry {
	granted: Arc<RwLock<FxHashSet<PermissionLevel>>>,
}

impl PermissionRegistry {
	/// Creates a registry with nothing granted.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry with `levels` granted.
	pub fn from_levels(levels: impl IntoIterator<Item = PermissionLevel>) -> Self {
		let registry = Self::new();
		for level in levels {
			registry.grant(level);
		}
		registry
	}

	/// Grants `level`. Returns true if it was not granted before.
	pub fn grant(&self, level: PermissionLevel) -> bool {
		let added = self.granted.write().insert(level);
		if added {
			tracing::debug!(%level, "permission granted");
		}
		added
	}

	/// Revokes `level`. Returns true if it was granted before.
	pub fn revoke(&self, level: PermissionLevel) -> bool {
		let removed = self.granted.write().remove(&level);
		if removed {
			tracing::debug!(%level, "permission revoked");
		}
		removed
	}

	/// Revokes everything.
	pub fn clear(&self) {
		self.granted.write().clear();
	}

	/// Returns true if `level` is granted directly or implied by a granted level.
	///
	/// `PermissionLevel::None` gets no special treatment here; see [`Self::permits`].
	pub fn has_permission(&self, level: PermissionLevel) -> bool {
		self.granted.read().iter().any(|granted| granted.covers(level))
	}

	/// Enablement rule for permission-gated elements: a `None` requirement always passes.
	pub fn permits(&self, required: PermissionLevel) -> bool {
		required == PermissionLevel::None || self.has_permission(required)
	}

	/// Fails with [`PermissionDenied`] unless `level` is held.
	pub fn require(&self, level: PermissionLevel) -> Result<(), PermissionDenied> {
		if self.has_permission(level) { Ok(()) } else { Err(PermissionDenied { required: level }) }
	}

	/// Returns the directly granted levels, sorted.
	pub fn granted(&self) -> Vec<PermissionLevel> {
		let mut levels: Vec<_> = self.granted.read().iter().copied().collect();
		levels.sort();
		levels
	}
}

#[cfg(test)]
mod tests;
