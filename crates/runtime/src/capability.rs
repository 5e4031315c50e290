//! Capability tags and the marker traits they mirror.
//!
//! A registration carries explicit tag bits chosen at registration time. The
//! lifecycle manager reads them to decide who gets released; nothing else
//! inspects them.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use downcast_rs::{DowncastSync, impl_downcast};

use crate::error::BoxError;

/// Set of capability tags attached to a registration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
	pub const NONE: Self = Self(0);
	pub const MODULE: Self = Self(1 << 0);
	pub const SERVICE: Self = Self(1 << 1);
	pub const DISPOSABLE: Self = Self(1 << 2);

	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	pub const fn is_module(self) -> bool {
		self.contains(Self::MODULE)
	}

	pub const fn is_service(self) -> bool {
		self.contains(Self::SERVICE)
	}

	pub const fn is_disposable(self) -> bool {
		self.contains(Self::DISPOSABLE)
	}

	pub const fn is_empty(self) -> bool {
		self.0 == 0
	}
}

impl BitOr for Capabilities {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		Self(self.0 | rhs.0)
	}
}

impl BitOrAssign for Capabilities {
	fn bitor_assign(&mut self, rhs: Self) {
		self.0 |= rhs.0;
	}
}

impl fmt::Debug for Capabilities {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names = Vec::new();
		if self.is_module() {
			names.push("MODULE");
		}
		if self.is_service() {
			names.push("SERVICE");
		}
		if self.is_disposable() {
			names.push("DISPOSABLE");
		}
		if names.is_empty() {
			f.write_str("Capabilities(NONE)")
		} else {
			write!(f, "Capabilities({})", names.join(" | "))
		}
	}
}

/// Marker for higher-level capability units (login, session, account, store).
///
/// `Client::get_module` only accepts types implementing this trait. Trait
/// objects of sub-traits (`dyn LoginModule`) satisfy it through the supertrait.
pub trait Module: Send + Sync + 'static {}

/// Marker for low-level capability providers (transport, logging, actions).
pub trait Service: Send + Sync + 'static {}

/// A component with release logic run during client disposal.
///
/// Implementations take `&self` because instances are shared; use interior
/// mutability for any state the release touches.
pub trait Disposable: DowncastSync {
	fn dispose(&self) -> std::result::Result<(), BoxError>;
}

impl_downcast!(sync Disposable);
