// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One-shot record of who owns the platform error hooks.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Who installed the platform error hooks.
///
/// Moves forward exactly once, from `Unowned` to one of the owned states,
/// and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerOwnership {
	Unowned,
	OwnedByRouter,
	OwnedExternally,
}

impl HandlerOwnership {
	const fn to_u8(self) -> u8 {
		match self {
			Self::Unowned => 0,
			Self::OwnedByRouter => 1,
			Self::OwnedExternally => 2,
		}
	}

	const fn from_u8(value: u8) -> Self {
		match value {
			1 => Self::OwnedByRouter,
			2 => Self::OwnedExternally,
			_ => Self::Unowned,
		}
	}

	pub const fn is_owned(self) -> bool {
		!matches!(self, Self::Unowned)
	}
}

impl fmt::Display for HandlerOwnership {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unowned => write!(f, "unowned"),
			Self::OwnedByRouter => write!(f, "owned by router"),
			Self::OwnedExternally => write!(f, "owned externally"),
		}
	}
}

/// Atomic holder for [`HandlerOwnership`].
#[derive(Debug)]
pub struct OwnershipCell(AtomicU8);

impl OwnershipCell {
	pub const fn new() -> Self {
		Self(AtomicU8::new(HandlerOwnership::Unowned.to_u8()))
	}

	pub fn get(&self) -> HandlerOwnership {
		HandlerOwnership::from_u8(self.0.load(Ordering::SeqCst))
	}

	/// Moves from `Unowned` to `target`.
	///
	/// Fails with the current state if ownership was already taken; only one
	/// of any number of concurrent callers succeeds.
	pub fn claim(&self, target: HandlerOwnership) -> Result<(), HandlerOwnership> {
		if !target.is_owned() {
			return Err(self.get());
		}
		self
			.0
			.compare_exchange(
				HandlerOwnership::Unowned.to_u8(),
				target.to_u8(),
				Ordering::SeqCst,
				Ordering::SeqCst,
			)
			.map(|_| ())
			.map_err(HandlerOwnership::from_u8)
	}
}

impl Default for OwnershipCell {
	fn default() -> Self {
		Self::new()
	}
}
