// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sources of the environment flags consumed by the gate evaluator.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::gate::EnvironmentSnapshot;
use crate::settings::parse_bool;

/// Environment variable that switches local-backend mode on.
pub const LOCAL_BACKEND_ENV: &str = "LOOM_REPORT_LOCAL_BACKEND";

/// Produces environment snapshots.
///
/// Callers take a fresh snapshot for every gate evaluation; implementations
/// must not assume the result is cached.
pub trait EnvironmentProbe: Send + Sync {
	fn snapshot(&self) -> EnvironmentSnapshot;
}

impl EnvironmentProbe for EnvironmentSnapshot {
	fn snapshot(&self) -> EnvironmentSnapshot {
		*self
	}
}

/// Flags of the running process.
///
/// Debug build and web platform come from compile-time configuration.
/// Local-backend mode is read from [`LOCAL_BACKEND_ENV`] on every snapshot;
/// a value that is set but not a recognised boolean counts as enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostEnvironment;

impl HostEnvironment {
	pub const fn is_debug_build() -> bool {
		cfg!(debug_assertions)
	}

	pub const fn is_web_platform() -> bool {
		cfg!(target_family = "wasm")
	}
}

impl EnvironmentProbe for HostEnvironment {
	fn snapshot(&self) -> EnvironmentSnapshot {
		let is_local_backend_mode = std::env::var(LOCAL_BACKEND_ENV)
			.map(|value| parse_bool(&value).unwrap_or(true))
			.unwrap_or(false);

		EnvironmentSnapshot {
			is_debug_build: Self::is_debug_build(),
			is_web_platform: Self::is_web_platform(),
			is_local_backend_mode,
		}
	}
}

/// Settable flags for tests and embedders with their own detection.
#[derive(Debug, Default)]
pub struct StaticEnvironment {
	debug_build: AtomicBool,
	web_platform: AtomicBool,
	local_backend_mode: AtomicBool,
}

impl StaticEnvironment {
	pub fn new(snapshot: EnvironmentSnapshot) -> Self {
		Self {
			debug_build: AtomicBool::new(snapshot.is_debug_build),
			web_platform: AtomicBool::new(snapshot.is_web_platform),
			local_backend_mode: AtomicBool::new(snapshot.is_local_backend_mode),
		}
	}

	pub fn set_debug_build(&self, value: bool) {
		self.debug_build.store(value, Ordering::SeqCst);
	}

	pub fn set_web_platform(&self, value: bool) {
		self.web_platform.store(value, Ordering::SeqCst);
	}

	pub fn set_local_backend_mode(&self, value: bool) {
		self.local_backend_mode.store(value, Ordering::SeqCst);
	}
}

impl EnvironmentProbe for StaticEnvironment {
	fn snapshot(&self) -> EnvironmentSnapshot {
		EnvironmentSnapshot {
			is_debug_build: self.debug_build.load(Ordering::SeqCst),
			is_web_platform: self.web_platform.load(Ordering::SeqCst),
			is_local_backend_mode: self.local_backend_mode.load(Ordering::SeqCst),
		}
	}
}
