// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment gating: whether a reporter should receive events right now.
//!
//! ```text
//! should_report = !is_local_backend_mode
//!              && (enable_in_debug || !is_debug_build)
//!              && (enable_on_web   || !is_web_platform)
//! ```
//!
//! Local-backend mode always wins: runs against an emulator or sandbox
//! backend must never reach production dashboards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-reporter gate bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
	/// Report from debug/test builds.
	pub enable_in_debug: bool,
	/// Report from the web platform target.
	pub enable_on_web: bool,
}

impl GateConfig {
	pub const fn new(enable_in_debug: bool, enable_on_web: bool) -> Self {
		Self {
			enable_in_debug,
			enable_on_web,
		}
	}

	/// Gates that pass in every environment except local-backend mode.
	pub const fn open() -> Self {
		Self::new(true, true)
	}
}

/// Environment flags observed at a single point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
	pub is_debug_build: bool,
	pub is_web_platform: bool,
	pub is_local_backend_mode: bool,
}

impl EnvironmentSnapshot {
	pub const fn new(is_debug_build: bool, is_web_platform: bool, is_local_backend_mode: bool) -> Self {
		Self {
			is_debug_build,
			is_web_platform,
			is_local_backend_mode,
		}
	}

	/// A release build on a native platform against production backends.
	pub const fn production() -> Self {
		Self::new(false, false, false)
	}
}

/// Why a reporter was gated out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
	LocalBackend,
	DebugBuild,
	WebPlatform,
}

impl fmt::Display for SuppressReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::LocalBackend => write!(f, "local backend mode"),
			Self::DebugBuild => write!(f, "debug build"),
			Self::WebPlatform => write!(f, "web platform"),
		}
	}
}

/// Outcome of evaluating a reporter's gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
	Report,
	Suppressed(SuppressReason),
}

impl GateDecision {
	pub const fn should_report(self) -> bool {
		matches!(self, Self::Report)
	}
}

/// Evaluates the gates, naming the first failing condition.
///
/// Conditions are checked in the order local backend, debug build, web
/// platform.
pub const fn evaluate(gates: &GateConfig, env: &EnvironmentSnapshot) -> GateDecision {
	if env.is_local_backend_mode {
		GateDecision::Suppressed(SuppressReason::LocalBackend)
	} else if env.is_debug_build && !gates.enable_in_debug {
		GateDecision::Suppressed(SuppressReason::DebugBuild)
	} else if env.is_web_platform && !gates.enable_on_web {
		GateDecision::Suppressed(SuppressReason::WebPlatform)
	} else {
		GateDecision::Report
	}
}

/// Whether a reporter with `gates` should report in `env`.
pub const fn should_report(gates: &GateConfig, env: &EnvironmentSnapshot) -> bool {
	!env.is_local_backend_mode
		&& (gates.enable_in_debug || !env.is_debug_build)
		&& (gates.enable_on_web || !env.is_web_platform)
}
