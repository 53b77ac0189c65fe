// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Declarative reporting policy.

use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigError, Result};
use crate::gate::GateConfig;
use crate::reporter::{Reporter, ReporterRole, SharedReporter};

/// Which reporters are active, who owns the platform error hooks, and the
/// environment gates.
///
/// Immutable once built. The router holds the reporters by shared
/// reference; the application keeps ownership of them.
#[derive(Clone, Default)]
pub struct ReportingConfig {
	/// The application-supplied backend, if any.
	pub custom_reporter: Option<SharedReporter>,
	/// Whether the built-in backend participates.
	pub use_builtin_reporter: bool,
	/// Replacement for the crate's default built-in backend.
	pub builtin_reporter: Option<SharedReporter>,
	/// The custom reporter (or a wrapper around it) installs the platform
	/// hooks itself.
	pub hooks_owned_externally: bool,
	/// Gates shared by both reporters unless overridden.
	pub gates: GateConfig,
	pub custom_gates: Option<GateConfig>,
	pub builtin_gates: Option<GateConfig>,
}

impl ReportingConfig {
	pub fn builder() -> ReportingConfigBuilder {
		ReportingConfigBuilder::new()
	}

	/// No custom reporter; only the built-in backend reports.
	pub fn disabled() -> Self {
		Self {
			use_builtin_reporter: true,
			..Self::default()
		}
	}

	/// Only the custom reporter reports.
	pub fn custom_only(reporter: impl Reporter, hooks_owned_externally: bool) -> Self {
		Self {
			custom_reporter: Some(Arc::new(reporter)),
			hooks_owned_externally,
			..Self::default()
		}
	}

	/// Both the built-in backend and the custom reporter report.
	pub fn builtin_and_custom(reporter: impl Reporter, hooks_owned_externally: bool) -> Self {
		Self {
			use_builtin_reporter: true,
			..Self::custom_only(reporter, hooks_owned_externally)
		}
	}

	/// Effective gates for one reporter.
	pub fn gates_for(&self, role: ReporterRole) -> GateConfig {
		let role_gates = match role {
			ReporterRole::Custom => self.custom_gates,
			ReporterRole::Builtin => self.builtin_gates,
		};
		role_gates.unwrap_or(self.gates)
	}

	pub fn is_enabled(&self, role: ReporterRole) -> bool {
		match role {
			ReporterRole::Custom => self.custom_reporter.is_some(),
			ReporterRole::Builtin => self.use_builtin_reporter,
		}
	}

	/// Rejects shapes that can only be fixed by changing code.
	pub fn validate(&self) -> Result<()> {
		if self.hooks_owned_externally && self.custom_reporter.is_none() {
			return Err(ConfigError::ExternalOwnerWithoutReporter);
		}
		Ok(())
	}
}

impl fmt::Debug for ReportingConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReportingConfig")
			.field(
				"custom_reporter",
				&self.custom_reporter.as_ref().map(|r| r.name().to_string()),
			)
			.field("use_builtin_reporter", &self.use_builtin_reporter)
			.field(
				"builtin_reporter",
				&self.builtin_reporter.as_ref().map(|r| r.name().to_string()),
			)
			.field("hooks_owned_externally", &self.hooks_owned_externally)
			.field("gates", &self.gates)
			.field("custom_gates", &self.custom_gates)
			.field("builtin_gates", &self.builtin_gates)
			.finish()
	}
}

/// Builder for arbitrary [`ReportingConfig`] combinations.
#[derive(Debug, Default)]
pub struct ReportingConfigBuilder {
	config: ReportingConfig,
}

impl ReportingConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn custom_reporter(mut self, reporter: impl Reporter) -> Self {
		self.config.custom_reporter = Some(Arc::new(reporter));
		self
	}

	/// Sets the custom reporter from an existing shared handle.
	pub fn shared_custom_reporter(mut self, reporter: SharedReporter) -> Self {
		self.config.custom_reporter = Some(reporter);
		self
	}

	pub fn use_builtin_reporter(mut self, enabled: bool) -> Self {
		self.config.use_builtin_reporter = enabled;
		self
	}

	/// Replaces the default built-in backend. Does not enable it.
	pub fn builtin_reporter(mut self, reporter: SharedReporter) -> Self {
		self.config.builtin_reporter = Some(reporter);
		self
	}

	pub fn hooks_owned_externally(mut self, external: bool) -> Self {
		self.config.hooks_owned_externally = external;
		self
	}

	pub fn enable_in_debug(mut self, enabled: bool) -> Self {
		self.config.gates.enable_in_debug = enabled;
		self
	}

	pub fn enable_on_web(mut self, enabled: bool) -> Self {
		self.config.gates.enable_on_web = enabled;
		self
	}

	pub fn gates(mut self, gates: GateConfig) -> Self {
		self.config.gates = gates;
		self
	}

	pub fn custom_gates(mut self, gates: GateConfig) -> Self {
		self.config.custom_gates = Some(gates);
		self
	}

	pub fn builtin_gates(mut self, gates: GateConfig) -> Self {
		self.config.builtin_gates = Some(gates);
		self
	}

	/// Builds the config. Validation happens at initialization time.
	pub fn build(self) -> ReportingConfig {
		self.config
	}
}
