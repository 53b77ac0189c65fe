// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Serializable reporting settings loaded from TOML or the environment.
//!
//! Only the boolean policy lives here; reporters are attached in code with
//! [`ReportingSettings::into_config`].
//!
//! ```toml
//! use_builtin_reporter = true
//! hooks_owned_externally = false
//! enable_in_debug = false
//! enable_on_web = true
//!
//! [builtin_gates]
//! enable_in_debug = true
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ReportingConfig;
use crate::error::{ConfigError, Result};
use crate::gate::GateConfig;
use crate::reporter::SharedReporter;

pub const USE_BUILTIN_ENV: &str = "LOOM_REPORT_USE_BUILTIN";
pub const HOOKS_EXTERNAL_ENV: &str = "LOOM_REPORT_HOOKS_EXTERNAL";
pub const ENABLE_IN_DEBUG_ENV: &str = "LOOM_REPORT_ENABLE_IN_DEBUG";
pub const ENABLE_ON_WEB_ENV: &str = "LOOM_REPORT_ENABLE_ON_WEB";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingSettings {
	pub use_builtin_reporter: bool,
	pub hooks_owned_externally: bool,
	pub enable_in_debug: bool,
	pub enable_on_web: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub custom_gates: Option<GateConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub builtin_gates: Option<GateConfig>,
}

impl Default for ReportingSettings {
	fn default() -> Self {
		Self {
			use_builtin_reporter: true,
			hooks_owned_externally: false,
			enable_in_debug: false,
			enable_on_web: false,
			custom_gates: None,
			builtin_gates: None,
		}
	}
}

impl ReportingSettings {
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Loads overrides from `LOOM_REPORT_*` environment variables on top of
	/// the defaults.
	pub fn from_env() -> Result<Self> {
		Self::default().apply_lookup(|key| std::env::var(key).ok())
	}

	/// Like [`from_env`](Self::from_env) with an arbitrary variable source.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		Self::default().apply_lookup(lookup)
	}

	/// Applies variables present in `lookup`, leaving other fields unchanged.
	pub fn apply_lookup<F>(mut self, lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |key: &str, slot: &mut bool| -> Result<()> {
			if let Some(raw) = lookup(key) {
				*slot = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidSetting {
					key: key.to_string(),
					value: raw.clone(),
				})?;
				debug!(key, value = *slot, "Reporting setting loaded");
			}
			Ok(())
		};

		read(USE_BUILTIN_ENV, &mut self.use_builtin_reporter)?;
		read(HOOKS_EXTERNAL_ENV, &mut self.hooks_owned_externally)?;
		read(ENABLE_IN_DEBUG_ENV, &mut self.enable_in_debug)?;
		read(ENABLE_ON_WEB_ENV, &mut self.enable_on_web)?;

		Ok(self)
	}

	pub fn into_config(self, custom_reporter: Option<SharedReporter>) -> ReportingConfig {
		ReportingConfig {
			custom_reporter,
			use_builtin_reporter: self.use_builtin_reporter,
			builtin_reporter: None,
			hooks_owned_externally: self.hooks_owned_externally,
			gates: GateConfig::new(self.enable_in_debug, self.enable_on_web),
			custom_gates: self.custom_gates,
			builtin_gates: self.builtin_gates,
		}
	}
}

/// Parses `1/0`, `true/false`, `yes/no`, `on/off`, ignoring case and
/// surrounding whitespace.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
	match raw.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}
