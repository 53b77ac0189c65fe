// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for reporting configuration and reporter backends.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors caused by a malformed or missing reporting configuration.
///
/// These are programmer mistakes and are surfaced loudly from
/// initialization rather than swallowed.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Hooks are declared externally owned but nobody was supplied to own them.
	#[error("hooks_owned_externally is set but no custom reporter was supplied")]
	ExternalOwnerWithoutReporter,

	/// Initialization ran before any configuration was supplied.
	#[error("error reporting was initialized before it was configured")]
	NotConfigured,

	/// A setting could not be parsed.
	#[error("invalid value for {key}: {value:?}")]
	InvalidSetting {
		/// Setting name (environment variable or TOML key).
		key: String,
		/// The rejected raw value.
		value: String,
	},

	/// TOML settings could not be parsed.
	#[error("invalid reporting settings: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Errors returned by a [`Reporter`](crate::Reporter) backend.
#[derive(Debug, Error)]
pub enum ReporterError {
	/// The backend failed its startup handshake.
	#[error("reporter initialization failed: {0}")]
	Initialization(String),

	/// The backend rejected or failed to record an event.
	#[error("failed to record error: {0}")]
	Record(String),

	/// The backend has been shut down.
	#[error("reporter has been shut down")]
	Shutdown,

	/// Any other backend failure.
	#[error(transparent)]
	Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
