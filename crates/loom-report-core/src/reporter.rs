// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The reporter capability implemented by error-reporting backends.
//!
//! A [`Reporter`] is anything that can record errors for later inspection:
//! a crash-reporting service, a telemetry pipeline, or a plain log sink.
//! The router holds reporters by shared reference and never owns their
//! lifecycle beyond calling [`Reporter::initialize`].
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use loom_report_core::{CapturedError, Reporter, ReporterError};
//!
//! struct StdoutReporter;
//!
//! #[async_trait]
//! impl Reporter for StdoutReporter {
//!     fn name(&self) -> &str {
//!         "stdout"
//!     }
//!
//!     async fn initialize(&self) -> Result<(), ReporterError> {
//!         Ok(())
//!     }
//!
//!     fn record_error(&self, error: &CapturedError) -> Result<(), ReporterError> {
//!         println!("[{}] {}", error.kind, error.message);
//!         Ok(())
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ReporterError;
use crate::event::{CapturedError, FrameworkErrorDetails};

/// An error-reporting backend.
///
/// `record_*` methods are called from inside platform error hooks. They
/// must not block on network I/O: backends that deliver remotely should
/// queue or spawn the delivery and return immediately. Returned errors and
/// panics are contained by the dispatcher and never reach the hook.
#[async_trait]
pub trait Reporter: Send + Sync + 'static {
	/// Short name used in logs.
	fn name(&self) -> &str;

	/// Starts the backend, e.g. an SDK handshake.
	///
	/// May be called more than once across repeated configure/initialize
	/// cycles; implementations should tolerate that.
	async fn initialize(&self) -> Result<(), ReporterError>;

	/// Records a non-framework error.
	fn record_error(&self, error: &CapturedError) -> Result<(), ReporterError>;

	/// Records an error raised through the framework-error slot.
	fn record_framework_error(&self, details: &FrameworkErrorDetails) -> Result<(), ReporterError> {
		self.record_error(&details.error)
	}
}

/// Type alias for a shared reporter.
pub type SharedReporter = Arc<dyn Reporter>;

/// Which of the two reporter variants a route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReporterRole {
	/// The application-supplied backend.
	Custom,
	/// The built-in backend.
	Builtin,
}

impl ReporterRole {
	/// Fixed fan-out order.
	pub const DISPATCH_ORDER: [ReporterRole; 2] = [ReporterRole::Custom, ReporterRole::Builtin];
}

impl fmt::Display for ReporterRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Custom => write!(f, "custom"),
			Self::Builtin => write!(f, "builtin"),
		}
	}
}

/// A reporter that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

#[async_trait]
impl Reporter for NoOpReporter {
	fn name(&self) -> &str {
		"noop"
	}

	async fn initialize(&self) -> Result<(), ReporterError> {
		Ok(())
	}

	fn record_error(&self, _error: &CapturedError) -> Result<(), ReporterError> {
		Ok(())
	}
}
