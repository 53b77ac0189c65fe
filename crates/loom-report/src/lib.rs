// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error-reporting router for Loom applications.
//!
//! The router captures errors from four sources (framework/panic errors,
//! unhandled async errors, background-task failures and manual reports) and
//! fans each one out to an optional custom reporter and the built-in
//! reporter. Per-reporter gates decide whether a report is sent based on the
//! build mode, the platform and local-backend mode.
//!
//! # Example
//!
//! ```ignore
//! use loom_report::{ReportingConfig, NoOpReporter};
//!
//! loom_report::configure(ReportingConfig::builtin_and_custom(NoOpReporter, false));
//! let report = loom_report::initialize_error_handling(None).await?;
//! for warning in &report.warnings {
//!     eprintln!("{warning}");
//! }
//!
//! loom_report::log_error(std::io::Error::other("disk full"), Some("saving draft"), None);
//! ```
//!
//! Hooks are installed once per router. When the custom reporter installs
//! the platform hooks itself (`hooks_owned_externally`), the router leaves
//! them in place and only chains the built-in reporter onto them.

mod builtin;
mod dispatch;
mod error;
pub mod host;
mod ownership;
mod router;

#[cfg(test)]
mod test_support;

use std::error::Error;
use std::sync::{Arc, OnceLock};

pub use builtin::TracingReporter;
pub use dispatch::{DispatchSummary, Dispatcher, ErrorEvent, Route};
pub use error::{Result, RouterError};
pub use host::{BackgroundTasks, HostRuntime, ProcessHost};
pub use loom_report_core::{
	CapturedError, ConfigError, EnvironmentProbe, EnvironmentSnapshot, ErrorKind,
	FrameworkErrorDetails, GateConfig, GateDecision, HostEnvironment, NoOpReporter, PanicError,
	Reporter, ReporterError, ReporterRole, ReportingConfig, ReportingConfigBuilder, ReportingSettings,
	SharedReporter, StaticEnvironment, SuppressReason, Trace, TraceFrame,
};
pub use ownership::{HandlerOwnership, OwnershipCell};
pub use router::{ErrorRouter, InitReport, InitWarning};

static GLOBAL_ROUTER: OnceLock<ErrorRouter> = OnceLock::new();

/// The process-wide router over [`ProcessHost::global`].
pub fn global() -> &'static ErrorRouter {
	GLOBAL_ROUTER.get_or_init(|| ErrorRouter::new(ProcessHost::global(), Arc::new(HostEnvironment)))
}

/// Stores the config for the next [`initialize_error_handling`] call.
pub fn configure(config: ReportingConfig) {
	global().configure(config);
}

/// Installs error handling on the process-wide router.
pub async fn initialize_error_handling(config: Option<ReportingConfig>) -> Result<InitReport> {
	global().initialize_error_handling(config).await
}

/// Reports an error through the process-wide router.
pub fn log_error<E>(error: E, message: Option<&str>, trace: Option<Trace>) -> DispatchSummary
where
	E: Error + Send + Sync + 'static,
{
	global().log_error(error, message, trace)
}
