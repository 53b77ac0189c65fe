// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The built-in reporter: structured `tracing` events.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use loom_report_core::{CapturedError, FrameworkErrorDetails, Reporter, ReporterError};
use tracing::{error, info};

/// Default built-in backend for a Rust process.
///
/// Every captured error becomes one `error!` event on the
/// `loom_report::builtin` target, so whatever subscriber the application
/// installs (stderr, JSON, a log shipper) receives it.
#[derive(Debug, Default)]
pub struct TracingReporter {
	recorded: AtomicU64,
}

impl TracingReporter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of events recorded so far.
	pub fn recorded(&self) -> u64 {
		self.recorded.load(Ordering::Relaxed)
	}

	fn emit(&self, captured: &CapturedError, details: Option<&FrameworkErrorDetails>) {
		self.recorded.fetch_add(1, Ordering::Relaxed);

		let frames = captured.trace.as_ref().map_or(0, |t| t.len());
		let library = details.and_then(|d| d.library.as_deref()).unwrap_or("");
		let location = details.and_then(|d| d.location.as_deref()).unwrap_or("");

		error!(
			target: "loom_report::builtin",
			event_id = %captured.event_id,
			kind = %captured.kind,
			error_type = %captured.error_type,
			context = captured.context.as_deref().unwrap_or(""),
			frames,
			library,
			location,
			"{}",
			captured.message
		);
	}
}

#[async_trait]
impl Reporter for TracingReporter {
	fn name(&self) -> &str {
		"tracing"
	}

	async fn initialize(&self) -> Result<(), ReporterError> {
		info!(target: "loom_report::builtin", "Built-in error reporter ready");
		Ok(())
	}

	fn record_error(&self, error: &CapturedError) -> Result<(), ReporterError> {
		self.emit(error, None);
		Ok(())
	}

	fn record_framework_error(&self, details: &FrameworkErrorDetails) -> Result<(), ReporterError> {
		if details.silent {
			return Ok(());
		}
		self.emit(&details.error, Some(details));
		Ok(())
	}
}
