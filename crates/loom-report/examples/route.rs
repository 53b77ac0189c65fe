// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Routes a manual report, a background panic and an async error to a
//! stderr reporter and the built-in `tracing` reporter.
//!
//! ```sh
//! RUST_LOG=loom_report=debug cargo run -p loom-report --example route
//! ```

use async_trait::async_trait;
use loom_report::{
	CapturedError, ErrorKind, ProcessHost, Reporter, ReporterError, ReportingSettings,
};
use tracing_subscriber::EnvFilter;

struct StderrReporter;

#[async_trait]
impl Reporter for StderrReporter {
	fn name(&self) -> &str {
		"stderr"
	}

	async fn initialize(&self) -> Result<(), ReporterError> {
		eprintln!("[stderr] ready");
		Ok(())
	}

	fn record_error(&self, error: &CapturedError) -> Result<(), ReporterError> {
		eprintln!("[stderr] {} {}: {}", error.event_id, error.kind, error.message);
		Ok(())
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let settings = ReportingSettings::from_env()?;
	let mut config = settings.into_config(Some(std::sync::Arc::new(StderrReporter)));
	if cfg!(debug_assertions) {
		config.gates.enable_in_debug = true;
	}

	let report = loom_report::initialize_error_handling(Some(config)).await?;
	for warning in &report.warnings {
		eprintln!("{warning}");
	}

	loom_report::log_error(
		std::io::Error::other("disk full"),
		Some("saving draft"),
		None,
	);

	let host = ProcessHost::global();
	if let Some(tasks) = host.background_tasks() {
		if let Err(err) = tasks
			.spawn_monitored("indexer", async { panic!("index corrupted") })
			.await
		{
			eprintln!("indexer task failed to join: {err}");
		}
	}

	host.report_async_error(CapturedError::from_message(
		ErrorKind::AsyncError,
		"request future dropped",
	));

	Ok(())
}
