// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The process-wide router behind the free functions.
//!
//! The global router can be initialized only once, so the whole lifecycle
//! lives in one test.

mod support;

use std::sync::Arc;

use loom_report::{ErrorKind, HandlerOwnership, ReporterRole, ReportingConfig};
use support::{Collector, Inbox};

#[test]
fn test_global_lifecycle() {
	std::env::remove_var(loom_report_core::LOCAL_BACKEND_ENV);

	let inbox = Inbox::default();

	let early = loom_report::log_error(std::io::Error::other("too early"), None, None);
	assert_eq!(early.attempted(), 0);

	loom_report::configure(
		ReportingConfig::builder()
			.custom_reporter(Collector::new("custom", &inbox))
			.use_builtin_reporter(true)
			.builtin_reporter(Arc::new(Collector::new("builtin", &inbox)))
			.enable_in_debug(true)
			.enable_on_web(true)
			.build(),
	);

	let report = tokio_test::block_on(loom_report::initialize_error_handling(None)).unwrap();
	assert!(!report.already_installed);
	assert_eq!(report.ownership, HandlerOwnership::OwnedByRouter);
	assert_eq!(
		report.initialized,
		vec![ReporterRole::Custom, ReporterRole::Builtin]
	);
	assert_eq!(loom_report::global().ownership(), HandlerOwnership::OwnedByRouter);

	let summary = loom_report::log_error(
		std::io::Error::other("disk full"),
		Some("saving draft"),
		None,
	);
	assert!(summary.was_delivered(ReporterRole::Custom));
	assert!(summary.was_delivered(ReporterRole::Builtin));

	let seen = inbox.seen();
	assert_eq!(seen.len(), 2);
	assert!(seen.iter().all(|s| s.kind == ErrorKind::ManualError));
	assert!(seen
		.iter()
		.all(|s| s.context.as_deref() == Some("saving draft")));

	let again = tokio_test::block_on(loom_report::initialize_error_handling(Some(
		ReportingConfig::disabled(),
	)))
	.unwrap();
	assert!(again.already_installed);
}
