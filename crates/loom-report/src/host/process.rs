// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Host runtime for an ordinary Rust process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use loom_report_core::{CapturedError, ErrorKind, FrameworkErrorDetails};
use tracing::info;

use super::panic::install_panic_bridge;
use super::{BackgroundErrorRegistry, BackgroundTasks, HookSlot, HostRuntime};
use crate::ownership::OwnershipCell;

static GLOBAL_HOST: OnceLock<Arc<ProcessHost>> = OnceLock::new();

/// Host runtime of a Rust process.
///
/// Panics reach the framework-error slot once
/// [`install_panic_bridge`](Self::install_panic_bridge) has run. Async
/// errors are raised by the application (or its executor glue) with
/// [`report_async_error`](Self::report_async_error). Background failures are
/// collected by [`BackgroundTasks`], absent on `wasm` targets.
#[derive(Debug)]
pub struct ProcessHost {
	framework: HookSlot<FrameworkErrorDetails>,
	async_errors: HookSlot<CapturedError>,
	background: Option<BackgroundTasks>,
	ownership: OwnershipCell,
	panic_bridge: AtomicBool,
}

impl ProcessHost {
	pub fn new() -> Self {
		let background = (!cfg!(target_family = "wasm")).then(BackgroundTasks::new);
		Self {
			framework: HookSlot::new(),
			async_errors: HookSlot::new(),
			background,
			ownership: OwnershipCell::new(),
			panic_bridge: AtomicBool::new(false),
		}
	}

	/// A host without background-task support.
	pub fn without_background() -> Self {
		Self {
			background: None,
			..Self::new()
		}
	}

	/// The process-wide host, with the panic bridge installed.
	pub fn global() -> Arc<ProcessHost> {
		Arc::clone(GLOBAL_HOST.get_or_init(|| {
			let host = Arc::new(ProcessHost::new());
			host.install_panic_bridge();
			host
		}))
	}

	/// Routes std panics into this host's framework-error slot.
	///
	/// Returns `false` if this host's bridge was already installed.
	pub fn install_panic_bridge(self: &Arc<Self>) -> bool {
		if self.panic_bridge.swap(true, Ordering::SeqCst) {
			return false;
		}
		install_panic_bridge(Arc::clone(self));
		info!("Panic bridge installed");
		true
	}

	/// Raises a framework-level error. Returns whether a handler saw it.
	pub fn raise_framework_error(&self, details: FrameworkErrorDetails) -> bool {
		self.framework.fire(&details)
	}

	/// Raises an unhandled asynchronous error. Returns whether a handler
	/// saw it.
	pub fn report_async_error(&self, error: CapturedError) -> bool {
		self.async_errors.fire(&error.with_kind(ErrorKind::AsyncError))
	}

	pub fn background_tasks(&self) -> Option<&BackgroundTasks> {
		self.background.as_ref()
	}
}

impl Default for ProcessHost {
	fn default() -> Self {
		Self::new()
	}
}

impl HostRuntime for ProcessHost {
	fn framework_errors(&self) -> &HookSlot<FrameworkErrorDetails> {
		&self.framework
	}

	fn async_errors(&self) -> &HookSlot<CapturedError> {
		&self.async_errors
	}

	fn background_errors(&self) -> Option<&dyn BackgroundErrorRegistry> {
		self
			.background
			.as_ref()
			.map(|tasks| tasks as &dyn BackgroundErrorRegistry)
	}

	fn ownership(&self) -> &OwnershipCell {
		&self.ownership
	}
}
