// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The host runtime's error-notification surface.
//!
//! How a host detects errors is its own business; the router only needs
//! two settable slots and, where the platform supports background work, a
//! way to listen for background failures.

mod background;
mod guard;
mod panic;
mod process;
mod slot;

pub use background::BackgroundTasks;
pub use panic::{install_panic_bridge, panic_message};
pub use process::ProcessHost;
pub use slot::{Handler, HookSlot};

pub(crate) use guard::BridgeSuppressed;
#[cfg(test)]
pub(crate) use guard::bridge_suppressed;

use loom_report_core::{CapturedError, FrameworkErrorDetails};

use crate::ownership::OwnershipCell;

/// Registration API for background-task (isolate) error listeners.
pub trait BackgroundErrorRegistry: Send + Sync {
	fn add_error_listener(&self, listener: Handler<CapturedError>);
}

/// Error hooks provided by the host runtime.
pub trait HostRuntime: Send + Sync {
	/// Slot for synchronous framework-level errors.
	fn framework_errors(&self) -> &HookSlot<FrameworkErrorDetails>;

	/// Slot for asynchronous / unhandled errors.
	fn async_errors(&self) -> &HookSlot<CapturedError>;

	/// `None` on platforms without out-of-main-thread execution.
	fn background_errors(&self) -> Option<&dyn BackgroundErrorRegistry>;

	/// Who owns the hooks above. Shared by every router over this host.
	fn ownership(&self) -> &OwnershipCell;
}
