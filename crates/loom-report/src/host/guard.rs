// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Thread-local state consulted by the panic bridge.
//!
//! Two situations change what the bridge does with a panic:
//!
//! - a reporter call is in progress ([`BridgeSuppressed`]): the caller
//!   contains the panic itself, so the bridge stays silent;
//! - a monitored background task is being polled ([`MonitorGuard`]): the
//!   bridge defers the panic. If the unwind reaches the task supervisor,
//!   the supervisor takes it over with [`take_escaped_panic`] and reports a
//!   background error. If task code catches it, the deferred report is
//!   fired as a framework error once the poll returns.

use std::cell::{Cell, RefCell};

use loom_report_core::FrameworkErrorDetails;

/// Delivers a deferred panic to the slot it was raised for.
pub(crate) type DeferredFire = Box<dyn FnOnce(&FrameworkErrorDetails)>;

struct Deferred {
	generation: u64,
	details: FrameworkErrorDetails,
	fire: DeferredFire,
}

thread_local! {
	static SUPPRESSED: Cell<bool> = const { Cell::new(false) };
	static MONITORED: Cell<bool> = const { Cell::new(false) };
	static HOOK_DEPTH: Cell<u32> = const { Cell::new(0) };
	static GENERATION: Cell<u64> = const { Cell::new(0) };
	static DEFERRED: RefCell<Vec<Deferred>> = const { RefCell::new(Vec::new()) };
}

pub(crate) fn bridge_suppressed() -> bool {
	SUPPRESSED.with(Cell::get)
}

/// Whether the current thread is polling a monitored background task.
pub(crate) fn in_monitored_task() -> bool {
	MONITORED.with(Cell::get)
}

/// Keeps the panic bridge silent on this thread until dropped.
pub(crate) struct BridgeSuppressed(bool);

impl BridgeSuppressed {
	pub(crate) fn enter() -> Self {
		Self(SUPPRESSED.with(|s| s.replace(true)))
	}
}

impl Drop for BridgeSuppressed {
	fn drop(&mut self) {
		SUPPRESSED.with(|s| s.set(self.0));
	}
}

/// Marks the thread as polling a monitored task until dropped.
///
/// On a normal exit any panic deferred during the poll was caught by the
/// task itself and is fired. During an unwind the deferred panics are left
/// for the supervisor.
pub(crate) struct MonitorGuard(bool);

impl MonitorGuard {
	pub(crate) fn enter() -> Self {
		Self(MONITORED.with(|m| m.replace(true)))
	}
}

impl Drop for MonitorGuard {
	fn drop(&mut self) {
		MONITORED.with(|m| m.set(self.0));
		if !std::thread::panicking() {
			for deferred in DEFERRED.with(RefCell::take) {
				(deferred.fire)(&deferred.details);
			}
		}
	}
}

/// One run of the chained panic hooks.
///
/// Every bridge in the chain sees the same panic; only the outermost one
/// opens a new generation, so deferred reports can be grouped by panic.
pub(crate) struct HookScope;

impl HookScope {
	pub(crate) fn enter() -> Self {
		let depth = HOOK_DEPTH.with(|d| d.replace(d.get() + 1));
		if depth == 0 {
			GENERATION.with(|g| g.set(g.get() + 1));
		}
		Self
	}
}

impl Drop for HookScope {
	fn drop(&mut self) {
		HOOK_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
	}
}

/// Holds back a panic raised inside a monitored task.
pub(crate) fn defer_panic(details: FrameworkErrorDetails, fire: DeferredFire) {
	let generation = GENERATION.with(Cell::get);
	DEFERRED.with(|d| {
		d.borrow_mut().push(Deferred {
			generation,
			details,
			fire,
		});
	});
}

/// Claims the panic that just unwound out of a monitored task.
///
/// Returns its details, captured by the bridge, if a bridge saw it. Earlier
/// panics from the same poll were caught by task code and are fired now.
pub(crate) fn take_escaped_panic() -> Option<FrameworkErrorDetails> {
	let deferred = DEFERRED.with(RefCell::take);
	let last = deferred.iter().map(|d| d.generation).max()?;

	let mut escaped = None;
	for entry in deferred {
		if entry.generation < last {
			(entry.fire)(&entry.details);
		} else if escaped.is_none() {
			escaped = Some(entry.details);
		}
	}
	escaped
}
