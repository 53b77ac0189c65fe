// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bridges the std panic hook into a host's framework-error slot.

use std::any::Any;
use std::panic::PanicHookInfo;
use std::sync::Arc;

use loom_report_core::{FrameworkErrorDetails, Trace};

use super::guard::{bridge_suppressed, defer_panic, in_monitored_task, HookScope};
use super::HostRuntime;

/// Chains onto the current std panic hook so every panic is delivered to
/// `host`'s framework-error slot before the previous hook runs.
///
/// Panics raised by a reporter while it is being called are skipped; the
/// caller contains them. A panic that unwinds out of a task spawned with
/// [`BackgroundTasks::spawn_monitored`](super::BackgroundTasks::spawn_monitored)
/// is left to the task supervisor, while one the task catches itself is
/// reported as a framework error when the task yields.
///
/// Handlers reached from the slot run while the thread is panicking; a
/// second panic inside them aborts the process.
pub fn install_panic_bridge<H>(host: Arc<H>)
where
	H: HostRuntime + ?Sized + 'static,
{
	let previous = std::panic::take_hook();

	std::panic::set_hook(Box::new(move |info| {
		let _scope = HookScope::enter();
		if !bridge_suppressed() {
			let details = details_from_panic(info);
			if in_monitored_task() {
				let host = Arc::clone(&host);
				defer_panic(
					details,
					Box::new(move |details: &FrameworkErrorDetails| {
						host.framework_errors().fire(details);
					}),
				);
			} else {
				host.framework_errors().fire(&details);
			}
		}
		previous(info);
	}));
}

fn details_from_panic(info: &PanicHookInfo<'_>) -> FrameworkErrorDetails {
	let location = info
		.location()
		.map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));

	let mut details = FrameworkErrorDetails::from_panic(panic_message(info.payload()), location);
	details.error = details.error.with_trace(Trace::force_capture());
	if let Some(name) = std::thread::current().name() {
		details = details.with_library(name);
	}
	details
}

/// Extracts the message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s.to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"Box<dyn Any>".to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn message_from_str_payload() {
		let payload: Box<dyn Any + Send> = Box::new("boom");
		assert_eq!(panic_message(payload.as_ref()), "boom");
	}

	#[test]
	fn message_from_string_payload() {
		let payload: Box<dyn Any + Send> = Box::new(format!("code {}", 7));
		assert_eq!(panic_message(payload.as_ref()), "code 7");
	}

	#[test]
	fn message_from_opaque_payload() {
		let payload: Box<dyn Any + Send> = Box::new(42_u8);
		assert_eq!(panic_message(payload.as_ref()), "Box<dyn Any>");
	}
}
