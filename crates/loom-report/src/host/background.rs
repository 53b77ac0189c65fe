// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Background task supervision for the process host.

use std::error::Error;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};

use futures::FutureExt;
use loom_report_core::{CapturedError, ErrorKind, PanicError};
use tokio::task::JoinHandle;
use tracing::debug;

use super::guard::{take_escaped_panic, MonitorGuard};
use super::panic::panic_message;
use super::{BackgroundErrorRegistry, Handler};

/// Listener registry for failures of background tasks.
///
/// Cloning yields another handle to the same listeners.
#[derive(Clone, Default)]
pub struct BackgroundTasks {
	listeners: Arc<RwLock<Vec<Handler<CapturedError>>>>,
}

impl BackgroundTasks {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn listener_count(&self) -> usize {
		self
			.listeners
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.len()
	}

	/// Notifies every listener of a background failure.
	pub fn report(&self, error: CapturedError) {
		let error = error.with_kind(ErrorKind::BackgroundError);
		let listeners = self
			.listeners
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone();

		if listeners.is_empty() {
			debug!(error = %error.message, "Background error with no listeners");
		}
		for listener in &listeners {
			listener(&error);
		}
	}

	/// Spawns `future` on the current Tokio runtime and reports it if it
	/// panics.
	///
	/// Must be called from within a Tokio runtime.
	pub fn spawn_monitored<F>(&self, name: impl Into<String>, future: F) -> JoinHandle<()>
	where
		F: Future<Output = ()> + Send + 'static,
	{
		let tasks = self.clone();
		let name = name.into();

		let mut future = Box::pin(future);
		let monitored = futures::future::poll_fn(move |cx| {
			let _guard = MonitorGuard::enter();
			future.as_mut().poll(cx)
		});

		tokio::spawn(async move {
			if let Err(payload) = AssertUnwindSafe(monitored).catch_unwind().await {
				let escaped = take_escaped_panic();
				let panic = PanicError {
					message: panic_message(payload.as_ref()),
					location: escaped.as_ref().and_then(|d| d.location.clone()),
				};
				let mut error = CapturedError::new(ErrorKind::BackgroundError, panic)
					.with_context(format!("background task `{name}` panicked"));
				if let Some(trace) = escaped.and_then(|d| d.error.trace) {
					error = error.with_trace(trace);
				}
				tasks.report(error);
			}
		})
	}

	/// Like [`spawn_monitored`](Self::spawn_monitored), additionally
	/// reporting an `Err` returned by the task.
	pub fn spawn_monitored_result<F, E>(&self, name: impl Into<String>, future: F) -> JoinHandle<()>
	where
		F: Future<Output = Result<(), E>> + Send + 'static,
		E: Error + Send + Sync + 'static,
	{
		let tasks = self.clone();
		let name = name.into();

		self.spawn_monitored(name.clone(), async move {
			if let Err(e) = future.await {
				tasks.report(
					CapturedError::new(ErrorKind::BackgroundError, e)
						.with_context(format!("background task `{name}` failed")),
				);
			}
		})
	}
}

impl BackgroundErrorRegistry for BackgroundTasks {
	fn add_error_listener(&self, listener: Handler<CapturedError>) {
		self
			.listeners
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.push(listener);
	}
}

impl std::fmt::Debug for BackgroundTasks {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BackgroundTasks")
			.field("listeners", &self.listener_count())
			.finish()
	}
}
