// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration, hook installation and the manual-report façade.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use futures::FutureExt;
use loom_report_core::{
	CapturedError, ConfigError, EnvironmentProbe, ErrorKind, FrameworkErrorDetails, GateDecision,
	ReporterRole, ReportingConfig, SharedReporter, SuppressReason, Trace,
};
use tracing::{debug, info, warn};

use crate::builtin::TracingReporter;
use crate::dispatch::{DispatchSummary, Dispatcher};
use crate::error::Result;
use crate::host::{panic_message, BridgeSuppressed, HostRuntime};
use crate::ownership::HandlerOwnership;

/// A reporter that failed to initialize. Installation continued without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitWarning {
	pub role: ReporterRole,
	pub reporter: String,
	pub message: String,
}

impl fmt::Display for InitWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} reporter `{}` failed to initialize: {}",
			self.role, self.reporter, self.message
		)
	}
}

/// Outcome of [`ErrorRouter::initialize_error_handling`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
	pub ownership: HandlerOwnership,
	/// Hooks were already installed by an earlier call; nothing was done.
	pub already_installed: bool,
	/// Reporters whose `initialize` succeeded, in dispatch order.
	pub initialized: Vec<ReporterRole>,
	/// Reporters not initialized because their gates were closed.
	pub skipped: Vec<(ReporterRole, SuppressReason)>,
	/// Non-fatal initialization failures.
	pub warnings: Vec<InitWarning>,
	/// Whether a background-task error listener was registered.
	pub background_listener: bool,
}

impl InitReport {
	fn new(ownership: HandlerOwnership) -> Self {
		Self {
			ownership,
			already_installed: false,
			initialized: Vec::new(),
			skipped: Vec::new(),
			warnings: Vec::new(),
			background_listener: false,
		}
	}

	fn already_installed(ownership: HandlerOwnership) -> Self {
		Self {
			already_installed: true,
			..Self::new(ownership)
		}
	}

	pub fn has_warnings(&self) -> bool {
		!self.warnings.is_empty()
	}
}

/// Routes a host's error signals to the configured reporters.
///
/// Hook ownership is recorded on the host, so at most one set of hooks is
/// installed per host however many routers share it. Later
/// [`initialize_error_handling`](Self::initialize_error_handling) calls, from
/// this router or another, are no-ops, and [`configure`](Self::configure)
/// after initialization does not touch the installed hooks.
pub struct ErrorRouter {
	host: Arc<dyn HostRuntime>,
	environment: Arc<dyn EnvironmentProbe>,
	default_builtin: SharedReporter,
	pending: Mutex<Option<ReportingConfig>>,
	facade: RwLock<Option<Arc<Dispatcher>>>,
}

impl ErrorRouter {
	pub fn new(host: Arc<dyn HostRuntime>, environment: Arc<dyn EnvironmentProbe>) -> Self {
		Self {
			host,
			environment,
			default_builtin: Arc::new(TracingReporter::new()),
			pending: Mutex::new(None),
			facade: RwLock::new(None),
		}
	}

	/// Replaces the built-in backend used when a config does not name one.
	pub fn with_default_builtin(mut self, reporter: SharedReporter) -> Self {
		self.default_builtin = reporter;
		self
	}

	pub fn host(&self) -> &Arc<dyn HostRuntime> {
		&self.host
	}

	/// Ownership of the host's hooks, whichever router claimed them.
	pub fn ownership(&self) -> HandlerOwnership {
		self.host.ownership().get()
	}

	/// Stores the config used by the next initialization. Last write wins.
	pub fn configure(&self, config: ReportingConfig) {
		let ownership = self.ownership();
		if ownership.is_owned() {
			warn!(
				ownership = %ownership,
				"Reporting reconfigured after initialization; installed hooks are unchanged"
			);
		}
		*self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(config);
	}

	/// The pending config, if any.
	pub fn config(&self) -> Option<ReportingConfig> {
		self
			.pending
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Forgets the pending config.
	pub fn clear_config(&self) {
		self.pending.lock().unwrap_or_else(PoisonError::into_inner).take();
	}

	/// Whether `log_error` currently reaches any reporter.
	pub fn is_initialized(&self) -> bool {
		self.facade().is_some()
	}

	/// Installs or chains the error hooks and initializes the reporters.
	///
	/// `config` overrides the pending config from [`configure`](Self::configure).
	/// Configuration mistakes fail loudly; reporter failures are returned as
	/// [`InitReport::warnings`]. Once the hooks are owned, further calls
	/// return a report with `already_installed` set and change nothing.
	pub async fn initialize_error_handling(
		&self,
		config: Option<ReportingConfig>,
	) -> Result<InitReport> {
		let config = match config {
			Some(config) => config,
			None => self.config().ok_or(ConfigError::NotConfigured)?,
		};
		config.validate()?;

		let target = if config.hooks_owned_externally {
			HandlerOwnership::OwnedExternally
		} else {
			HandlerOwnership::OwnedByRouter
		};

		if let Err(current) = self.host.ownership().claim(target) {
			debug!(ownership = %current, "Error handling already initialized; skipping");
			return Ok(InitReport::already_installed(current));
		}

		let dispatcher = Arc::new(Dispatcher::from_config(
			&config,
			Arc::clone(&self.default_builtin),
			Arc::clone(&self.environment),
		));
		let mut report = InitReport::new(target);

		match target {
			HandlerOwnership::OwnedExternally => self.chain_external(&dispatcher),
			_ => self.install_hooks(&dispatcher),
		}
		report.background_listener = self.register_background_listener(&dispatcher, target);
		*self.facade.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&dispatcher));

		self.initialize_reporters(&dispatcher, &mut report).await;

		info!(
			ownership = %target,
			reporters = dispatcher.routes().len(),
			initialized = report.initialized.len(),
			warnings = report.warnings.len(),
			"Error handling initialized"
		);
		Ok(report)
	}

	/// Reports an error from application code.
	///
	/// Takes the same dispatch path, gates and ordering as automatically
	/// captured errors.
	pub fn log_error<E>(&self, error: E, message: Option<&str>, trace: Option<Trace>) -> DispatchSummary
	where
		E: Error + Send + Sync + 'static,
	{
		let mut captured = CapturedError::new(ErrorKind::ManualError, error);
		if let Some(message) = message {
			captured = captured.with_context(message);
		}
		if let Some(trace) = trace {
			captured = captured.with_trace(trace);
		}
		self.log_captured(captured)
	}

	/// Reports an already captured error as a manual error.
	pub fn log_captured(&self, error: CapturedError) -> DispatchSummary {
		let error = error.with_kind(ErrorKind::ManualError);
		match self.facade() {
			Some(dispatcher) => dispatcher.dispatch_error(&error),
			None => {
				debug!(error = %error.message, "Error logged before initialization; dropped");
				DispatchSummary::default()
			}
		}
	}

	pub fn log_message(&self, message: impl Into<String>) -> DispatchSummary {
		self.log_captured(CapturedError::from_message(ErrorKind::ManualError, message))
	}

	fn facade(&self) -> Option<Arc<Dispatcher>> {
		self
			.facade
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	fn install_hooks(&self, dispatcher: &Arc<Dispatcher>) {
		let framework = self.host.framework_errors();
		let previous_framework = framework.primary();
		let chained_framework = previous_framework.is_some();
		let fanout = Arc::clone(dispatcher);
		framework.set(Arc::new(move |details: &FrameworkErrorDetails| {
			fanout.dispatch_framework(details);
			if let Some(previous) = &previous_framework {
				previous(details);
			}
		}));

		let async_errors = self.host.async_errors();
		let previous_async = async_errors.primary();
		let chained_async = previous_async.is_some();
		let fanout = Arc::clone(dispatcher);
		async_errors.set(Arc::new(move |error: &CapturedError| {
			fanout.dispatch_error(&retag(error, ErrorKind::AsyncError));
			if let Some(previous) = &previous_async {
				previous(error);
			}
		}));

		info!(
			kept_framework_handler = chained_framework,
			kept_async_handler = chained_async,
			"Platform error hooks installed"
		);
	}

	fn chain_external(&self, dispatcher: &Dispatcher) {
		let builtin = dispatcher.only(ReporterRole::Builtin);
		if builtin.is_empty() {
			info!("Platform error hooks owned externally; nothing to chain");
			return;
		}

		let builtin = Arc::new(builtin);
		let fanout = Arc::clone(&builtin);
		self
			.host
			.framework_errors()
			.chain(Arc::new(move |details: &FrameworkErrorDetails| {
				fanout.dispatch_framework(details);
			}));
		let fanout = builtin;
		self
			.host
			.async_errors()
			.chain(Arc::new(move |error: &CapturedError| {
				fanout.dispatch_error(&retag(error, ErrorKind::AsyncError));
			}));

		info!("Built-in reporter chained onto externally owned error hooks");
	}

	fn register_background_listener(&self, dispatcher: &Dispatcher, ownership: HandlerOwnership) -> bool {
		let Some(registry) = self.host.background_errors() else {
			debug!("Background errors not supported by host; listener skipped");
			return false;
		};

		let fanout = match ownership {
			HandlerOwnership::OwnedExternally => dispatcher.only(ReporterRole::Builtin),
			_ => dispatcher.clone(),
		};
		if fanout.is_empty() {
			return false;
		}

		let fanout = Arc::new(fanout);
		registry.add_error_listener(Arc::new(move |error: &CapturedError| {
			fanout.dispatch_error(&retag(error, ErrorKind::BackgroundError));
		}));
		true
	}

	async fn initialize_reporters(&self, dispatcher: &Dispatcher, report: &mut InitReport) {
		for route in dispatcher.routes() {
			let name = route.reporter().name().to_string();

			if let GateDecision::Suppressed(reason) = dispatcher.decide(route) {
				debug!(reporter = %name, reason = %reason, "Reporter gated out; not initialized");
				report.skipped.push((route.role(), reason));
				continue;
			}

			let mut init = route.reporter().initialize();
			let quiet = futures::future::poll_fn(move |cx| {
				let _quiet = BridgeSuppressed::enter();
				init.as_mut().poll(cx)
			});
			let outcome = AssertUnwindSafe(quiet).catch_unwind().await;

			let message = match outcome {
				Ok(Ok(())) => {
					debug!(reporter = %name, "Reporter initialized");
					report.initialized.push(route.role());
					continue;
				}
				Ok(Err(e)) => e.to_string(),
				Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
			};

			warn!(reporter = %name, error = %message, "Reporter failed to initialize");
			report.warnings.push(InitWarning {
				role: route.role(),
				reporter: name,
				message,
			});
		}
	}
}

impl fmt::Debug for ErrorRouter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ErrorRouter")
			.field("ownership", &self.ownership())
			.field("config", &self.config())
			.field("initialized", &self.is_initialized())
			.finish_non_exhaustive()
	}
}

fn retag(error: &CapturedError, kind: ErrorKind) -> Cow<'_, CapturedError> {
	if error.kind == kind {
		Cow::Borrowed(error)
	} else {
		Cow::Owned(error.clone().with_kind(kind))
	}
}
