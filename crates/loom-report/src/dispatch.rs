// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fan-out of captured errors to every gated-in reporter.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use loom_report_core::{
	evaluate, CapturedError, EnvironmentProbe, ErrorKind, FrameworkErrorDetails, GateConfig,
	GateDecision, ReporterRole, ReportingConfig, SharedReporter, SuppressReason,
};
use tracing::debug;

use crate::host::{panic_message, BridgeSuppressed};

/// An error event as it reaches the dispatcher.
#[derive(Debug, Clone, Copy)]
pub enum ErrorEvent<'a> {
	Framework(&'a FrameworkErrorDetails),
	Error(&'a CapturedError),
}

impl ErrorEvent<'_> {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Framework(_) => ErrorKind::FrameworkError,
			Self::Error(error) => error.kind,
		}
	}

	pub fn error(&self) -> &CapturedError {
		match self {
			Self::Framework(details) => &details.error,
			Self::Error(error) => error,
		}
	}
}

/// One reporter together with its gates.
#[derive(Clone)]
pub struct Route {
	role: ReporterRole,
	reporter: SharedReporter,
	gates: GateConfig,
}

impl Route {
	pub fn new(role: ReporterRole, reporter: SharedReporter, gates: GateConfig) -> Self {
		Self {
			role,
			reporter,
			gates,
		}
	}

	pub fn role(&self) -> ReporterRole {
		self.role
	}

	pub fn reporter(&self) -> &SharedReporter {
		&self.reporter
	}

	pub fn gates(&self) -> GateConfig {
		self.gates
	}
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("role", &self.role)
			.field("reporter", &self.reporter.name())
			.field("gates", &self.gates)
			.finish()
	}
}

/// What happened to one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
	/// Reporters that recorded the event, in call order.
	pub delivered: Vec<ReporterRole>,
	/// Reporters gated out, with the reason.
	pub suppressed: Vec<(ReporterRole, SuppressReason)>,
	/// Reporters that returned an error or panicked.
	pub failed: Vec<ReporterRole>,
}

impl DispatchSummary {
	/// Reporters that were called, whether or not they succeeded.
	pub fn attempted(&self) -> usize {
		self.delivered.len() + self.failed.len()
	}

	pub fn was_delivered(&self, role: ReporterRole) -> bool {
		self.delivered.contains(&role)
	}
}

/// Calls every gated-in reporter exactly once per event, custom first.
///
/// A failure of one reporter never prevents the next from being called and
/// never propagates to the caller.
#[derive(Clone)]
pub struct Dispatcher {
	routes: Vec<Route>,
	environment: Arc<dyn EnvironmentProbe>,
}

impl Dispatcher {
	pub fn new(environment: Arc<dyn EnvironmentProbe>) -> Self {
		Self {
			routes: Vec::new(),
			environment,
		}
	}

	/// Routes for every reporter `config` enables.
	pub fn from_config(
		config: &ReportingConfig,
		default_builtin: SharedReporter,
		environment: Arc<dyn EnvironmentProbe>,
	) -> Self {
		let mut dispatcher = Self::new(environment);

		if let Some(custom) = &config.custom_reporter {
			dispatcher = dispatcher.with_route(Route::new(
				ReporterRole::Custom,
				Arc::clone(custom),
				config.gates_for(ReporterRole::Custom),
			));
		}
		if config.use_builtin_reporter {
			let builtin = config.builtin_reporter.clone().unwrap_or(default_builtin);
			dispatcher = dispatcher.with_route(Route::new(
				ReporterRole::Builtin,
				builtin,
				config.gates_for(ReporterRole::Builtin),
			));
		}

		dispatcher
	}

	/// Adds a route, replacing any route with the same role and keeping
	/// dispatch order.
	pub fn with_route(mut self, route: Route) -> Self {
		self.routes.retain(|existing| existing.role != route.role);
		self.routes.push(route);
		self.routes.sort_by_key(|route| dispatch_rank(route.role));
		self
	}

	/// A dispatcher restricted to `role`.
	pub fn only(&self, role: ReporterRole) -> Self {
		Self {
			routes: self
				.routes
				.iter()
				.filter(|route| route.role == role)
				.cloned()
				.collect(),
			environment: Arc::clone(&self.environment),
		}
	}

	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Gate decision for one route from a fresh environment snapshot.
	pub fn decide(&self, route: &Route) -> GateDecision {
		evaluate(&route.gates, &self.environment.snapshot())
	}

	pub fn dispatch_error(&self, error: &CapturedError) -> DispatchSummary {
		self.dispatch(ErrorEvent::Error(error))
	}

	pub fn dispatch_framework(&self, details: &FrameworkErrorDetails) -> DispatchSummary {
		self.dispatch(ErrorEvent::Framework(details))
	}

	pub fn dispatch(&self, event: ErrorEvent<'_>) -> DispatchSummary {
		let mut summary = DispatchSummary::default();
		let kind = event.kind();

		for route in &self.routes {
			let name = route.reporter.name();

			if let GateDecision::Suppressed(reason) = self.decide(route) {
				debug!(reporter = %name, kind = %kind, reason = %reason, "Error report suppressed");
				summary.suppressed.push((route.role, reason));
				continue;
			}

			let outcome = catch_unwind(AssertUnwindSafe(|| {
				let _quiet = BridgeSuppressed::enter();
				match event {
					ErrorEvent::Framework(details) => route.reporter.record_framework_error(details),
					ErrorEvent::Error(error) => route.reporter.record_error(error),
				}
			}));

			match outcome {
				Ok(Ok(())) => summary.delivered.push(route.role),
				Ok(Err(e)) => {
					debug!(reporter = %name, kind = %kind, error = %e, "Reporter failed to record error");
					summary.failed.push(route.role);
				}
				Err(payload) => {
					debug!(
						reporter = %name,
						kind = %kind,
						panic = %panic_message(payload.as_ref()),
						"Reporter panicked while recording error"
					);
					summary.failed.push(route.role);
				}
			}
		}

		summary
	}
}

impl fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dispatcher")
			.field("routes", &self.routes)
			.finish_non_exhaustive()
	}
}

fn dispatch_rank(role: ReporterRole) -> usize {
	ReporterRole::DISPATCH_ORDER
		.iter()
		.position(|r| *r == role)
		.unwrap_or(usize::MAX)
}


#[cfg(test)]
mod proptests {
	use super::*;
	use crate::test_support::{CallLog, RecordingReporter};
	use loom_report_core::{should_report, EnvironmentSnapshot, NoOpReporter};
	use proptest::prelude::*;

	fn gates() -> impl Strategy<Value = GateConfig> {
		(any::<bool>(), any::<bool>()).prop_map(|(debug, web)| GateConfig::new(debug, web))
	}

	fn snapshot() -> impl Strategy<Value = EnvironmentSnapshot> {
		(any::<bool>(), any::<bool>(), any::<bool>())
			.prop_map(|(debug, web, local)| EnvironmentSnapshot::new(debug, web, local))
	}

	proptest! {
		#[test]
		fn delivers_exactly_to_gated_in_reporters_in_order(
			custom_gates in gates(),
			builtin_gates in gates(),
			env in snapshot(),
			kind_index in 0usize..4,
		) {
			let log = CallLog::default();
			let config = ReportingConfig::builder()
				.custom_reporter(RecordingReporter::new("custom", &log))
				.use_builtin_reporter(true)
				.builtin_reporter(Arc::new(RecordingReporter::new("builtin", &log)))
				.custom_gates(custom_gates)
				.builtin_gates(builtin_gates)
				.build();
			let dispatcher = Dispatcher::from_config(&config, Arc::new(NoOpReporter), Arc::new(env));
			let error = CapturedError::from_message(ErrorKind::ALL[kind_index], "x");

			let summary = dispatcher.dispatch_error(&error);

			let mut expected = Vec::new();
			if should_report(&custom_gates, &env) {
				expected.push("custom".to_string());
			}
			if should_report(&builtin_gates, &env) {
				expected.push("builtin".to_string());
			}
			prop_assert_eq!(log.reporters(), expected);
			prop_assert_eq!(summary.delivered.len() + summary.suppressed.len(), 2);
		}
	}
}
