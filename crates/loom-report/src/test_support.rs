// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Recording reporters shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loom_report_core::{CapturedError, ErrorKind, FrameworkErrorDetails, Reporter, ReporterError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
	pub reporter: String,
	pub kind: ErrorKind,
	pub framework: bool,
	pub message: String,
}

/// Call log shared between reporters so fan-out order can be asserted.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
	fn push(&self, call: Call) {
		self.0.lock().unwrap().push(call);
	}

	pub fn calls(&self) -> Vec<(String, ErrorKind)> {
		self
			.0
			.lock()
			.unwrap()
			.iter()
			.map(|c| (c.reporter.clone(), c.kind))
			.collect()
	}

	pub fn entries(&self) -> Vec<Call> {
		self.0.lock().unwrap().clone()
	}

	pub fn count_for(&self, reporter: &str) -> usize {
		self.0.lock().unwrap().iter().filter(|c| c.reporter == reporter).count()
	}

	pub fn framework_calls(&self) -> usize {
		self.0.lock().unwrap().iter().filter(|c| c.framework).count()
	}

	pub fn reporters(&self) -> Vec<String> {
		self.0.lock().unwrap().iter().map(|c| c.reporter.clone()).collect()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behaviour {
	Ok,
	Fail,
	Panic,
}

pub struct RecordingReporter {
	name: String,
	log: CallLog,
	record: Behaviour,
	init: Behaviour,
	inits: Arc<AtomicUsize>,
}

impl RecordingReporter {
	pub fn new(name: &str, log: &CallLog) -> Self {
		Self {
			name: name.to_string(),
			log: log.clone(),
			record: Behaviour::Ok,
			init: Behaviour::Ok,
			inits: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// `record_*` return an error after logging the call.
	pub fn failing(mut self) -> Self {
		self.record = Behaviour::Fail;
		self
	}

	/// `record_*` panic after logging the call.
	pub fn panicking(mut self) -> Self {
		self.record = Behaviour::Panic;
		self
	}

	pub fn failing_init(mut self) -> Self {
		self.init = Behaviour::Fail;
		self
	}

	pub fn panicking_init(mut self) -> Self {
		self.init = Behaviour::Panic;
		self
	}

	/// Handle to the number of `initialize` calls.
	pub fn init_counter(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.inits)
	}

	fn finish(&self) -> Result<(), ReporterError> {
		match self.record {
			Behaviour::Ok => Ok(()),
			Behaviour::Fail => Err(ReporterError::Record(format!("{} is down", self.name))),
			Behaviour::Panic => panic!("{} exploded", self.name),
		}
	}
}

#[async_trait]
impl Reporter for RecordingReporter {
	fn name(&self) -> &str {
		&self.name
	}

	async fn initialize(&self) -> Result<(), ReporterError> {
		self.inits.fetch_add(1, Ordering::SeqCst);
		match self.init {
			Behaviour::Ok => Ok(()),
			Behaviour::Fail => Err(ReporterError::Initialization("handshake refused".to_string())),
			Behaviour::Panic => panic!("{} failed to boot", self.name),
		}
	}

	fn record_error(&self, error: &CapturedError) -> Result<(), ReporterError> {
		self.log.push(Call {
			reporter: self.name.clone(),
			kind: error.kind,
			framework: false,
			message: error.message.clone(),
		});
		self.finish()
	}

	fn record_framework_error(&self, details: &FrameworkErrorDetails) -> Result<(), ReporterError> {
		self.log.push(Call {
			reporter: self.name.clone(),
			kind: details.error.kind,
			framework: true,
			message: details.error.message.clone(),
		});
		self.finish()
	}
}
