// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loom_report::{
	CapturedError, ErrorKind, FrameworkErrorDetails, PanicError, Reporter, ReporterError,
};

/// What a [`Collector`] saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
	pub reporter: String,
	pub kind: ErrorKind,
	pub message: String,
	pub context: Option<String>,
	pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Inbox(Arc<Mutex<Vec<Seen>>>);

impl Inbox {
	pub fn seen(&self) -> Vec<Seen> {
		self.0.lock().unwrap().clone()
	}

	pub fn reporters(&self) -> Vec<String> {
		self.seen().into_iter().map(|s| s.reporter).collect()
	}

	pub fn kinds(&self) -> Vec<ErrorKind> {
		self.seen().into_iter().map(|s| s.kind).collect()
	}

	pub fn seen_by(&self, reporter: &str) -> Vec<(ErrorKind, String)> {
		self.seen()
			.into_iter()
			.filter(|s| s.reporter == reporter)
			.map(|s| (s.kind, s.message))
			.collect()
	}
}

/// Reporter that appends every event to a shared [`Inbox`].
pub struct Collector {
	name: String,
	inbox: Inbox,
	panic_on: Option<ErrorKind>,
}

impl Collector {
	pub fn new(name: &str, inbox: &Inbox) -> Self {
		Self {
			name: name.to_string(),
			inbox: inbox.clone(),
			panic_on: None,
		}
	}

	/// Panics after recording any error of `kind`.
	pub fn panicking_on(mut self, kind: ErrorKind) -> Self {
		self.panic_on = Some(kind);
		self
	}

	fn push(&self, error: &CapturedError, location: Option<String>) {
		self.inbox.0.lock().unwrap().push(Seen {
			reporter: self.name.clone(),
			kind: error.kind,
			message: error.message.clone(),
			context: error.context.clone(),
			location,
		});
		if self.panic_on == Some(error.kind) {
			panic!("{} reporter bug", self.name);
		}
	}
}

#[async_trait]
impl Reporter for Collector {
	fn name(&self) -> &str {
		&self.name
	}

	async fn initialize(&self) -> Result<(), ReporterError> {
		Ok(())
	}

	fn record_error(&self, error: &CapturedError) -> Result<(), ReporterError> {
		let location = error.downcast_ref::<PanicError>().and_then(|p| p.location.clone());
		self.push(error, location);
		Ok(())
	}

	fn record_framework_error(&self, details: &FrameworkErrorDetails) -> Result<(), ReporterError> {
		self.push(&details.error, details.location.clone());
		Ok(())
	}
}
