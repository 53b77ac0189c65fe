// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Captured error events handed to reporters.

use std::any::type_name;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::trace::Trace;

/// Shared handle to the underlying error object.
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;

/// Where an error entered the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// Raised through the synchronous framework-error slot (a panic in a
	/// Rust process).
	FrameworkError,
	/// Raised through the asynchronous / unhandled-error slot.
	AsyncError,
	/// A background task or isolate failed.
	BackgroundError,
	/// Logged explicitly by application code.
	ManualError,
}

impl ErrorKind {
	pub const ALL: [ErrorKind; 4] = [
		ErrorKind::FrameworkError,
		ErrorKind::AsyncError,
		ErrorKind::BackgroundError,
		ErrorKind::ManualError,
	];
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::FrameworkError => write!(f, "framework"),
			Self::AsyncError => write!(f, "async"),
			Self::BackgroundError => write!(f, "background"),
			Self::ManualError => write!(f, "manual"),
		}
	}
}

/// Plain-message error used when only text is available.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MessageError(pub String);

/// Error carrying the payload of a panic.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PanicError {
	pub message: String,
	/// `file:line:column` of the panic, when known.
	pub location: Option<String>,
}

/// One captured error event.
///
/// Cloning is cheap; clones share the underlying error object.
#[derive(Debug, Clone)]
pub struct CapturedError {
	pub event_id: Uuid,
	pub timestamp: DateTime<Utc>,
	pub kind: ErrorKind,
	/// Type name of the underlying error.
	pub error_type: String,
	/// `Display` form of the underlying error.
	pub message: String,
	/// Extra message supplied by the caller, e.g. through `log_error`.
	pub context: Option<String>,
	pub trace: Option<Trace>,
	error: SharedError,
}

impl CapturedError {
	pub fn new<E>(kind: ErrorKind, error: E) -> Self
	where
		E: Error + Send + Sync + 'static,
	{
		Self::from_shared(kind, Arc::new(error)).with_error_type(type_name::<E>())
	}

	/// Wraps an already shared error. The error type is recorded as
	/// `dyn Error` unless overridden with [`with_error_type`](Self::with_error_type).
	pub fn from_shared(kind: ErrorKind, error: SharedError) -> Self {
		Self {
			event_id: Uuid::now_v7(),
			timestamp: Utc::now(),
			kind,
			error_type: "dyn Error".to_string(),
			message: error.to_string(),
			context: None,
			trace: None,
			error,
		}
	}

	pub fn from_message(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self::new(kind, MessageError(message.into()))
	}

	pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
		self.error_type = error_type.into();
		self
	}

	pub fn with_context(mut self, context: impl Into<String>) -> Self {
		self.context = Some(context.into());
		self
	}

	pub fn with_trace(mut self, trace: Trace) -> Self {
		self.trace = Some(trace);
		self
	}

	/// Re-tags the event, keeping the same underlying error object.
	pub fn with_kind(mut self, kind: ErrorKind) -> Self {
		self.kind = kind;
		self
	}

	pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
		self.error.as_ref()
	}

	pub fn shared_error(&self) -> SharedError {
		Arc::clone(&self.error)
	}

	pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
		self.error.downcast_ref::<E>()
	}

	/// Whether both events carry the very same error object.
	pub fn same_error(&self, other: &CapturedError) -> bool {
		std::ptr::addr_eq(Arc::as_ptr(&self.error), Arc::as_ptr(&other.error))
	}
}

/// Payload of the synchronous framework-error slot.
#[derive(Debug, Clone)]
pub struct FrameworkErrorDetails {
	pub error: CapturedError,
	/// Component that raised the error, e.g. the thread name for a panic.
	pub library: Option<String>,
	/// `file:line:column` where the error was raised.
	pub location: Option<String>,
	/// Errors the framework considers expected noise.
	pub silent: bool,
}

impl FrameworkErrorDetails {
	pub fn new(error: CapturedError) -> Self {
		Self {
			error: error.with_kind(ErrorKind::FrameworkError),
			library: None,
			location: None,
			silent: false,
		}
	}

	/// Builds details for a panic payload.
	pub fn from_panic(message: impl Into<String>, location: Option<String>) -> Self {
		let panic = PanicError {
			message: message.into(),
			location: location.clone(),
		};
		Self {
			location,
			..Self::new(CapturedError::new(ErrorKind::FrameworkError, panic))
		}
	}

	pub fn with_library(mut self, library: impl Into<String>) -> Self {
		self.library = Some(library.into());
		self
	}

	pub fn with_location(mut self, location: impl Into<String>) -> Self {
		self.location = Some(location.into());
		self
	}

	pub fn silent(mut self, silent: bool) -> Self {
		self.silent = silent;
		self
	}
}
