// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack traces attached to captured errors.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

use rustc_demangle::demangle;
use serde::{Deserialize, Serialize};

/// Crate prefixes that never count as application frames.
const RUNTIME_PREFIXES: &[&str] = &[
	"std::",
	"core::",
	"alloc::",
	"<std::",
	"<core::",
	"<alloc::",
	"tokio::",
	"<tokio::",
	"futures::",
	"<futures::",
	"futures_util::",
	"<futures_util::",
	"async_trait::",
	"panic_unwind::",
	"rust_begin_unwind",
	"__rust_",
	"loom_report::",
	"loom_report_core::",
];

/// A single resolved frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFrame {
	/// Demangled function path.
	pub function: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub file: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub line: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub column: Option<u32>,
	/// Whether the frame belongs to application code rather than the
	/// runtime or this crate.
	pub in_app: bool,
}

/// A parsed stack trace, innermost frame first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
	pub frames: Vec<TraceFrame>,
}

impl Trace {
	/// Captures a trace if `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE` enable it.
	///
	/// Returns an empty trace when capturing is disabled.
	pub fn capture() -> Self {
		Self::from_backtrace(&Backtrace::capture())
	}

	/// Captures a trace regardless of environment settings.
	pub fn force_capture() -> Self {
		Self::from_backtrace(&Backtrace::force_capture())
	}

	pub fn from_backtrace(backtrace: &Backtrace) -> Self {
		if backtrace.status() != BacktraceStatus::Captured {
			return Self::default();
		}
		Self::parse(&backtrace.to_string())
	}

	/// Parses the textual form produced by `std::backtrace::Backtrace`.
	///
	/// Frame lines look like `  3: path::to::function`; a following
	/// `at file:line:col` line is attached to the frame before it.
	pub fn parse(text: &str) -> Self {
		let mut frames: Vec<TraceFrame> = Vec::new();

		for line in text.lines() {
			let line = line.trim();
			if line.is_empty() {
				continue;
			}

			if let Some(location) = line.strip_prefix("at ") {
				if let Some(frame) = frames.last_mut() {
					let (file, line_no, column) = parse_location(location);
					frame.file = Some(file);
					frame.line = line_no;
					frame.column = column;
				}
				continue;
			}

			if let Some(function) = strip_frame_index(line) {
				let function = format!("{:#}", demangle(function));
				let in_app = is_in_app(&function);
				frames.push(TraceFrame {
					function,
					file: None,
					line: None,
					column: None,
					in_app,
				});
			}
		}

		Self { frames }
	}

	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Frames belonging to application code.
	pub fn in_app_frames(&self) -> impl Iterator<Item = &TraceFrame> {
		self.frames.iter().filter(|frame| frame.in_app)
	}
}

impl fmt::Display for Trace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (index, frame) in self.frames.iter().enumerate() {
			write!(f, "{index:>4}: {}", frame.function)?;
			if let Some(file) = &frame.file {
				write!(f, " ({file}")?;
				if let Some(line) = frame.line {
					write!(f, ":{line}")?;
				}
				write!(f, ")")?;
			}
			writeln!(f)?;
		}
		Ok(())
	}
}

fn strip_frame_index(line: &str) -> Option<&str> {
	let (index, rest) = line.split_once(':')?;
	if index.trim().parse::<u32>().is_err() {
		return None;
	}
	let function = rest.trim();
	(!function.is_empty()).then_some(function)
}

fn parse_location(location: &str) -> (String, Option<u32>, Option<u32>) {
	let mut parts = location.rsplitn(3, ':');
	let last = parts.next();
	let middle = parts.next();
	let first = parts.next();

	match (first, middle, last) {
		(Some(file), Some(line), Some(column)) => match (line.parse().ok(), column.parse().ok()) {
			(Some(line), Some(column)) => (file.to_string(), Some(line), Some(column)),
			_ => (location.to_string(), None, None),
		},
		(None, Some(file), Some(line)) => match line.parse().ok() {
			Some(line) => (file.to_string(), Some(line), None),
			None => (location.to_string(), None, None),
		},
		_ => (location.to_string(), None, None),
	}
}

fn is_in_app(function: &str) -> bool {
	if RUNTIME_PREFIXES.iter().any(|prefix| function.starts_with(prefix)) {
		return false;
	}
	!(function.contains("::panicking::") || function.contains("::rt::"))
}
