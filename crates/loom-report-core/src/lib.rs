// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom error-reporting router.
//!
//! This crate holds the plain data and pure policy shared by the router
//! (`loom-report`) and reporter backends:
//!
//! - [`ReportingConfig`]: which reporters are active and who owns the
//!   platform error hooks
//! - [`ReportingSettings`]: the same policy loaded from TOML or
//!   `LOOM_REPORT_*` environment variables
//! - [`should_report`] / [`evaluate`]: environment gating over build mode,
//!   platform and local-backend mode
//! - [`Reporter`]: the capability every backend implements
//! - [`CapturedError`] / [`FrameworkErrorDetails`]: the events handed to
//!   reporters

pub mod config;
pub mod environment;
pub mod error;
pub mod event;
pub mod gate;
pub mod reporter;
pub mod settings;
pub mod trace;

pub use config::{ReportingConfig, ReportingConfigBuilder};
pub use environment::{EnvironmentProbe, HostEnvironment, StaticEnvironment, LOCAL_BACKEND_ENV};
pub use error::{ConfigError, ReporterError, Result};
pub use event::{CapturedError, ErrorKind, FrameworkErrorDetails, MessageError, PanicError, SharedError};
pub use gate::{evaluate, should_report, EnvironmentSnapshot, GateConfig, GateDecision, SuppressReason};
pub use reporter::{NoOpReporter, Reporter, ReporterRole, SharedReporter};
pub use settings::ReportingSettings;
pub use trace::{Trace, TraceFrame};
