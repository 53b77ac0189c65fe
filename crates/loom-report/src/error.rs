// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the router.

use loom_report_core::ConfigError;
use thiserror::Error;

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors surfaced by [`ErrorRouter`](crate::ErrorRouter).
///
/// Only configuration mistakes propagate; backend failures are contained
/// and reported as warnings.
#[derive(Debug, Error)]
pub enum RouterError {
	#[error(transparent)]
	Config(#[from] ConfigError),
}
