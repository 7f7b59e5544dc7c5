// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Kartenwerk.

use thiserror::Error;

/// Top-level error type for all Kartenwerk operations.
#[derive(Debug, Error)]
pub enum KartenwerkError {
    // -- Form errors --
    #[error("{0}")]
    Validation(String),

    // -- Photo / camera errors --
    #[error("{0}")]
    Media(String),

    // -- Card export errors --
    #[error("card rendering failed: {0}")]
    Render(String),

    #[error("{0}")]
    Precondition(String),

    // -- Storage / plumbing --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KartenwerkError>;
