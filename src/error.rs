// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Error types for the monitoring core

use thiserror::Error;

/// Errors surfaced to callers of the session transitions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// Camera access was refused, absent or timed out
    #[error("camera permission is required for monitoring")]
    PermissionDenied,
}

/// The local audible cue could not be produced
#[derive(Debug, Error)]
pub enum AudioError {
    /// No usable audio output
    #[error("audio unavailable: {0}")]
    Unavailable(String),
}

/// A remote alert submission failed
#[derive(Debug, Error)]
pub enum ReportError {
    /// Connection, TLS or timeout failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    /// Response body was not the expected JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}
