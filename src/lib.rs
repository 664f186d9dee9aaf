// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! DrowseWatch - drowsiness monitoring session supervisor
//!
//! Starts and stops a monitored session behind a camera permission check,
//! counts drowsiness alerts, reports them to the hosting site, and refreshes
//! a live status display once per second.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                         Monitor                           │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────┐   ┌────────────────┐   │
//! │  │ Permission │ → │ SessionState │ ← │ AlertReporter  │ → endpoint
//! │  │ Gate       │   │              │   │ (cue + report) │   │
//! │  └────────────┘   └──────────────┘   └────────────────┘   │
//! │                          ↓                                │
//! │  ┌────────────┐   ┌──────────────┐                        │
//! │  │  Ticker    │ → │ StatsProject │ → display              │
//! │  └────────────┘   └──────────────┘                        │
//! │                          ↓                                │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │                     Event Bus                       │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod alert;
pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod notify;
pub mod permission;
pub mod security;

// Re-exports for convenience
pub use alert::{AlertReporter, HttpAlertEndpoint, Tone};
pub use config::Config;
pub use self::core::{EventBus, Monitor, SessionState};
pub use display::{format_duration, DisplayProjection, StatsProjector};
pub use error::{AudioError, MonitorError, ReportError};
pub use notify::{Notification, NotificationSink, Severity};
pub use permission::{Permission, PermissionGate};

/// DrowseWatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// DrowseWatch name
pub const NAME: &str = "DrowseWatch";
