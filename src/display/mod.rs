// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Live session stats: projection, formatting and display sinks

mod board;

pub use board::*;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

use crate::core::{Clock, EventBus, EventPayload, SessionState};

/// Values pushed to the display on every active tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProjection {
    pub elapsed_seconds: u64,
    pub alert_count: u64,
    /// Local 24-hour `HH:MM`
    pub wall_clock: String,
}

impl DisplayProjection {
    /// Elapsed time as `HH:MM:SS`
    pub fn duration_text(&self) -> String {
        format_duration(self.elapsed_seconds)
    }
}

/// Named output slots on the status display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Duration,
    AlertCount,
    CurrentTime,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Duration, Slot::AlertCount, Slot::CurrentTime];

    /// Element id used by the hosting page
    pub fn id(&self) -> &'static str {
        match self {
            Slot::Duration => "sessionDuration",
            Slot::AlertCount => "alertCount",
            Slot::CurrentTime => "currentTime",
        }
    }
}

/// Receives each projection. Implementations skip slots they do not have.
pub trait DisplaySink: Send + Sync {
    fn show(&self, projection: &DisplayProjection);
}

/// `HH:MM:SS`, zero padded, hours unbounded
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Inverse of [`format_duration`]
pub fn parse_duration(text: &str) -> Option<u64> {
    let mut parts = text.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let secs: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || secs >= 60 {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + secs)
}

/// Local 24-hour `HH:MM`
pub fn format_wall_clock(time: &DateTime<Local>) -> String {
    time.format("%H:%M").to_string()
}

/// Derives the display projection from the session state on each tick
pub struct StatsProjector {
    state: Arc<Mutex<SessionState>>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn DisplaySink>,
    event_bus: Arc<EventBus>,
}

impl StatsProjector {
    pub fn new(
        state: Arc<Mutex<SessionState>>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn DisplaySink>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            state,
            clock,
            sink,
            event_bus,
        }
    }

    /// Current projection, `None` while idle
    pub fn project(&self) -> Option<DisplayProjection> {
        let (elapsed, alert_count) = {
            let state = self.state.lock();
            (state.elapsed_seconds(self.clock.now())?, state.alert_count())
        };

        Some(DisplayProjection {
            elapsed_seconds: elapsed,
            alert_count,
            wall_clock: format_wall_clock(&self.clock.local_now()),
        })
    }

    /// One refresh. Idle ticks leave the display untouched.
    pub fn tick(&self) -> Option<DisplayProjection> {
        let projection = self.project()?;
        trace!(
            "Tick: {} elapsed, {} alerts",
            projection.duration_text(),
            projection.alert_count
        );
        self.sink.show(&projection);
        self.event_bus.publish(EventPayload::Projection(projection.clone()));
        Some(projection)
    }
}
