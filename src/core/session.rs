// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Monitoring session state

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// The two states a session can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    Active,
}

/// Session bookkeeping. `started_at` is set iff the session is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    active: bool,
    started_at: Option<Instant>,
    started_wall: Option<DateTime<Local>>,
    alert_count: u64,
}

impl SessionState {
    /// Fresh idle state
    pub fn new() -> Self {
        Self {
            active: false,
            started_at: None,
            started_wall: None,
            alert_count: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> SessionPhase {
        if self.active {
            SessionPhase::Active
        } else {
            SessionPhase::Idle
        }
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Local time the session began
    pub fn started_wall(&self) -> Option<DateTime<Local>> {
        self.started_wall
    }

    pub fn alert_count(&self) -> u64 {
        self.alert_count
    }

    /// Enter (or restart) the active state. Clears the alert counter.
    pub fn activate(&mut self, now: Instant, wall: DateTime<Local>) {
        self.active = true;
        self.started_at = Some(now);
        self.started_wall = Some(wall);
        self.alert_count = 0;
    }

    /// Return to idle. The alert counter is left as is.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.started_at = None;
        self.started_wall = None;
    }

    /// Count one alert regardless of phase and return the new total
    pub fn record_alert(&mut self) -> u64 {
        self.alert_count += 1;
        self.alert_count
    }

    /// Whole seconds since the session started, `None` while idle
    pub fn elapsed_seconds(&self, now: Instant) -> Option<u64> {
        self.started_at
            .map(|started| now.saturating_duration_since(started).as_secs())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// One detected drowsiness signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub timestamp: DateTime<Utc>,
    /// Alert count right after this alert was recorded
    pub sequence_number: u64,
}

impl AlertEvent {
    pub fn new(timestamp: DateTime<Utc>, sequence_number: u64) -> Self {
        Self {
            timestamp,
            sequence_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn check_invariant(state: &SessionState) {
        assert_eq!(state.started_at().is_some(), state.is_active());
        assert_eq!(state.started_wall().is_some(), state.is_active());
    }

    #[test]
    fn test_starts_idle() {
        let state = SessionState::new();
        assert_eq!(state.phase(), SessionPhase::Idle);
        assert_eq!(state.alert_count(), 0);
        assert!(state.started_at().is_none());
    }

    #[test]
    fn test_transitions_keep_started_at_in_sync() {
        let mut state = SessionState::new();
        let now = Instant::now();
        let wall = Local::now();

        // start, start, stop, stop, start, stop
        let script = [true, true, false, false, true, false];
        for (i, start) in script.into_iter().enumerate() {
            if start {
                state.activate(now + Duration::from_secs(i as u64), wall);
            } else {
                state.deactivate();
            }
            assert_eq!(state.is_active(), start);
            check_invariant(&state);
        }
    }

    #[test]
    fn test_activate_resets_count() {
        let mut state = SessionState::new();
        for _ in 0..7 {
            state.record_alert();
        }
        state.activate(Instant::now(), Local::now());
        assert_eq!(state.alert_count(), 0);

        state.record_alert();
        state.activate(Instant::now(), Local::now());
        assert_eq!(state.alert_count(), 0);
    }

    #[test]
    fn test_record_alert_accumulates_in_any_phase() {
        let mut state = SessionState::new();
        assert_eq!(state.record_alert(), 1);
        assert_eq!(state.record_alert(), 2);

        state.activate(Instant::now(), Local::now());
        let before = state.alert_count();
        for _ in 0..5 {
            state.record_alert();
        }
        state.deactivate();
        state.record_alert();
        assert_eq!(state.alert_count(), before + 6);
    }

    #[test]
    fn test_elapsed_seconds_floors() {
        let mut state = SessionState::new();
        let t0 = Instant::now();
        assert_eq!(state.elapsed_seconds(t0), None);

        state.activate(t0, Local::now());
        assert_eq!(state.elapsed_seconds(t0 + Duration::from_millis(1999)), Some(1));
        assert_eq!(state.elapsed_seconds(t0 + Duration::from_secs(3661)), Some(3661));
    }
}
