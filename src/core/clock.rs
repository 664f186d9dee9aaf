// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Time sources for session timing and the wall-clock display

use chrono::{DateTime, Local, Utc};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Monotonic and wall-clock time in one place so tests can steer both
pub trait Clock: Send + Sync {
    /// Monotonic instant used for elapsed-time math
    fn now(&self) -> Instant;

    /// Local wall-clock time for the `HH:MM` display
    fn local_now(&self) -> DateTime<Local>;

    /// UTC time for alert timestamps
    fn utc_now(&self) -> DateTime<Utc> {
        self.local_now().with_timezone(&Utc)
    }
}

/// Real system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    origin: Instant,
    wall_origin: DateTime<Local>,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new(wall_origin: DateTime<Local>) -> Self {
        Self {
            origin: Instant::now(),
            wall_origin,
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move both time sources forward
    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }

    fn local_now(&self) -> DateTime<Local> {
        let offset = *self.offset.lock();
        self.wall_origin + chrono::Duration::from_std(offset).unwrap_or_else(|_| chrono::Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_moves_both_sources() {
        let wall = Local.with_ymd_and_hms(2026, 3, 1, 9, 59, 30).unwrap();
        let clock = ManualClock::new(wall);
        let t0 = clock.now();

        clock.advance(Duration::from_secs(45));

        assert_eq!(clock.now() - t0, Duration::from_secs(45));
        assert_eq!(clock.local_now(), wall + chrono::Duration::seconds(45));
        assert_eq!(clock.elapsed(), Duration::from_secs(45));
    }
}
