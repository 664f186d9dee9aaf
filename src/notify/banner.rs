// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! In-memory banner stack with auto-expiry and manual dismissal

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::{Notification, NotificationSink};
use crate::core::Clock;

/// A posted notification
#[derive(Debug, Clone)]
pub struct Banner {
    pub id: u64,
    pub notification: Notification,
    pub posted_at: Instant,
    pub dismissed: bool,
}

impl Banner {
    pub fn expires_at(&self) -> Instant {
        self.posted_at + self.notification.duration
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        !self.dismissed && now < self.expires_at()
    }
}

struct BannerState {
    next_id: u64,
    banners: Vec<Banner>,
}

/// Keeps every banner posted; visibility is derived from the clock
pub struct BannerBoard {
    clock: Arc<dyn Clock>,
    state: Mutex<BannerState>,
}

impl BannerBoard {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(BannerState {
                next_id: 0,
                banners: Vec::new(),
            }),
        }
    }

    /// Banners not yet expired or dismissed, oldest first
    pub fn visible(&self) -> Vec<Banner> {
        let now = self.clock.now();
        self.state
            .lock()
            .banners
            .iter()
            .filter(|b| b.is_visible(now))
            .cloned()
            .collect()
    }

    /// Everything ever posted
    pub fn history(&self) -> Vec<Notification> {
        self.state
            .lock()
            .banners
            .iter()
            .map(|b| b.notification.clone())
            .collect()
    }

    /// Close a banner early. Returns false if it was unknown or already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let now = self.clock.now();
        let mut state = self.state.lock();
        match state.banners.iter_mut().find(|b| b.id == id) {
            Some(banner) if banner.is_visible(now) => {
                banner.dismissed = true;
                true
            }
            _ => false,
        }
    }

    /// Drop banners that are no longer visible
    pub fn prune(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.state.lock();
        let before = state.banners.len();
        state.banners.retain(|b| b.is_visible(now));
        before - state.banners.len()
    }
}

impl NotificationSink for BannerBoard {
    fn notify(&self, notification: Notification) {
        let posted_at = self.clock.now();
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        debug!("Banner {} [{}] {}", id, notification.severity, notification.message);
        state.banners.push(Banner {
            id,
            notification,
            posted_at,
            dismissed: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::notify::Severity;
    use chrono::Local;
    use std::time::Duration;

    fn board() -> (BannerBoard, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Local::now()));
        (BannerBoard::new(clock.clone()), clock)
    }

    #[test]
    fn test_banner_expires_after_duration() {
        let (board, clock) = board();
        board.notify(Notification::new("short", Severity::Warning, Duration::from_millis(3000)));
        board.notify(Notification::new("long", Severity::Info, Duration::from_millis(5000)));

        clock.advance(Duration::from_millis(2999));
        assert_eq!(board.visible().len(), 2);

        clock.advance(Duration::from_millis(1));
        let visible = board.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].notification.message, "long");

        assert_eq!(board.prune(), 1);
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn test_dismiss_hides_banner_once() {
        let (board, _clock) = board();
        board.notify(Notification::new("hello", Severity::Success, Duration::from_secs(5)));
        let id = board.visible()[0].id;

        assert!(board.dismiss(id));
        assert!(board.visible().is_empty());
        assert!(!board.dismiss(id));
        assert!(!board.dismiss(999));
    }
}
