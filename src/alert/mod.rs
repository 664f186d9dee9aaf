// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Alert handling: local cue, counting, and fire-and-forget reporting

mod endpoint;
mod tone;

pub use endpoint::*;
pub use tone::*;

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AlertConfig;
use crate::core::{AlertEvent, Clock, EventBus, EventPayload, SessionState};
use crate::notify::{Notification, NotificationSink, Severity};

/// Text of the visual alert
pub const ALERT_MESSAGE: &str = "Drowsiness detected! Please stay alert.";

/// What happened for one alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertOutcome {
    pub event: AlertEvent,
    /// A remote submission was started
    pub submitted: bool,
}

/// Reacts to detected drowsiness
pub struct AlertReporter {
    state: Arc<Mutex<SessionState>>,
    clock: Arc<dyn Clock>,
    cue: Arc<dyn AudioCue>,
    tone: Tone,
    sound_enabled: bool,
    notifier: Arc<dyn NotificationSink>,
    visual_duration: Duration,
    endpoint: Arc<dyn AlertEndpoint>,
    event_bus: Arc<EventBus>,
}

impl AlertReporter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &AlertConfig,
        state: Arc<Mutex<SessionState>>,
        clock: Arc<dyn Clock>,
        cue: Arc<dyn AudioCue>,
        notifier: Arc<dyn NotificationSink>,
        endpoint: Arc<dyn AlertEndpoint>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            state,
            clock,
            cue,
            tone: Tone::from_config(config),
            sound_enabled: config.sound_enabled,
            notifier,
            visual_duration: Duration::from_millis(config.visual_duration_ms),
            endpoint,
            event_bus,
        }
    }

    /// Cue locally, count the alert, and report it if a session is running.
    ///
    /// Alerts while idle are still counted and cued but never reported.
    pub fn on_drowsiness_detected(&self) -> AlertOutcome {
        if self.sound_enabled {
            if let Err(e) = self.cue.play(&self.tone) {
                warn!("Could not play alert sound: {}", e);
            }
        }

        self.notifier.notify(Notification::new(
            ALERT_MESSAGE,
            Severity::Warning,
            self.visual_duration,
        ));

        // count and phase read under one lock
        let (count, active) = {
            let mut state = self.state.lock();
            (state.record_alert(), state.is_active())
        };

        let event = AlertEvent::new(self.clock.utc_now(), count);
        info!(
            "Drowsiness alert #{} logged at: {}",
            count,
            AlertReport::from(&event).timestamp
        );
        self.event_bus.publish(EventPayload::Alert(event));

        let submitted = active && self.submit(event);
        AlertOutcome { event, submitted }
    }

    /// Detach one submission. Returns false if there is no runtime to run it on.
    fn submit(&self, event: AlertEvent) -> bool {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("Error logging alert #{}: no async runtime", event.sequence_number);
                return false;
            }
        };

        let endpoint = self.endpoint.clone();
        let event_bus = self.event_bus.clone();
        let report = AlertReport::from(&event);

        handle.spawn(async move {
            let sequence_number = event.sequence_number;
            match endpoint.submit(&report).await {
                Ok(ack) => {
                    if ack.is_rejected() {
                        warn!("Endpoint did not record alert #{}: {:?}", sequence_number, ack);
                    } else {
                        debug!("Alert #{} logged successfully: {:?}", sequence_number, ack);
                    }
                    event_bus.publish(EventPayload::ReportDelivered { sequence_number });
                }
                Err(e) => {
                    warn!("Error logging alert #{}: {}", sequence_number, e);
                    event_bus.publish(EventPayload::ReportFailed {
                        sequence_number,
                        reason: e.to_string(),
                    });
                }
            }
        });
        true
    }
}
