// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Monitoring session supervisor

use anyhow::Result;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::{Clock, Event, EventBus, EventPayload, SessionState, SystemClock, Ticker, TickerHandle};
use crate::alert::{AlertEndpoint, AlertOutcome, AlertReporter, AudioCue, HttpAlertEndpoint, TerminalBell};
use crate::config::Config;
use crate::display::{ConsoleBoard, DisplayProjection, DisplaySink, StatsProjector};
use crate::error::MonitorError;
use crate::notify::{Notification, NotificationSink, Severity, TracingNotifier};
use crate::permission::{CaptureDevice, PermissionGate, SimulatedCamera, VideoNodeDevice};

/// Prompt shown when leaving with a session still running
pub const LEAVE_WARNING: &str =
    "You have an active monitoring session. Are you sure you want to leave?";

const STARTED_MESSAGE: &str = "Monitoring session started successfully!";
const STOPPED_MESSAGE: &str = "Monitoring session stopped.";
const DENIED_MESSAGE: &str = "Camera permission is required for monitoring.";

/// Owns the session state and wires the gate, reporter, projector and ticker around it
pub struct Monitor {
    config: Arc<Config>,
    state: Arc<Mutex<SessionState>>,
    clock: Arc<dyn Clock>,
    gate: PermissionGate,
    notifier: Arc<dyn NotificationSink>,
    notice_duration: Duration,
    reporter: AlertReporter,
    projector: Arc<StatsProjector>,
    event_bus: Arc<EventBus>,
    ticker: Mutex<Option<TickerHandle>>,
    page_hidden: AtomicBool,
}

impl Monitor {
    pub fn builder(config: Config) -> MonitorBuilder {
        MonitorBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ask for the camera, then begin a fresh session.
    ///
    /// On denial nothing changes and the user is told why.
    pub async fn start(&self) -> Result<(), MonitorError> {
        if !self.gate.request_camera_access().await.is_granted() {
            self.notify(DENIED_MESSAGE, Severity::Error);
            self.event_bus.publish(EventPayload::PermissionDenied);
            return Err(MonitorError::PermissionDenied);
        }

        {
            let mut state = self.state.lock();
            if state.is_active() {
                info!("Restarting active session");
            }
            state.activate(self.clock.now(), self.clock.local_now());
        }

        info!(
            "Monitoring session started at {}",
            self.clock.local_now().format("%H:%M:%S")
        );
        self.notify(STARTED_MESSAGE, Severity::Success);
        self.event_bus.publish(EventPayload::SessionStarted);
        Ok(())
    }

    /// End the session. Safe to call when already idle.
    pub fn stop(&self) {
        let was_active = {
            let mut state = self.state.lock();
            let was_active = state.is_active();
            state.deactivate();
            was_active
        };

        if was_active {
            info!("Monitoring session stopped");
        }
        self.notify(STOPPED_MESSAGE, Severity::Info);
        self.event_bus.publish(EventPayload::SessionStopped);
    }

    pub fn on_drowsiness_detected(&self) -> AlertOutcome {
        self.reporter.on_drowsiness_detected()
    }

    /// Run one stats refresh right now
    pub fn refresh(&self) -> Option<DisplayProjection> {
        self.projector.tick()
    }

    /// Begin the periodic stats refresh. Needs a tokio runtime; no-op if already running.
    pub fn start_ticker(&self) -> bool {
        if tokio::runtime::Handle::try_current().is_err() {
            warn!("Cannot start stats ticker outside an async runtime");
            return false;
        }

        let mut ticker = self.ticker.lock();
        if ticker.as_ref().map_or(false, TickerHandle::is_running) {
            return true;
        }

        let projector = self.projector.clone();
        *ticker = Some(
            Ticker::new("session-stats", self.config.ticker.interval()).spawn(move || {
                projector.tick();
            }),
        );
        true
    }

    pub fn ticker_running(&self) -> bool {
        self.ticker.lock().as_ref().map_or(false, TickerHandle::is_running)
    }

    /// Record a visibility change; becoming visible forces an immediate refresh
    pub fn set_page_hidden(&self, hidden: bool) {
        let was_hidden = self.page_hidden.swap(hidden, Ordering::SeqCst);
        if hidden {
            info!("Page hidden - monitoring continues in background");
            return;
        }

        info!("Page visible - full monitoring active");
        if was_hidden {
            let forced = self
                .ticker
                .lock()
                .as_ref()
                .filter(|t| t.is_running())
                .map(|t| t.request_tick())
                .is_some();
            if !forced {
                self.refresh();
            }
        }
    }

    pub fn page_hidden(&self) -> bool {
        self.page_hidden.load(Ordering::SeqCst)
    }

    /// Advisory prompt for a confirm-navigation hook
    pub fn leave_warning(&self) -> Option<&'static str> {
        self.is_active().then_some(LEAVE_WARNING)
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().is_active()
    }

    pub fn alert_count(&self) -> u64 {
        self.state.lock().alert_count()
    }

    /// Copy of the current session state
    pub fn snapshot(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe()
    }

    /// Cancel the ticker. In-flight reports are left to finish on their own.
    pub async fn shutdown(&self) {
        let ticker = self.ticker.lock().take();
        if let Some(ticker) = ticker {
            ticker.shutdown().await;
            info!("Stats ticker stopped");
        }
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.notifier
            .notify(Notification::new(message, severity, self.notice_duration));
    }
}

/// Assembles a [`Monitor`], filling unset collaborators from the config
pub struct MonitorBuilder {
    config: Config,
    clock: Option<Arc<dyn Clock>>,
    device: Option<Arc<dyn CaptureDevice>>,
    cue: Option<Arc<dyn AudioCue>>,
    notifier: Option<Arc<dyn NotificationSink>>,
    display: Option<Arc<dyn DisplaySink>>,
    endpoint: Option<Arc<dyn AlertEndpoint>>,
    event_bus: Option<Arc<EventBus>>,
}

impl MonitorBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            clock: None,
            device: None,
            cue: None,
            notifier: None,
            display: None,
            endpoint: None,
            event_bus: None,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn camera(mut self, device: Arc<dyn CaptureDevice>) -> Self {
        self.device = Some(device);
        self
    }

    pub fn audio_cue(mut self, cue: Arc<dyn AudioCue>) -> Self {
        self.cue = Some(cue);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn display(mut self, display: Arc<dyn DisplaySink>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn endpoint(mut self, endpoint: Arc<dyn AlertEndpoint>) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn build(self) -> Result<Monitor> {
        let config = Arc::new(self.config);
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let event_bus = self.event_bus.unwrap_or_default();
        let state = Arc::new(Mutex::new(SessionState::new()));

        let device: Arc<dyn CaptureDevice> = match self.device {
            Some(device) => device,
            None if config.demo_mode => Arc::new(SimulatedCamera::granting()),
            None => Arc::new(VideoNodeDevice::new(config.permission.device_path.clone())),
        };
        let gate = PermissionGate::new(device).with_timeout(config.permission.timeout());

        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => Arc::new(HttpAlertEndpoint::new(&config.reporting)?),
        };
        let cue = self.cue.unwrap_or_else(default_cue);
        let notifier: Arc<dyn NotificationSink> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(TracingNotifier),
        };
        let display: Arc<dyn DisplaySink> = match self.display {
            Some(display) => display,
            None => Arc::new(ConsoleBoard),
        };

        let reporter = AlertReporter::new(
            &config.alerts,
            state.clone(),
            clock.clone(),
            cue,
            notifier.clone(),
            endpoint,
            event_bus.clone(),
        );
        let projector = Arc::new(StatsProjector::new(
            state.clone(),
            clock.clone(),
            display,
            event_bus.clone(),
        ));

        Ok(Monitor {
            notice_duration: Duration::from_millis(config.notifications.default_duration_ms),
            config,
            state,
            clock,
            gate,
            notifier,
            reporter,
            projector,
            event_bus,
            ticker: Mutex::new(None),
            page_hidden: AtomicBool::new(false),
        })
    }
}

#[cfg(feature = "audio")]
fn default_cue() -> Arc<dyn AudioCue> {
    Arc::new(crate::alert::CpalCue)
}

#[cfg(not(feature = "audio"))]
fn default_cue() -> Arc<dyn AudioCue> {
    Arc::new(TerminalBell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{AlertAck, AlertReport, SilentCue};
    use crate::core::ManualClock;
    use crate::display::{MemoryBoard, Slot};
    use crate::error::ReportError;
    use crate::notify::BannerBoard;
    use async_trait::async_trait;
    use chrono::Local;

    struct NullEndpoint;

    #[async_trait]
    impl AlertEndpoint for NullEndpoint {
        async fn submit(&self, _report: &AlertReport) -> Result<AlertAck, ReportError> {
            Ok(AlertAck::default())
        }
    }

    fn monitor(camera: SimulatedCamera) -> (Monitor, Arc<ManualClock>, Arc<BannerBoard>, Arc<MemoryBoard>) {
        let clock = Arc::new(ManualClock::new(Local::now()));
        let banners = Arc::new(BannerBoard::new(clock.clone()));
        let board = Arc::new(MemoryBoard::new());
        let monitor = Monitor::builder(Config::default())
            .clock(clock.clone())
            .camera(Arc::new(camera))
            .audio_cue(Arc::new(SilentCue))
            .notifier(banners.clone())
            .display(board.clone())
            .endpoint(Arc::new(NullEndpoint))
            .build()
            .unwrap();
        (monitor, clock, banners, board)
    }

    #[tokio::test]
    async fn test_start_and_stop_notify() {
        let (monitor, _clock, banners, _board) = monitor(SimulatedCamera::granting());

        monitor.start().await.unwrap();
        assert!(monitor.is_active());
        monitor.stop();
        monitor.stop();
        assert!(!monitor.is_active());

        let severities: Vec<_> = banners.history().iter().map(|n| n.severity).collect();
        assert_eq!(severities, [Severity::Success, Severity::Info, Severity::Info]);
        assert_eq!(banners.history()[0].message, STARTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_denied_start_changes_nothing() {
        let (monitor, _clock, banners, _board) = monitor(SimulatedCamera::denying());
        monitor.on_drowsiness_detected();
        let before = monitor.snapshot();

        assert_eq!(monitor.start().await, Err(MonitorError::PermissionDenied));
        assert_eq!(monitor.snapshot(), before);

        let last = banners.history().pop().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert_eq!(last.message, DENIED_MESSAGE);
    }

    #[tokio::test]
    async fn test_restart_resets_count() {
        let (monitor, _clock, _banners, _board) = monitor(SimulatedCamera::granting());
        monitor.start().await.unwrap();
        monitor.on_drowsiness_detected();
        monitor.on_drowsiness_detected();
        assert_eq!(monitor.alert_count(), 2);

        monitor.start().await.unwrap();
        assert_eq!(monitor.alert_count(), 0);
    }

    #[tokio::test]
    async fn test_leave_warning_only_while_active() {
        let (monitor, _clock, _banners, _board) = monitor(SimulatedCamera::granting());
        assert_eq!(monitor.leave_warning(), None);

        monitor.start().await.unwrap();
        assert_eq!(monitor.leave_warning(), Some(LEAVE_WARNING));

        monitor.stop();
        assert_eq!(monitor.leave_warning(), None);
    }

    #[tokio::test]
    async fn test_becoming_visible_refreshes_without_ticker() {
        let (monitor, clock, _banners, board) = monitor(SimulatedCamera::granting());
        monitor.start().await.unwrap();
        clock.advance(Duration::from_secs(42));

        monitor.set_page_hidden(false);
        assert_eq!(board.updates(), 0);

        monitor.set_page_hidden(true);
        assert_eq!(board.updates(), 0);
        monitor.set_page_hidden(false);
        assert_eq!(board.updates(), 1);
        assert_eq!(board.slot(Slot::Duration).as_deref(), Some("00:00:42"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_lifecycle() {
        let (monitor, _clock, _banners, board) = monitor(SimulatedCamera::granting());
        monitor.start().await.unwrap();

        assert!(monitor.start_ticker());
        assert!(monitor.start_ticker());
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(board.updates(), 2);

        monitor.shutdown().await;
        assert!(!monitor.ticker_running());
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(board.updates(), 2);
    }

    #[test]
    fn test_ticker_needs_runtime() {
        let (monitor, _clock, _banners, _board) = monitor(SimulatedCamera::granting());
        assert!(!monitor.start_ticker());
    }
}
