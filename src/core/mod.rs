// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Core module - session state, timing and the monitor that ties them together

mod clock;
mod event_bus;
mod monitor;
mod session;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use event_bus::{Event, EventBus, EventPayload};
pub use monitor::{Monitor, MonitorBuilder, LEAVE_WARNING};
pub use session::{AlertEvent, SessionPhase, SessionState};
pub use ticker::{Ticker, TickerHandle};
