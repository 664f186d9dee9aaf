// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Repeating ticker with an explicit owner

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

type TickFn = Box<dyn Fn() + Send + Sync + 'static>;

/// Fires a callback every `period` until its handle is shut down or dropped
pub struct Ticker {
    name: String,
    period: Duration,
}

impl Ticker {
    pub fn new(name: &str, period: Duration) -> Self {
        Self {
            name: name.to_string(),
            period,
        }
    }

    /// Spawn the tick loop on the current tokio runtime.
    ///
    /// The first tick fires one full period after spawning.
    pub fn spawn<F>(self, on_tick: F) -> TickerHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        let on_tick: TickFn = Box::new(on_tick);
        let refresh = Arc::new(Notify::new());
        let ticks = Arc::new(AtomicU64::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = {
            let refresh = refresh.clone();
            let ticks = ticks.clone();
            let name = self.name.clone();
            let period = self.period;

            tokio::spawn(async move {
                let mut timer = interval(period);
                timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // interval() completes its first tick immediately
                timer.tick().await;
                debug!("Ticker '{}' running every {:?}", name, period);

                loop {
                    tokio::select! {
                        biased;
                        _ = &mut shutdown_rx => break,
                        _ = timer.tick() => {}
                        _ = refresh.notified() => {
                            debug!("Ticker '{}' forced tick", name);
                        }
                    }
                    on_tick();
                    ticks.fetch_add(1, Ordering::Relaxed);
                }

                debug!("Ticker '{}' stopped", name);
            })
        };

        TickerHandle {
            refresh,
            ticks,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

/// Owner of a running ticker. Dropping it cancels the loop.
pub struct TickerHandle {
    refresh: Arc<Notify>,
    ticks: Arc<AtomicU64>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Run one extra tick as soon as possible
    pub fn request_tick(&self) {
        self.refresh.notify_one();
    }

    /// Ticks fired so far, forced ones included
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |t| !t.is_finished())
    }

    /// Stop the loop and wait for it to exit
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
