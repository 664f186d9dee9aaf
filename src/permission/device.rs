// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Capture device implementations

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{CaptureDevice, CaptureLease};

/// V4L-style device node such as `/dev/video0`
pub struct VideoNodeDevice {
    path: PathBuf,
    name: String,
}

impl VideoNodeDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl CaptureDevice for VideoNodeDevice {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self) -> Result<CaptureLease> {
        let file = tokio::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .await
            .with_context(|| format!("cannot open {}", self.name))?;
        Ok(CaptureLease::new(&self.name, Some(file)))
    }
}

/// Camera with a fixed answer, for demo mode and tests
pub struct SimulatedCamera {
    grant: bool,
    delay: Option<Duration>,
    opens: AtomicU64,
    held: Arc<AtomicU64>,
}

impl SimulatedCamera {
    pub fn granting() -> Self {
        Self::new(true)
    }

    pub fn denying() -> Self {
        Self::new(false)
    }

    fn new(grant: bool) -> Self {
        Self {
            grant,
            delay: None,
            opens: AtomicU64::new(0),
            held: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Simulate the user taking a while to answer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Open attempts so far
    pub fn opens(&self) -> u64 {
        self.opens.load(Ordering::SeqCst)
    }

    /// Leases currently outstanding
    pub fn held(&self) -> u64 {
        self.held.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureDevice for SimulatedCamera {
    fn name(&self) -> &str {
        "simulated-camera"
    }

    async fn open(&self) -> Result<CaptureLease> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if !self.grant {
            bail!("user refused camera access");
        }

        self.held.fetch_add(1, Ordering::SeqCst);
        let held = self.held.clone();
        Ok(CaptureLease::new(self.name(), None).on_release(move || {
            held.fetch_sub(1, Ordering::SeqCst);
        }))
    }
}
