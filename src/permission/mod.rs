// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Camera permission gate
//!
//! A session may only start once the capture device could be opened. The
//! device is opened, released straight away, and every failure mode is
//! folded into [`Permission::Denied`].

mod device;

pub use device::*;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Outcome of a camera access request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Permission::Granted)
    }
}

/// Exclusive hold on a capture device; released on drop
pub struct CaptureLease {
    device: String,
    _handle: Option<tokio::fs::File>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl CaptureLease {
    pub fn new(device: &str, handle: Option<tokio::fs::File>) -> Self {
        Self {
            device: device.to_string(),
            _handle: handle,
            on_release: None,
        }
    }

    /// Run `hook` once the device is given back
    pub fn on_release<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_release = Some(Box::new(hook));
        self
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Give the device back
    pub fn release(self) {
        debug!("Released capture device {}", self.device);
    }
}

impl Drop for CaptureLease {
    fn drop(&mut self) {
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }
}

/// A video capture device that can be opened momentarily
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Device name for logs
    fn name(&self) -> &str;

    /// Open the device exclusively. May wait on the user or the hardware.
    async fn open(&self) -> Result<CaptureLease>;
}

/// Asks for camera access before a session starts
pub struct PermissionGate {
    device: Arc<dyn CaptureDevice>,
    timeout: Option<Duration>,
}

impl PermissionGate {
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            timeout: None,
        }
    }

    /// Treat a request still pending after `timeout` as denied
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn request_camera_access(&self) -> Permission {
        let attempt = self.device.open();
        let opened = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, attempt).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        "Camera permission request for {} timed out after {:?}",
                        self.device.name(),
                        limit
                    );
                    return Permission::Denied;
                }
            },
            None => attempt.await,
        };

        match opened {
            Ok(lease) => {
                lease.release();
                Permission::Granted
            }
            Err(e) => {
                error!("Camera permission denied for {}: {}", self.device.name(), e);
                Permission::Denied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_granted_device_is_released() {
        let camera = Arc::new(SimulatedCamera::granting());
        let gate = PermissionGate::new(camera.clone());

        assert_eq!(gate.request_camera_access().await, Permission::Granted);
        assert_eq!(camera.opens(), 1);
        assert_eq!(camera.held(), 0);
    }

    #[tokio::test]
    async fn test_refusal_folds_into_denied() {
        let gate = PermissionGate::new(Arc::new(SimulatedCamera::denying()));
        assert_eq!(gate.request_camera_access().await, Permission::Denied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_consent_times_out() {
        let camera = SimulatedCamera::granting().with_delay(Duration::from_secs(30));
        let gate = PermissionGate::new(Arc::new(camera)).with_timeout(Some(Duration::from_secs(5)));

        assert_eq!(gate.request_camera_access().await, Permission::Denied);
    }

    #[tokio::test]
    async fn test_missing_video_node_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let device = VideoNodeDevice::new(dir.path().join("video9"));
        let gate = PermissionGate::new(Arc::new(device));

        assert_eq!(gate.request_camera_access().await, Permission::Denied);
    }

    #[tokio::test]
    async fn test_readable_video_node_is_granted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("video0");
        std::fs::write(&path, b"").unwrap();
        let gate = PermissionGate::new(Arc::new(VideoNodeDevice::new(path)));

        assert!(gate.request_camera_access().await.is_granted());
    }
}
