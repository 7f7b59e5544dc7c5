// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for camera access.
//
// The camera is modelled as a scoped resource: `CameraAccess::open` hands
// out a live stream, and whoever holds it owns exactly one obligation —
// calling `stop` on every exit path. The controller in kartenwerk-app
// funnels all four dismissal paths (capture, cancel, close, outside-click)
// through a single teardown routine to discharge it.

use kartenwerk_core::error::Result;

/// Parameters for opening a video input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraRequest {
    /// Preferred capture width in pixels; the device may deliver another size.
    pub ideal_width: u32,
    /// Preferred capture height in pixels.
    pub ideal_height: u32,
    /// Prefer the user-facing camera where the platform distinguishes.
    pub front_facing: bool,
}

impl Default for CameraRequest {
    fn default() -> Self {
        Self {
            ideal_width: 640,
            ideal_height: 480,
            front_facing: true,
        }
    }
}

/// A live video stream holding exclusive access to the device.
pub trait CameraStream: Send {
    /// Grab a single still frame at the stream's native resolution,
    /// encoded as PNG.
    fn grab_frame(&mut self) -> Result<Vec<u8>>;

    /// Release the device. The controller calls this exactly once per
    /// stream; implementations should tolerate repeated calls anyway.
    fn stop(&mut self);
}

/// Access to the device camera.
pub trait CameraAccess: Send + Sync {
    /// Request exclusive access to a video input device.
    ///
    /// Fails with a `Media` error when the user denies permission and with
    /// `PlatformUnavailable` where no camera backend exists; in either
    /// case no stream is created and there is nothing to release.
    fn open(&self, request: CameraRequest) -> Result<Box<dyn CameraStream>>;
}

/// Unified bridge that groups all native capabilities.
///
/// Platforms without a capability return
/// `KartenwerkError::PlatformUnavailable` from the stub implementation.
pub trait PlatformBridge: CameraAccess {
    /// Human-readable platform name (e.g. "iOS 17", "Android 14").
    fn platform_name(&self) -> &str;
}
