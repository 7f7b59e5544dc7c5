// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native camera APIs are unavailable.
//
// `open` fails with `PlatformUnavailable`, which surfaces through the same
// user-facing path as a camera permission denial: a message is shown and
// the capture surface never opens.

use kartenwerk_core::error::{KartenwerkError, Result};

use crate::traits::{CameraAccess, CameraRequest, CameraStream, PlatformBridge};

/// No-op bridge returned on platforms without a native camera backend.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl CameraAccess for StubBridge {
    fn open(&self, _request: CameraRequest) -> Result<Box<dyn CameraStream>> {
        tracing::warn!("CameraAccess::open called on stub bridge");
        Err(KartenwerkError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_open_fails_without_creating_a_stream() {
        let err = StubBridge.open(CameraRequest::default()).err().unwrap();
        assert!(matches!(err, KartenwerkError::PlatformUnavailable));
    }
}
