// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kartenwerk — Native platform bridge abstractions.
//
// This crate defines the camera traits and platform dispatch logic. The
// high-level Rust code interacts with device cameras through a unified
// interface; native implementations (AVFoundation, CameraX) plug in per
// platform, and the stub keeps desktop/CI builds working.

pub mod stub;
pub mod traits;

use std::sync::Arc;

/// Retrieves the bridge implementation for the target operating system.
///
/// Returns a shared trait object (`dyn PlatformBridge`) that abstracts
/// away the underlying native SDK details. Native mobile backends are not
/// wired yet, so every platform currently receives the stub — the camera
/// flow degrades to its permission-denied path.
pub fn platform_bridge() -> Arc<dyn traits::PlatformBridge> {
    Arc::new(stub::StubBridge)
}
