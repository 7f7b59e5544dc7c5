// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera session controller.
//
// The live stream is a scoped resource: acquired in `open`, released by
// `teardown`. Every way out of the capture surface — explicit capture,
// cancel, close button, click outside the modal — ends up in the same
// `teardown` routine, so the device handle can never leak. `Drop` is the
// backstop for the app quitting with the modal open.

use std::sync::Arc;

use kartenwerk_bridge::traits::{CameraRequest, CameraStream, PlatformBridge};
use kartenwerk_core::error::{KartenwerkError, Result};
use kartenwerk_core::types::Photo;
use kartenwerk_document::PhotoIntake;
use tracing::{info, warn};

pub struct CameraController {
    bridge: Arc<dyn PlatformBridge>,
    active: Option<Box<dyn CameraStream>>,
}

impl CameraController {
    pub fn new(bridge: Arc<dyn PlatformBridge>) -> Self {
        Self {
            bridge,
            active: None,
        }
    }

    /// Whether a stream currently holds the device.
    pub fn is_live(&self) -> bool {
        self.active.is_some()
    }

    /// Request the camera and keep the stream for the capture surface.
    ///
    /// On permission denial (or a platform without a camera) no stream is
    /// stored and the error propagates for the UI to show; the capture
    /// surface must not open. A second `open` while live releases the
    /// first stream before acquiring again.
    pub fn open(&mut self, request: CameraRequest) -> Result<()> {
        self.teardown();
        let stream = self.bridge.open(request).map_err(|err| match err {
            KartenwerkError::PlatformUnavailable => KartenwerkError::Media(
                "Error accessing camera: no camera is available on this device".into(),
            ),
            other => other,
        })?;
        info!(platform = self.bridge.platform_name(), "camera stream opened");
        self.active = Some(stream);
        Ok(())
    }

    /// Grab one still frame, normalize it into a photo, and release the
    /// device.
    ///
    /// The device is released whether or not the grab succeeds — capture
    /// dismisses the surface either way.
    pub fn capture(&mut self) -> Result<Photo> {
        let frame = match self.active.as_mut() {
            Some(stream) => stream.grab_frame(),
            None => Err(KartenwerkError::Media("no active camera stream".into())),
        };
        self.teardown();

        let frame = frame?;
        PhotoIntake::from_camera_frame(&frame)
    }

    /// Release the device if held. Safe to call from any dismissal path,
    /// any number of times.
    pub fn teardown(&mut self) {
        if let Some(mut stream) = self.active.take() {
            stream.stop();
            info!("camera stream stopped");
        }
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        if self.is_live() {
            warn!("camera controller dropped with live stream, releasing");
            self.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kartenwerk_bridge::traits::CameraAccess;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub media layer counting every open and stop.
    struct MockBridge {
        deny: bool,
        opens: AtomicUsize,
        stops: Arc<AtomicUsize>,
        frame: Vec<u8>,
        grab_fails: bool,
    }

    impl MockBridge {
        fn new(deny: bool) -> Self {
            Self {
                deny,
                opens: AtomicUsize::new(0),
                stops: Arc::new(AtomicUsize::new(0)),
                frame: test_frame(),
                grab_fails: false,
            }
        }
    }

    struct MockStream {
        stops: Arc<AtomicUsize>,
        frame: Vec<u8>,
        grab_fails: bool,
    }

    impl CameraStream for MockStream {
        fn grab_frame(&mut self) -> Result<Vec<u8>> {
            if self.grab_fails {
                Err(KartenwerkError::Media("sensor fault".into()))
            } else {
                Ok(self.frame.clone())
            }
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl CameraAccess for MockBridge {
        fn open(&self, _request: CameraRequest) -> Result<Box<dyn CameraStream>> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if self.deny {
                return Err(KartenwerkError::Media(
                    "Error accessing camera: Permission denied".into(),
                ));
            }
            Ok(Box::new(MockStream {
                stops: Arc::clone(&self.stops),
                frame: self.frame.clone(),
                grab_fails: self.grab_fails,
            }))
        }
    }

    impl PlatformBridge for MockBridge {
        fn platform_name(&self) -> &str {
            "Mock"
        }
    }

    fn test_frame() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            640,
            480,
            image::Rgb([10, 20, 30]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn controller(bridge: &Arc<MockBridge>) -> CameraController {
        CameraController::new(Arc::clone(bridge) as Arc<dyn PlatformBridge>)
    }

    #[test]
    fn open_then_cancel_stops_exactly_once() {
        let bridge = Arc::new(MockBridge::new(false));
        let mut cam = controller(&bridge);

        cam.open(CameraRequest::default()).unwrap();
        assert!(cam.is_live());
        cam.teardown();

        assert!(!cam.is_live());
        assert_eq!(bridge.stops.load(Ordering::SeqCst), 1);

        // Redundant dismissals (close after cancel) must not double-stop.
        cam.teardown();
        assert_eq!(bridge.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn capture_returns_photo_and_stops_exactly_once() {
        let bridge = Arc::new(MockBridge::new(false));
        let mut cam = controller(&bridge);

        cam.open(CameraRequest::default()).unwrap();
        let photo = cam.capture().unwrap();

        assert_eq!((photo.width, photo.height), (640, 480));
        assert!(!cam.is_live());
        assert_eq!(bridge.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn denied_permission_leaves_no_stream() {
        let bridge = Arc::new(MockBridge::new(true));
        let mut cam = controller(&bridge);

        let err = cam.open(CameraRequest::default()).unwrap_err();
        assert!(matches!(err, KartenwerkError::Media(_)));
        assert!(!cam.is_live());
        assert_eq!(bridge.stops.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_grab_still_releases_device() {
        let bridge = Arc::new(MockBridge {
            grab_fails: true,
            ..MockBridge::new(false)
        });
        let mut cam = controller(&bridge);

        cam.open(CameraRequest::default()).unwrap();
        assert!(cam.capture().is_err());
        assert!(!cam.is_live());
        assert_eq!(bridge.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reopening_releases_previous_stream() {
        let bridge = Arc::new(MockBridge::new(false));
        let mut cam = controller(&bridge);

        cam.open(CameraRequest::default()).unwrap();
        cam.open(CameraRequest::default()).unwrap();

        assert_eq!(bridge.opens.load(Ordering::SeqCst), 2);
        assert_eq!(bridge.stops.load(Ordering::SeqCst), 1);
        cam.teardown();
        assert_eq!(bridge.stops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn drop_releases_live_stream() {
        let bridge = Arc::new(MockBridge::new(false));
        {
            let mut cam = controller(&bridge);
            cam.open(CameraRequest::default()).unwrap();
        }
        assert_eq!(bridge.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn capture_without_open_is_media_error() {
        let bridge = Arc::new(MockBridge::new(false));
        let mut cam = controller(&bridge);
        assert!(matches!(
            cam.capture().unwrap_err(),
            KartenwerkError::Media(_)
        ));
    }
}
