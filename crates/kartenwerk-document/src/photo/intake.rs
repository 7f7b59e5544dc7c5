// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Photo intake — every photo enters the app through `PhotoIntake::accept`,
// whether it came from the file picker, drag-and-drop, or a camera frame.
//
// Accepted photos are decoded, downscaled to intake limits, and re-encoded
// as PNG so the rest of the app never sees the original container format.

use image::{DynamicImage, ImageFormat};
use kartenwerk_core::error::{KartenwerkError, Result};
use kartenwerk_core::types::Photo;
use tracing::{debug, info, instrument, warn};

/// Maximum accepted input size: 2 MiB.
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

/// Longest edge after normalization. Larger inputs are downscaled; smaller
/// ones pass through untouched (no upscaling).
const MAX_PHOTO_EDGE: u32 = 900;

/// Photo intake pipeline.
pub struct PhotoIntake;

impl PhotoIntake {
    /// Validate and normalize raw photo bytes.
    ///
    /// Rejects inputs over [`MAX_PHOTO_BYTES`] or whose magic bytes do not
    /// identify a supported image format. On rejection nothing is decoded
    /// and no state changes anywhere — the error message is user-facing.
    #[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
    pub fn accept(bytes: &[u8]) -> Result<Photo> {
        if bytes.len() > MAX_PHOTO_BYTES {
            warn!(len = bytes.len(), "photo rejected: over size limit");
            return Err(KartenwerkError::Media(
                "File size should be less than 2MB".into(),
            ));
        }

        let format = image::guess_format(bytes).map_err(|_| {
            warn!("photo rejected: not an image");
            KartenwerkError::Media("Please select an image file (JPG or PNG)".into())
        })?;

        let decoded = image::load_from_memory_with_format(bytes, format).map_err(|err| {
            KartenwerkError::Media(format!("failed to decode image: {err}"))
        })?;

        info!(
            format = ?format,
            width = decoded.width(),
            height = decoded.height(),
            "photo accepted"
        );

        Self::normalize(decoded)
    }

    /// Normalize a still frame grabbed from the camera.
    ///
    /// Camera frames arrive already decoded-and-re-encoded by the bridge,
    /// so only the decode/downscale/re-encode steps apply — a frame can
    /// never be "too large" in the file-size sense.
    #[instrument(skip(frame), fields(frame_len = frame.len()))]
    pub fn from_camera_frame(frame: &[u8]) -> Result<Photo> {
        let decoded = image::load_from_memory(frame).map_err(|err| {
            KartenwerkError::Media(format!("failed to decode camera frame: {err}"))
        })?;
        Self::normalize(decoded)
    }

    fn normalize(decoded: DynamicImage) -> Result<Photo> {
        let normalized = if decoded.width() > MAX_PHOTO_EDGE || decoded.height() > MAX_PHOTO_EDGE {
            let scaled = decoded.resize(
                MAX_PHOTO_EDGE,
                MAX_PHOTO_EDGE,
                image::imageops::FilterType::Lanczos3,
            );
            debug!(
                new_w = scaled.width(),
                new_h = scaled.height(),
                "photo downscaled"
            );
            scaled
        } else {
            decoded
        };

        let (width, height) = (normalized.width(), normalized.height());
        let png = encode_png(&normalized)?;

        Ok(Photo { png, width, height })
    }
}

/// Encode a `DynamicImage` as PNG, returning the raw bytes.
fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| KartenwerkError::Media(format!("image encoding failed: {err}")))?;
    Ok(buffer)
}
