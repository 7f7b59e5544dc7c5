// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — initialises the backend and provides methods
// for the Dioxus UI to call.
//
// The card session and camera controller hold mutable state, so they are
// wrapped in `Arc<Mutex<>>` for safe sharing across the Dioxus task pool.
// Contention is irrelevant: everything here runs on user-triggered events.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Local};
use kartenwerk_bridge::platform_bridge;
use kartenwerk_core::AppConfig;
use kartenwerk_core::error::Result;
use kartenwerk_core::types::{CardArtifact, CardId, Photo};
use kartenwerk_document::PhotoIntake;
use tracing::{info, warn};

use super::camera::CameraController;
use super::data_dir;
use super::session::{CardSession, FormFields, PreviewSummary};

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable (Arc-wrapped) so that the struct can be
/// passed into closures and async blocks without lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<Mutex<CardSession>>,
    camera: Arc<Mutex<CameraController>>,
    config: Arc<Mutex<AppConfig>>,
    data_dir: PathBuf,
}

#[allow(dead_code)]
impl AppServices {
    /// Initialise all services. Call once at app startup.
    ///
    /// Loads persisted settings, generates the session identifier, and
    /// wires the platform camera bridge.
    pub fn init() -> Self {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");

        let config = load_config(&dir).unwrap_or_default();
        let session = CardSession::new(&config.id_prefix, Local::now().year());
        let camera = CameraController::new(platform_bridge());

        info!("app services initialised");

        Self {
            session: Arc::new(Mutex::new(session)),
            camera: Arc::new(Mutex::new(camera)),
            config: Arc::new(Mutex::new(config)),
            data_dir: dir,
        }
    }

    // -- Form & preview ------------------------------------------------------

    /// Validate and submit the form, returning the preview summary.
    pub fn submit(&self, fields: FormFields) -> Result<PreviewSummary> {
        let prefix = self.config().id_prefix;
        let mut session = self.session.lock().expect("session lock poisoned");
        session.submit(fields, &prefix, Local::now().date_naive())
    }

    /// The session identifier, if generated.
    pub fn card_id(&self) -> Option<CardId> {
        let session = self.session.lock().expect("session lock poisoned");
        session.card_id().cloned()
    }

    // -- Photo ---------------------------------------------------------------

    /// Run raw bytes (file pick or drag-drop) through intake and attach
    /// the photo on success. Rejection leaves the stored photo untouched.
    pub fn accept_photo_bytes(&self, bytes: &[u8]) -> Result<Photo> {
        let photo = PhotoIntake::accept(bytes)?;
        let mut session = self.session.lock().expect("session lock poisoned");
        session.set_photo(photo.clone());
        Ok(photo)
    }

    /// Detach the current photo.
    pub fn remove_photo(&self) {
        let mut session = self.session.lock().expect("session lock poisoned");
        session.remove_photo();
    }

    /// Whether a photo is currently attached.
    pub fn has_photo(&self) -> bool {
        let session = self.session.lock().expect("session lock poisoned");
        session.has_photo()
    }

    // -- Camera --------------------------------------------------------------

    /// Request camera access for the capture surface.
    pub fn open_camera(&self) -> Result<()> {
        let mut camera = self.camera.lock().expect("camera lock poisoned");
        camera.open(Default::default())
    }

    /// Capture a still frame, attach it as the photo, and release the
    /// device.
    pub fn capture_photo(&self) -> Result<Photo> {
        let photo = {
            let mut camera = self.camera.lock().expect("camera lock poisoned");
            camera.capture()?
        };
        let mut session = self.session.lock().expect("session lock poisoned");
        session.set_photo(photo.clone());
        Ok(photo)
    }

    /// Release the camera. Invoked from every dismissal path of the
    /// capture surface.
    pub fn close_camera(&self) {
        let mut camera = self.camera.lock().expect("camera lock poisoned");
        camera.teardown();
    }

    // -- Export --------------------------------------------------------------

    /// Render the card for download.
    pub fn export_card(&self) -> Result<CardArtifact> {
        let config = self.config();
        let session = self.session.lock().expect("session lock poisoned");
        session.export(&config, Local::now().date_naive())
    }

    /// Write an exported artifact into the app's exports directory.
    ///
    /// This copy exists so the card survives a cancelled save dialog.
    pub fn store_artifact(&self, artifact: &CardArtifact) -> Result<PathBuf> {
        let exports = data_dir::data_subdir("exports");
        let path = exports.join(&artifact.filename);
        std::fs::write(&path, &artifact.bytes)?;
        info!(path = %path.display(), sha256 = %artifact.sha256, "card stored");
        Ok(path)
    }

    // -- Config Persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Update and persist the config.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        *self.config.lock().expect("config lock poisoned") = config.clone();
        persist_config(&self.data_dir, config)
    }

    /// Path to the data directory.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &std::path::Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(error = %err, "config file unreadable — using defaults");
            None
        }
    }
}

fn persist_config(data_dir: &std::path::Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
