// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.
//
// The small view-state enums below replace ad-hoc class toggling and
// inline style mutation: the style or label of a widget is a pure
// function of its enum, and the data model never learns about either.

use kartenwerk_core::AppConfig;

use crate::services::app_services::AppServices;
use crate::services::session::PreviewSummary;

/// Whether the photo box shows the avatar placeholder or a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoViewState {
    #[default]
    Empty,
    HasPhoto,
}

/// Drop-target highlight while a file is dragged over the photo box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragFeedback {
    #[default]
    Idle,
    Active,
}

impl DragFeedback {
    pub fn border_color(&self) -> &'static str {
        match self {
            Self::Idle => "#2575fc",
            Self::Active => "#00c896",
        }
    }

    pub fn box_shadow(&self) -> &'static str {
        match self {
            Self::Idle => "0 4px 15px rgba(0,0,0,0.15)",
            Self::Active => "0 0 15px rgba(0, 200, 150, 0.5)",
        }
    }
}

/// Submit button label cycle: fresh form → flash after success → update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitFlash {
    #[default]
    Fresh,
    JustSubmitted,
    Resubmit,
}

impl SubmitFlash {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fresh => "Submit",
            Self::JustSubmitted => "Form Submitted!",
            Self::Resubmit => "Update Information",
        }
    }
}

/// Download button label flash after a successful export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadFlash {
    #[default]
    Idle,
    Done,
}

impl DownloadFlash {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Download ID Card",
            Self::Done => "ID Card Downloaded!",
        }
    }
}

/// Capture surface visibility. There is no `Denied` variant: a denied
/// request never opens the surface, it only posts a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraViewState {
    #[default]
    Closed,
    Live,
}

/// Shared state accessible to all pages via `use_context`.
#[derive(Clone, Default)]
pub struct AppState {
    /// Preview summary from the last successful submission.
    pub preview: Option<PreviewSummary>,
    pub photo_view: PhotoViewState,
    /// Data URI for the attached photo, rendered by the photo box and the
    /// preview panel. Always `Some` exactly when `photo_view` is `HasPhoto`.
    pub photo_src: Option<String>,
    pub drag: DragFeedback,
    pub camera: CameraViewState,
    pub submit_flash: SubmitFlash,
    pub download_flash: DownloadFlash,
    /// Status message for user feedback.
    pub status_message: Option<String>,
    /// Application settings.
    pub config: AppConfig,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        Self {
            config: svc.config(),
            ..Self::default()
        }
    }
}
