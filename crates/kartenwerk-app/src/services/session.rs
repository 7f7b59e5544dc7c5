// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card session — the single controller owning the form state.
//
// All mutation funnels through this struct: the UI hands in field values
// on submit, photos arrive via the intake pipeline, and export enforces
// its precondition here. The card identifier is generated once per session
// and survives resubmission.

use chrono::{Datelike, NaiveDate};
use kartenwerk_core::AppConfig;
use kartenwerk_core::error::{KartenwerkError, Result};
use kartenwerk_core::types::{
    CardArtifact, CardholderDraft, CardholderRecord, CardId, Photo, format_date_dmy,
};
use kartenwerk_document::card::renderer::export_filename;
use kartenwerk_document::{CardRenderer, digest};
use tracing::{info, instrument};

/// Raw field values handed over by the form on submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub phone: String,
    pub address: String,
}

/// Display-ready summary rendered after a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSummary {
    pub card_id: String,
    pub full_name: String,
    pub date_of_birth: String,
    pub phone: String,
    pub address: String,
    pub issue_date: String,
}

/// One user's card-making session.
#[derive(Default)]
pub struct CardSession {
    draft: CardholderDraft,
    /// Validated record from the last successful submission.
    record: Option<CardholderRecord>,
    card_id: Option<CardId>,
}

impl CardSession {
    /// Start a session with a pre-generated identifier.
    pub fn new(id_prefix: &str, year: i32) -> Self {
        Self {
            draft: CardholderDraft::default(),
            record: None,
            card_id: Some(CardId::generate(id_prefix, year)),
        }
    }

    /// The session identifier, if one has been generated yet.
    pub fn card_id(&self) -> Option<&CardId> {
        self.card_id.as_ref()
    }

    /// Whether a submission has succeeded this session.
    pub fn submitted(&self) -> bool {
        self.record.is_some()
    }

    /// Whether a photo is currently attached.
    pub fn has_photo(&self) -> bool {
        self.draft.photo.is_some()
    }

    /// Attach a photo, replacing any prior one.
    pub fn set_photo(&mut self, photo: Photo) {
        self.draft.photo = Some(photo);
    }

    /// Detach the current photo.
    pub fn remove_photo(&mut self) {
        self.draft.photo = None;
    }

    /// Validate and submit the form.
    ///
    /// On success the identifier is assigned if absent (it is never
    /// regenerated), the record is stored, and a fresh preview summary is
    /// returned. On failure the submitted state is untouched.
    #[instrument(skip(self, fields))]
    pub fn submit(
        &mut self,
        fields: FormFields,
        id_prefix: &str,
        today: NaiveDate,
    ) -> Result<PreviewSummary> {
        self.draft.first_name = fields.first_name;
        self.draft.middle_name = fields.middle_name;
        self.draft.last_name = fields.last_name;
        self.draft.date_of_birth = fields.date_of_birth;
        self.draft.phone = fields.phone;
        self.draft.address = fields.address;

        let record = self.draft.validate()?;

        let card_id = self
            .card_id
            .get_or_insert_with(|| CardId::generate(id_prefix, today.year()));

        info!(card = %card_id, "form submitted");

        let preview = PreviewSummary {
            card_id: card_id.to_string(),
            full_name: record.full_name(),
            date_of_birth: format_date_dmy(record.date_of_birth),
            phone: record.phone.clone(),
            address: record.address.clone(),
            issue_date: format_date_dmy(today),
        };

        self.record = Some(record);
        Ok(preview)
    }

    /// Render the card for download.
    ///
    /// Refused until a submission has succeeded. Uses the record from the
    /// last successful submission, with the photo state as it is now — a
    /// photo removed since submission renders as a placeholder.
    #[instrument(skip(self, config))]
    pub fn export(&self, config: &AppConfig, today: NaiveDate) -> Result<CardArtifact> {
        let (Some(card_id), Some(record)) = (self.card_id.as_ref(), self.record.as_ref()) else {
            return Err(KartenwerkError::Precondition(
                "Please submit the form first before downloading the ID card".into(),
            ));
        };

        let mut record = record.clone();
        record.photo = self.draft.photo.clone();

        let renderer = CardRenderer::new(config);
        let bytes = renderer.render(&record, card_id, today)?;
        let sha256 = digest::hash_bytes(&bytes);
        let filename = export_filename(&config.filename_prefix, card_id);

        info!(card = %card_id, filename, sha256, "card exported");

        Ok(CardArtifact {
            filename,
            bytes,
            sha256,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use kartenwerk_document::PhotoIntake;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([100, 120, 140])));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn valid_fields() -> FormFields {
        FormFields {
            first_name: "Ada".into(),
            middle_name: "".into(),
            last_name: "Lovelace".into(),
            date_of_birth: "1815-12-10".into(),
            phone: "1234567890".into(),
            address: "12 St James's Square, London".into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn session_with_photo() -> CardSession {
        let mut session = CardSession::new("STU", 2026);
        let photo = PhotoIntake::accept(&png_bytes(64, 64)).unwrap();
        session.set_photo(photo);
        session
    }

    #[test]
    fn identifier_exists_at_session_start() {
        let session = CardSession::new("STU", 2026);
        let id = session.card_id().unwrap();
        assert!(id.as_str().starts_with("STU26"));
    }

    #[test]
    fn identifier_stable_across_resubmissions() {
        let mut session = session_with_photo();
        let first = session.submit(valid_fields(), "STU", today()).unwrap();

        let mut changed = valid_fields();
        changed.first_name = "Augusta".into();
        changed.phone = "0987654321".into();
        let second = session.submit(changed, "STU", today()).unwrap();

        assert_eq!(first.card_id, second.card_id);
        assert_eq!(second.full_name, "Augusta Lovelace");
        assert_eq!(second.phone, "0987654321");
    }

    #[test]
    fn identifier_generated_lazily_when_absent() {
        // A default session has no identifier until the first submission.
        let mut session = CardSession::default();
        assert!(session.card_id().is_none());
        session.set_photo(PhotoIntake::accept(&png_bytes(32, 32)).unwrap());
        let preview = session.submit(valid_fields(), "STU", today()).unwrap();
        assert!(preview.card_id.starts_with("STU26"));
        assert_eq!(session.card_id().unwrap().to_string(), preview.card_id);
    }

    #[test]
    fn preview_collapses_whitespace_in_name() {
        let mut session = session_with_photo();
        let mut fields = valid_fields();
        fields.first_name = "  Ada ".into();
        fields.middle_name = "  Augusta   King ".into();
        let preview = session.submit(fields, "STU", today()).unwrap();
        assert_eq!(preview.full_name, "Ada Augusta King Lovelace");
        assert_eq!(preview.date_of_birth, "10/12/1815");
        assert_eq!(preview.issue_date, "07/08/2026");
    }

    #[test]
    fn failed_submission_leaves_session_unsubmitted() {
        let mut session = session_with_photo();
        let mut fields = valid_fields();
        fields.phone = "123".into();
        assert!(session.submit(fields, "STU", today()).is_err());
        assert!(!session.submitted());
    }

    #[test]
    fn export_before_submit_refused() {
        let session = session_with_photo();
        let err = session.export(&AppConfig::default(), today()).unwrap_err();
        match err {
            KartenwerkError::Precondition(msg) => {
                assert!(msg.contains("submit the form first"), "got: {msg}")
            }
            other => panic!("expected Precondition, got {other:?}"),
        }
    }

    #[test]
    fn export_after_submit_produces_named_artifact() {
        let mut session = session_with_photo();
        session.submit(valid_fields(), "STU", today()).unwrap();

        let artifact = session.export(&AppConfig::default(), today()).unwrap();
        let id = session.card_id().unwrap().to_string();
        assert_eq!(artifact.filename, format!("University_ID_{id}.pdf"));
        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert_eq!(artifact.sha256, digest::hash_bytes(&artifact.bytes));
    }

    #[test]
    fn rejected_photo_leaves_stored_photo_unchanged() {
        let mut session = session_with_photo();

        // Oversized and wrong-type inputs never reach the session.
        assert!(PhotoIntake::accept(&vec![0u8; 3 * 1024 * 1024]).is_err());
        let mut pdf = b"%PDF-1.4\n".to_vec();
        pdf.resize(1024 * 1024, b' ');
        assert!(PhotoIntake::accept(&pdf).is_err());

        assert!(session.has_photo());
        session.submit(valid_fields(), "STU", today()).unwrap();
    }

    #[test]
    fn photo_removed_after_submit_still_exports() {
        let mut session = session_with_photo();
        session.submit(valid_fields(), "STU", today()).unwrap();
        session.remove_photo();
        // Placeholder path: export must still succeed.
        let artifact = session.export(&AppConfig::default(), today()).unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn submit_requires_photo() {
        let mut session = CardSession::new("STU", 2026);
        let err = session.submit(valid_fields(), "STU", today()).unwrap_err();
        match err {
            KartenwerkError::Validation(msg) => {
                assert!(msg.contains("passport photo"), "got: {msg}")
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
