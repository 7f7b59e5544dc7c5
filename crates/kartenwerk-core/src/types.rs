// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Kartenwerk card maker.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{KartenwerkError, Result};

/// Display identifier printed on the card, e.g. `STU2641873`.
///
/// Format: `<prefix><2-digit year><5 random digits>`. The token is a
/// display identifier, not a database key — uniqueness is best-effort
/// client randomness only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(String);

impl CardId {
    /// Generate a new identifier for the given issue year.
    ///
    /// The five random digits are drawn from a v4 UUID's random bits.
    pub fn generate(prefix: &str, year: i32) -> Self {
        let yy = year.rem_euclid(100);
        let random = 10_000 + (Uuid::new_v4().as_u128() % 90_000) as u32;
        Self(format!("{prefix}{yy:02}{random}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized in-memory passport photo.
///
/// Only the intake pipeline in `kartenwerk-document` constructs these:
/// the bytes are always PNG, already downscaled to intake limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// PNG-encoded pixel data.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Raw form input as entered by the user, before validation.
///
/// Field values are untrimmed strings straight from the input widgets;
/// `date_of_birth` is the `YYYY-MM-DD` value of a date input. Lifetime is
/// one app session — drafts are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardholderDraft {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub phone: String,
    pub address: String,
    pub photo: Option<Photo>,
}

impl CardholderDraft {
    /// Validate and trim the draft into a [`CardholderRecord`].
    ///
    /// Rules run in order and the first failure wins (no aggregation):
    /// required fields, photo presence, 10-digit phone, parseable date.
    /// Each failure carries the user-facing message for that rule.
    pub fn validate(&self) -> Result<CardholderRecord> {
        let first_name = self.first_name.trim();
        let middle_name = self.middle_name.trim();
        let last_name = self.last_name.trim();
        let date_of_birth = self.date_of_birth.trim();
        let phone = self.phone.trim();
        let address = self.address.trim();

        if first_name.is_empty()
            || last_name.is_empty()
            || date_of_birth.is_empty()
            || phone.is_empty()
            || address.is_empty()
        {
            return Err(KartenwerkError::Validation(
                "Please fill in all required fields (marked with *)".into(),
            ));
        }

        let photo = self.photo.clone().ok_or_else(|| {
            KartenwerkError::Validation("Please upload or capture a passport photo".into())
        })?;

        if !is_ten_digit_phone(phone) {
            return Err(KartenwerkError::Validation(
                "Please enter a valid 10-digit phone number".into(),
            ));
        }

        let date_of_birth =
            NaiveDate::parse_from_str(date_of_birth, "%Y-%m-%d").map_err(|_| {
                KartenwerkError::Validation("Please enter a valid date of birth".into())
            })?;

        Ok(CardholderRecord {
            first_name: first_name.to_owned(),
            middle_name: middle_name.to_owned(),
            last_name: last_name.to_owned(),
            date_of_birth,
            phone: phone.to_owned(),
            address: address.to_owned(),
            photo: Some(photo),
        })
    }
}

/// Validated cardholder data, ready for preview and export.
///
/// The photo is `Some` when the record is produced by validation; it can
/// revert to `None` if the user removes the photo afterwards, in which
/// case the card renders a placeholder box instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardholderRecord {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub address: String,
    pub photo: Option<Photo>,
}

impl CardholderRecord {
    /// First, middle, and last name joined with single spaces.
    ///
    /// Internal runs of whitespace collapse, so an absent middle name does
    /// not leave a double space.
    pub fn full_name(&self) -> String {
        let joined = format!("{} {} {}", self.first_name, self.middle_name, self.last_name);
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Exactly ten ASCII digits, nothing else.
pub fn is_ten_digit_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Format a date for display as zero-padded `DD/MM/YYYY`.
pub fn format_date_dmy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Expiry date for a card issued on `issue`: one calendar year later.
///
/// A Feb 29 issue date clamps to Feb 28 of the following year.
pub fn valid_until(issue: NaiveDate) -> NaiveDate {
    issue
        .with_year(issue.year() + 1)
        .or_else(|| NaiveDate::from_ymd_opt(issue.year() + 1, 2, 28))
        .unwrap_or(issue)
}

/// A rendered card ready for download.
///
/// Produced fresh on every export request and never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardArtifact {
    /// Download filename, `<prefix>_<card id>.pdf`.
    pub filename: String,
    /// The serialized PDF.
    pub bytes: Vec<u8>,
    /// SHA-256 of `bytes`, lowercase hex.
    pub sha256: String,
}

/// Fixed output page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    /// 105×148 mm — the ID-card default.
    A6,
    A5,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PageSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A6 => (105, 148),
            Self::A5 => (148, 210),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// Shape of the frame drawn around the photo box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoFrame {
    Rounded,
    Square,
    Circle,
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Card color scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Full-page background behind the card.
    pub page_background: Rgb8,
    /// Header band and accent elements (borders, id badge text).
    pub accent: Rgb8,
    /// Card body fill.
    pub card_background: Rgb8,
}

impl Palette {
    /// The classic blue scheme.
    pub fn classic_blue() -> Self {
        Self {
            page_background: Rgb8::new(20, 60, 150),
            accent: Rgb8::new(37, 117, 252),
            card_background: Rgb8::new(255, 255, 255),
        }
    }

    /// Dark slate variant.
    pub fn slate() -> Self {
        Self {
            page_background: Rgb8::new(40, 44, 52),
            accent: Rgb8::new(97, 175, 239),
            card_background: Rgb8::new(250, 250, 250),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic_blue()
    }
}

/// Cosmetic configuration for the card layout.
///
/// One layout routine handles every variant; these knobs cover the axes
/// on which the card designs actually differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStyle {
    pub photo_frame: PhotoFrame,
    pub palette: Palette,
    pub show_watermark: bool,
    pub watermark_text: String,
    /// Extra line printed under the validity dates, if any.
    pub footer_text: Option<String>,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            photo_frame: PhotoFrame::Rounded,
            palette: Palette::default(),
            show_watermark: true,
            watermark_text: "SPECIMEN".to_owned(),
            footer_text: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with(photo: Option<Photo>) -> CardholderDraft {
        CardholderDraft {
            first_name: "  Ada ".into(),
            middle_name: "".into(),
            last_name: " Lovelace ".into(),
            date_of_birth: "1815-12-10".into(),
            phone: "1234567890".into(),
            address: "12 St James's Square, London".into(),
            photo,
        }
    }

    fn tiny_photo() -> Photo {
        Photo {
            png: vec![0u8; 16],
            width: 4,
            height: 4,
        }
    }

    #[test]
    fn card_id_format() {
        let id = CardId::generate("STU", 2026);
        let s = id.as_str();
        assert!(s.starts_with("STU26"));
        assert_eq!(s.len(), "STU".len() + 2 + 5);
        let digits = &s["STU".len()..];
        assert!(digits.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn card_id_random_suffix_in_range() {
        for _ in 0..32 {
            let id = CardId::generate("STU", 2026);
            let suffix: u32 = id.as_str()["STU26".len()..].parse().unwrap();
            assert!((10_000..100_000).contains(&suffix));
        }
    }

    #[test]
    fn valid_draft_produces_trimmed_record() {
        let record = draft_with(Some(tiny_photo())).validate().unwrap();
        assert_eq!(record.first_name, "Ada");
        assert_eq!(record.last_name, "Lovelace");
        assert_eq!(record.full_name(), "Ada Lovelace");
    }

    #[test]
    fn full_name_collapses_internal_whitespace() {
        let mut draft = draft_with(Some(tiny_photo()));
        draft.middle_name = "  Augusta   King ".into();
        let record = draft.validate().unwrap();
        assert_eq!(record.full_name(), "Ada Augusta King Lovelace");
    }

    #[test]
    fn missing_required_field_fails_first() {
        // Both the last name and the photo are missing; the required-field
        // rule must win because it runs first.
        let mut draft = draft_with(None);
        draft.last_name = "   ".into();
        let err = draft.validate().unwrap_err();
        match err {
            KartenwerkError::Validation(msg) => {
                assert!(msg.contains("required fields"), "got: {msg}")
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn missing_photo_fails_before_phone_check() {
        let mut draft = draft_with(None);
        draft.phone = "123".into();
        let err = draft.validate().unwrap_err();
        match err {
            KartenwerkError::Validation(msg) => {
                assert!(msg.contains("passport photo"), "got: {msg}")
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn phone_validation_matrix() {
        assert!(is_ten_digit_phone("1234567890"));
        assert!(!is_ten_digit_phone("123456789")); // 9 digits
        assert!(!is_ten_digit_phone("12345678901")); // 11 digits
        assert!(!is_ten_digit_phone("123-456-7890")); // separators
        assert!(!is_ten_digit_phone("12345 7890")); // embedded space
    }

    #[test]
    fn nine_digit_phone_rejected_with_phone_message() {
        let mut draft = draft_with(Some(tiny_photo()));
        draft.phone = "123456789".into();
        let err = draft.validate().unwrap_err();
        match err {
            KartenwerkError::Validation(msg) => {
                assert!(msg.contains("10-digit"), "got: {msg}")
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_date_rejected() {
        let mut draft = draft_with(Some(tiny_photo()));
        draft.date_of_birth = "10/12/1815".into();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn date_formats_zero_padded() {
        let d = NaiveDate::from_ymd_opt(1999, 3, 7).unwrap();
        assert_eq!(format_date_dmy(d), "07/03/1999");
    }

    #[test]
    fn valid_until_adds_one_year() {
        let d = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(valid_until(d), NaiveDate::from_ymd_opt(2027, 8, 7).unwrap());
    }

    #[test]
    fn valid_until_clamps_leap_day() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(valid_until(d), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn a6_dimensions() {
        assert_eq!(PageSize::A6.dimensions_mm(), (105, 148));
    }
}
