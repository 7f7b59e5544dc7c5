// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::types::{CardStyle, PageSize};

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Issuing institution, printed in the header band.
    pub institution_name: String,
    /// Card title, printed under the institution name.
    pub card_title: String,
    /// Prefix for generated card identifiers.
    pub id_prefix: String,
    /// Prefix for the export filename (`<prefix>_<card id>.pdf`).
    pub filename_prefix: String,
    /// Output page size.
    pub page_size: PageSize,
    /// Cosmetic card style.
    pub style: CardStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            institution_name: "UNIVERSITY OF TECHNOLOGY".to_owned(),
            card_title: "Student Identity Card".to_owned(),
            id_prefix: "STU".to_owned(),
            filename_prefix: "University_ID".to_owned(),
            page_size: PageSize::A6,
            style: CardStyle::default(),
        }
    }
}
