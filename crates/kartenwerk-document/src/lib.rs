// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// kartenwerk-document — Document processing for the Kartenwerk card maker.
//
// Provides the photo intake pipeline (size/type checks, decode, downscale,
// PNG re-encode) and the card pipeline (fixed-geometry layout composition
// and PDF rendering via `printpdf`).

pub mod card;
pub mod digest;
pub mod photo;

// Re-export the primary structs so callers can use `kartenwerk_document::CardRenderer` etc.
pub use card::layout::CardLayout;
pub use card::renderer::CardRenderer;
pub use photo::intake::PhotoIntake;
