// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card layout — composes the fixed card geometry and the resolved text
// content for one cardholder. All positions are design-time constants in
// millimetres, measured from the top-left of the page (the renderer flips
// to PDF coordinates when emitting ops). There is no dynamic reflow: the
// only data-dependent values are the wrapped name and address lines.

use chrono::NaiveDate;
use kartenwerk_core::types::{
    CardholderRecord, CardId, PageSize, format_date_dmy, valid_until,
};

/// 1 pt = 0.3528 mm.
const PT_TO_MM: f32 = 0.3528;

// Card geometry (mm).
pub const CARD_W: f32 = 90.0;
pub const CARD_H: f32 = 115.0;
pub const CARD_CORNER_RADIUS: f32 = 8.0;
pub const HEADER_H: f32 = 25.0;
pub const PHOTO_SIZE: f32 = 30.0;
pub const PHOTO_FRAME_PAD: f32 = 2.0;
pub const PHOTO_FRAME_RADIUS: f32 = 2.0;
const PHOTO_TOP_OFFSET: f32 = 45.0;
const DETAILS_INSET: f32 = 15.0;
const VALUE_COL_OFFSET: f32 = 35.0;
const DETAIL_ROW_STEP: f32 = 8.0;
const NAME_LINE_STEP: f32 = 5.0;
const ADDRESS_LINE_STEP: f32 = 4.0;
const FOOTER_RISE: f32 = 15.0;
pub const DOT_RADIUS: f32 = 1.0;
const DOT_STEP: f32 = 15.0;
const DOT_COUNT: usize = 5;

/// Address values wrap to at most this many lines; overflow is truncated.
pub const ADDRESS_MAX_LINES: usize = 3;

// Font sizes (pt).
pub const TITLE_SIZE: f32 = 18.0;
pub const SUBTITLE_SIZE: f32 = 12.0;
pub const ID_SIZE: f32 = 11.0;
pub const NAME_SIZE: f32 = 16.0;
pub const DETAIL_SIZE: f32 = 10.0;
pub const FOOTER_SIZE: f32 = 9.0;
pub const PLACEHOLDER_SIZE: f32 = 8.0;
pub const WATERMARK_SIZE: f32 = 24.0;

/// Axis-aligned rectangle in mm; `y` is the top edge measured from the
/// top of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectMm {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectMm {
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }
}

/// The fully composed card: geometry plus resolved text.
///
/// Composition is a pure function of its inputs, so two compositions of
/// unchanged state are equal — exports are layout-equivalent.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub page_w: f32,
    pub page_h: f32,
    pub card: RectMm,
    pub header: RectMm,
    pub title_y: f32,
    pub subtitle_y: f32,
    pub photo_box: RectMm,
    pub frame_box: RectMm,
    pub id_badge: RectMm,
    pub id_line: String,
    pub id_text_y: f32,
    pub name_lines: Vec<String>,
    pub name_top: f32,
    pub labels_x: f32,
    pub values_x: f32,
    pub dob_y: f32,
    pub phone_y: f32,
    pub address_y: f32,
    pub dob_text: String,
    pub phone_text: String,
    pub address_lines: Vec<String>,
    pub footer_rule_y: f32,
    pub rule_x0: f32,
    pub rule_x1: f32,
    pub issue_line: String,
    pub issue_y: f32,
    pub valid_line: String,
    pub valid_y: f32,
    pub signature_x0: f32,
    pub signature_x1: f32,
    pub signature_line_y: f32,
    pub signature_caption: String,
    pub signature_caption_y: f32,
    pub footer_note: Option<String>,
    pub footer_note_y: f32,
    pub dots: Vec<(f32, f32)>,
    pub watermark_center: (f32, f32),
}

impl CardLayout {
    /// Compose the card for one cardholder.
    ///
    /// `footer_text` is the optional extra line under the validity dates.
    pub fn compose(
        record: &CardholderRecord,
        card_id: &CardId,
        page_size: PageSize,
        issue_date: NaiveDate,
        footer_text: Option<&str>,
    ) -> Self {
        let (pw, ph) = page_size.dimensions_mm();
        let (page_w, page_h) = (pw as f32, ph as f32);

        let card = RectMm {
            x: (page_w - CARD_W) / 2.0,
            y: (page_h - CARD_H) / 2.0,
            w: CARD_W,
            h: CARD_H,
        };

        let header = RectMm {
            x: card.x,
            y: card.y,
            w: card.w,
            h: HEADER_H,
        };

        let photo_box = RectMm {
            x: page_w / 2.0 - PHOTO_SIZE / 2.0,
            y: card.y + PHOTO_TOP_OFFSET,
            w: PHOTO_SIZE,
            h: PHOTO_SIZE,
        };
        let frame_box = RectMm {
            x: photo_box.x - PHOTO_FRAME_PAD,
            y: photo_box.y - PHOTO_FRAME_PAD,
            w: photo_box.w + 2.0 * PHOTO_FRAME_PAD,
            h: photo_box.h + 2.0 * PHOTO_FRAME_PAD,
        };

        let labels_x = card.x + DETAILS_INSET;
        let values_x = labels_x + VALUE_COL_OFFSET;

        // The id badge sits directly under the photo; the name block under
        // the badge; the detail rows shift down with the wrapped name.
        let details_start_y = photo_box.y + PHOTO_SIZE + 15.0;
        let id_badge = RectMm {
            x: labels_x - 5.0,
            y: details_start_y - 8.0,
            w: card.w - 20.0,
            h: 15.0,
        };

        let name_width = card.w - 30.0;
        let name_lines = wrap_clamped(
            &record.full_name().to_uppercase(),
            max_chars_for_width(name_width, NAME_SIZE),
            usize::MAX,
        );
        let name_top = details_start_y + 15.0;

        let detail_y = details_start_y + 25.0 + name_lines.len() as f32 * NAME_LINE_STEP;

        let address_width = card.w - 40.0;
        let address_lines = wrap_clamped(
            &record.address,
            max_chars_for_width(address_width, DETAIL_SIZE),
            ADDRESS_MAX_LINES,
        );

        let footer_rule_y = card.y + card.h - FOOTER_RISE;

        let valid = valid_until(issue_date);

        let dots = (0..DOT_COUNT)
            .map(|i| (card.x + 10.0 + i as f32 * DOT_STEP, card.y + card.h - 5.0))
            .collect();

        Self {
            page_w,
            page_h,
            card,
            header,
            title_y: card.y + 15.0,
            subtitle_y: card.y + 22.0,
            photo_box,
            frame_box,
            id_badge,
            id_line: format!("STUDENT ID: {card_id}"),
            id_text_y: details_start_y,
            name_lines,
            name_top,
            labels_x,
            values_x,
            dob_y: detail_y,
            phone_y: detail_y + DETAIL_ROW_STEP,
            address_y: detail_y + 2.0 * DETAIL_ROW_STEP,
            dob_text: format_date_dmy(record.date_of_birth),
            phone_text: record.phone.clone(),
            address_lines,
            footer_rule_y,
            rule_x0: labels_x,
            rule_x1: card.x + card.w - DETAILS_INSET,
            issue_line: format!("Date Issued: {}", format_date_dmy(issue_date)),
            issue_y: footer_rule_y + 5.0,
            valid_line: format!("Valid Until: {}", format_date_dmy(valid)),
            valid_y: footer_rule_y + 10.0,
            signature_x0: card.x + card.w - 50.0,
            signature_x1: card.x + card.w - DETAILS_INSET,
            signature_line_y: footer_rule_y + 12.0,
            signature_caption: "Registrar's Signature".to_owned(),
            signature_caption_y: footer_rule_y + 10.0,
            footer_note: footer_text.map(str::to_owned),
            footer_note_y: card.y + card.h - 3.0,
            dots,
            watermark_center: (page_w / 2.0, page_h / 2.0),
        }
    }

    /// Address line step in mm (exposed for the renderer).
    pub fn address_line_step(&self) -> f32 {
        ADDRESS_LINE_STEP
    }

    /// Name line step in mm (exposed for the renderer).
    pub fn name_line_step(&self) -> f32 {
        NAME_LINE_STEP
    }
}

// -- Text measurement ---------------------------------------------------------

/// Estimated width of `text` in mm at the given Helvetica size.
///
/// Average Helvetica glyph width is roughly 0.50 * font_size in pt; exact
/// metrics don't matter because all the geometry carries slack.
pub fn estimate_text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * avg_char_width_mm(font_size_pt)
}

fn avg_char_width_mm(font_size_pt: f32) -> f32 {
    0.50 * font_size_pt * PT_TO_MM
}

/// How many estimated characters fit into `width_mm` at the given size.
/// Always at least 1 so wrapping can make progress.
pub fn max_chars_for_width(width_mm: f32, font_size_pt: f32) -> usize {
    ((width_mm / avg_char_width_mm(font_size_pt)) as usize).max(1)
}

// -- Text wrapping ------------------------------------------------------------

/// Wrap a string so that no line exceeds `max_chars` characters, keeping at
/// most `max_lines` lines and truncating the rest.
///
/// Splits on existing newlines first, then performs simple word-wrap within
/// each paragraph. Words longer than `max_chars` are force-broken.
pub fn wrap_clamped(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();

    'outer: for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let mut current_line = String::with_capacity(max_chars);

        for word in words {
            if word.len() > max_chars {
                if !current_line.is_empty() {
                    result.push(current_line.clone());
                    current_line.clear();
                    if result.len() >= max_lines {
                        break 'outer;
                    }
                }
                // Force-break the oversized word.
                let mut remaining = word;
                while remaining.len() > max_chars {
                    let (chunk, rest) = remaining.split_at(max_chars);
                    result.push(chunk.to_string());
                    if result.len() >= max_lines {
                        break 'outer;
                    }
                    remaining = rest;
                }
                if !remaining.is_empty() {
                    current_line.push_str(remaining);
                }
            } else if current_line.is_empty() {
                current_line.push_str(word);
            } else if current_line.len() + 1 + word.len() <= max_chars {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                result.push(current_line.clone());
                current_line.clear();
                if result.len() >= max_lines {
                    break 'outer;
                }
                current_line.push_str(word);
            }
        }

        if !current_line.is_empty() {
            result.push(current_line);
            if result.len() >= max_lines {
                break;
            }
        }
    }

    result.truncate(max_lines);
    result
}
