// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card renderer — serialises a composed card layout to PDF using the
// `printpdf` 0.8 data-oriented API: one `PdfPage` built from a `Vec<Op>`
// operation list, saved via `PdfDocument::save()`.
//
// Rendering is a pure function of (record, card id, style, issue date).
// A photo that fails to decode is replaced by a placeholder box — the
// export never aborts because of a bad image.

use std::path::Path;

use chrono::NaiveDate;
use kartenwerk_core::AppConfig;
use kartenwerk_core::error::{KartenwerkError, Result};
use kartenwerk_core::types::{
    CardholderRecord, CardId, CardStyle, PageSize, Photo, PhotoFrame, Rgb8,
};
use printpdf::{
    BuiltinFont, Color, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg,
    Point, Polygon, PolygonRing, Pt, RawImage, RawImageData, RawImageFormat, Rgb, TextItem,
    TextMatrix, WindingOrder, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use super::layout::{
    self, CardLayout, RectMm, CARD_CORNER_RADIUS, PHOTO_FRAME_RADIUS,
};
use super::shapes;

/// Export filename: `<prefix>_<card id>.pdf`.
pub fn export_filename(prefix: &str, card_id: &CardId) -> String {
    format!("{prefix}_{card_id}.pdf")
}

/// Renders cardholder records into single-page PDF cards.
pub struct CardRenderer {
    page_size: PageSize,
    style: CardStyle,
    institution_name: String,
    card_title: String,
}

impl CardRenderer {
    /// Create a renderer from the application configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            style: config.style.clone(),
            institution_name: config.institution_name.clone(),
            card_title: config.card_title.clone(),
        }
    }

    /// Render the card and return the serialised PDF bytes.
    #[instrument(skip(self, record), fields(card = %card_id))]
    pub fn render(
        &self,
        record: &CardholderRecord,
        card_id: &CardId,
        issue_date: NaiveDate,
    ) -> Result<Vec<u8>> {
        let (pw, ph) = self.page_size.dimensions_mm();
        if (pw as f32) < layout::CARD_W || (ph as f32) < layout::CARD_H {
            return Err(KartenwerkError::Render(format!(
                "page {pw}x{ph}mm is smaller than the {}x{}mm card",
                layout::CARD_W,
                layout::CARD_H
            )));
        }

        let card = CardLayout::compose(
            record,
            card_id,
            self.page_size,
            issue_date,
            self.style.footer_text.as_deref(),
        );

        info!(paper = ?self.page_size, "rendering card");

        let mut doc = PdfDocument::new(&self.institution_name);
        let mut ops: Vec<Op> = Vec::new();

        self.paint_background(&card, &mut ops);
        self.paint_card_body(&card, &mut ops);
        self.paint_header(&card, &mut ops);
        self.paint_photo(&card, record.photo.as_ref(), &mut doc, &mut ops);
        self.paint_details(&card, &mut ops);
        self.paint_footer(&card, &mut ops);
        if self.style.show_watermark {
            self.paint_watermark(&card, &mut ops);
        }

        let page = PdfPage::new(Mm(card.page_w), Mm(card.page_h), ops);
        doc.with_pages(vec![page]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        debug!(bytes = output.len(), warnings = warnings.len(), "card serialised");

        Ok(output)
    }

    /// Render the card and write it directly to a file.
    pub fn render_to_file(
        &self,
        record: &CardholderRecord,
        card_id: &CardId,
        issue_date: NaiveDate,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.render(record, card_id, issue_date)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("wrote card PDF to {}", path.as_ref().display());
        Ok(())
    }

    // -- Paint passes ---------------------------------------------------------

    fn paint_background(&self, card: &CardLayout, ops: &mut Vec<Op>) {
        ops.push(set_fill(self.style.palette.page_background));
        ops.push(fill_polygon(shapes::rect_ring(
            0.0,
            0.0,
            card.page_w,
            card.page_h,
        )));
    }

    fn paint_card_body(&self, card: &CardLayout, ops: &mut Vec<Op>) {
        // Shadow first, card body over it.
        let shadow = RectMm {
            x: card.card.x + 1.5,
            y: card.card.y + 1.5,
            ..card.card
        };
        ops.push(set_fill(Rgb8::new(10, 30, 80)));
        ops.push(fill_polygon(rounded_rect(card, &shadow, CARD_CORNER_RADIUS)));

        ops.push(set_fill(self.style.palette.card_background));
        ops.push(fill_polygon(rounded_rect(card, &card.card, CARD_CORNER_RADIUS)));

        // Hairline border.
        set_outline(ops, Rgb8::new(200, 200, 200), 0.5);
        ops.push(stroke_polygon(rounded_rect(card, &card.card, CARD_CORNER_RADIUS)));
    }

    fn paint_header(&self, card: &CardLayout, ops: &mut Vec<Op>) {
        ops.push(set_fill(self.style.palette.accent));
        ops.push(fill_polygon(rounded_rect(card, &card.header, CARD_CORNER_RADIUS)));

        ops.push(set_fill(Rgb8::new(255, 255, 255)));
        push_text_centered(
            ops,
            card,
            &self.institution_name,
            layout::TITLE_SIZE,
            BuiltinFont::HelveticaBold,
            card.card.center_x(),
            card.title_y,
        );
        push_text_centered(
            ops,
            card,
            &self.card_title,
            layout::SUBTITLE_SIZE,
            BuiltinFont::Helvetica,
            card.card.center_x(),
            card.subtitle_y,
        );
    }

    fn paint_photo(
        &self,
        card: &CardLayout,
        photo: Option<&Photo>,
        doc: &mut PdfDocument,
        ops: &mut Vec<Op>,
    ) {
        // Frame backing (not for the circle — the ring alone frames it).
        match self.style.photo_frame {
            PhotoFrame::Rounded => {
                ops.push(set_fill(Rgb8::new(240, 240, 240)));
                ops.push(fill_polygon(rounded_rect(
                    card,
                    &card.frame_box,
                    PHOTO_FRAME_RADIUS,
                )));
            }
            PhotoFrame::Square => {
                ops.push(set_fill(Rgb8::new(240, 240, 240)));
                ops.push(fill_polygon(rect(card, &card.frame_box)));
            }
            PhotoFrame::Circle => {}
        }

        let embedded = match photo {
            Some(photo) => match embed_photo(doc, photo, &card.photo_box, card.page_h) {
                Ok(op) => {
                    ops.push(op);
                    true
                }
                Err(err) => {
                    warn!(error = %err, "photo embedding failed — using placeholder");
                    false
                }
            },
            None => false,
        };

        if !embedded {
            self.paint_photo_placeholder(card, ops);
        }

        // Border over the photo edge.
        set_outline(ops, self.style.palette.accent, 1.5);
        match self.style.photo_frame {
            PhotoFrame::Rounded => {
                ops.push(stroke_polygon(rounded_rect(
                    card,
                    &card.frame_box,
                    PHOTO_FRAME_RADIUS,
                )));
            }
            PhotoFrame::Square => ops.push(stroke_polygon(rect(card, &card.frame_box))),
            PhotoFrame::Circle => {
                let cx = card.photo_box.center_x();
                let cy_top = card.photo_box.y + card.photo_box.h / 2.0;
                let radius = card.frame_box.w / 2.0;
                ops.push(stroke_polygon(shapes::circle_ring(
                    cx,
                    card.page_h - cy_top,
                    radius,
                )));
            }
        }
    }

    fn paint_photo_placeholder(&self, card: &CardLayout, ops: &mut Vec<Op>) {
        ops.push(set_fill(Rgb8::new(240, 240, 240)));
        ops.push(fill_polygon(rounded_rect(
            card,
            &card.photo_box,
            PHOTO_FRAME_RADIUS,
        )));
        ops.push(set_fill(Rgb8::new(150, 150, 150)));
        push_text_centered(
            ops,
            card,
            "PASSPORT PHOTO",
            layout::PLACEHOLDER_SIZE,
            BuiltinFont::Helvetica,
            card.photo_box.center_x(),
            card.photo_box.y + card.photo_box.h / 2.0,
        );
    }

    fn paint_details(&self, card: &CardLayout, ops: &mut Vec<Op>) {
        // Identifier badge strip.
        ops.push(set_fill(Rgb8::new(245, 245, 245)));
        ops.push(fill_polygon(rounded_rect(card, &card.id_badge, 3.0)));
        ops.push(set_fill(self.style.palette.accent));
        push_text_centered(
            ops,
            card,
            &card.id_line,
            layout::ID_SIZE,
            BuiltinFont::HelveticaBold,
            card.card.center_x(),
            card.id_text_y,
        );

        // Full name, centered and possibly wrapped.
        ops.push(set_fill(Rgb8::new(0, 0, 0)));
        for (i, line) in card.name_lines.iter().enumerate() {
            push_text_centered(
                ops,
                card,
                line,
                layout::NAME_SIZE,
                BuiltinFont::HelveticaBold,
                card.card.center_x(),
                card.name_top + i as f32 * card.name_line_step(),
            );
        }

        // Label column.
        ops.push(set_fill(Rgb8::new(80, 80, 80)));
        for (label, y) in [
            ("Date of Birth:", card.dob_y),
            ("Phone:", card.phone_y),
            ("Address:", card.address_y),
        ] {
            push_text(
                ops,
                card,
                label,
                layout::DETAIL_SIZE,
                BuiltinFont::Helvetica,
                card.labels_x,
                y,
            );
        }

        // Value column.
        ops.push(set_fill(Rgb8::new(0, 0, 0)));
        push_text(
            ops,
            card,
            &card.dob_text,
            layout::DETAIL_SIZE,
            BuiltinFont::HelveticaBold,
            card.values_x,
            card.dob_y,
        );
        push_text(
            ops,
            card,
            &card.phone_text,
            layout::DETAIL_SIZE,
            BuiltinFont::HelveticaBold,
            card.values_x,
            card.phone_y,
        );
        for (i, line) in card.address_lines.iter().enumerate() {
            push_text(
                ops,
                card,
                line,
                layout::DETAIL_SIZE,
                BuiltinFont::HelveticaBold,
                card.values_x,
                card.address_y + i as f32 * card.address_line_step(),
            );
        }
    }

    fn paint_footer(&self, card: &CardLayout, ops: &mut Vec<Op>) {
        // Separator rule.
        set_outline(ops, Rgb8::new(200, 200, 200), 0.3);
        ops.push(Op::DrawLine {
            line: shapes::segment(
                card.rule_x0,
                card.page_h - card.footer_rule_y,
                card.rule_x1,
                card.page_h - card.footer_rule_y,
            ),
        });

        ops.push(set_fill(Rgb8::new(100, 100, 100)));
        push_text(
            ops,
            card,
            &card.issue_line,
            layout::FOOTER_SIZE,
            BuiltinFont::Helvetica,
            card.labels_x,
            card.issue_y,
        );
        push_text(
            ops,
            card,
            &card.valid_line,
            layout::FOOTER_SIZE,
            BuiltinFont::Helvetica,
            card.labels_x,
            card.valid_y,
        );

        // Signature area.
        push_text_right(
            ops,
            card,
            &card.signature_caption,
            layout::FOOTER_SIZE,
            BuiltinFont::Helvetica,
            card.signature_x1,
            card.signature_caption_y,
        );
        set_outline(ops, Rgb8::new(150, 150, 150), 0.3);
        ops.push(Op::DrawLine {
            line: shapes::segment(
                card.signature_x0,
                card.page_h - card.signature_line_y,
                card.signature_x1,
                card.page_h - card.signature_line_y,
            ),
        });

        if let Some(ref note) = card.footer_note {
            ops.push(set_fill(Rgb8::new(100, 100, 100)));
            push_text_centered(
                ops,
                card,
                note,
                layout::FOOTER_SIZE,
                BuiltinFont::Helvetica,
                card.card.center_x(),
                card.footer_note_y,
            );
        }

        // Decorative corner dots along the card's bottom edge.
        ops.push(set_fill(self.style.palette.accent));
        for &(cx, cy_top) in &card.dots {
            ops.push(fill_polygon(shapes::circle_ring(
                cx,
                card.page_h - cy_top,
                layout::DOT_RADIUS,
            )));
        }
    }

    fn paint_watermark(&self, card: &CardLayout, ops: &mut Vec<Op>) {
        let (cx, cy_top) = card.watermark_center;
        let half_width =
            layout::estimate_text_width_mm(&self.style.watermark_text, layout::WATERMARK_SIZE)
                / 2.0;

        ops.push(Op::StartTextSection);
        ops.push(set_fill(Rgb8::new(220, 220, 220)));
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(layout::WATERMARK_SIZE),
            font: BuiltinFont::HelveticaOblique,
        });
        ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::TranslateRotate(
                Mm(cx - half_width).into_pt(),
                Mm(card.page_h - cy_top).into_pt(),
                45.0,
            ),
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(self.style.watermark_text.clone())],
            font: BuiltinFont::HelveticaOblique,
        });
        ops.push(Op::EndTextSection);
    }
}

// -- Op helpers ---------------------------------------------------------------

fn color(rgb: Rgb8) -> Color {
    Color::Rgb(Rgb {
        r: rgb.r as f32 / 255.0,
        g: rgb.g as f32 / 255.0,
        b: rgb.b as f32 / 255.0,
        icc_profile: None,
    })
}

fn set_fill(rgb: Rgb8) -> Op {
    Op::SetFillColor { col: color(rgb) }
}

fn set_outline(ops: &mut Vec<Op>, rgb: Rgb8, thickness_pt: f32) {
    ops.push(Op::SetOutlineColor { col: color(rgb) });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(thickness_pt),
    });
}

fn fill_polygon(ring: PolygonRing) -> Op {
    Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    }
}

fn stroke_polygon(ring: PolygonRing) -> Op {
    Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![ring],
            mode: PaintMode::Stroke,
            winding_order: WindingOrder::NonZero,
        },
    }
}

/// Rectangle ring for a layout rect (top-down mm), flipped to PDF space.
fn rect(card: &CardLayout, r: &RectMm) -> PolygonRing {
    shapes::rect_ring(r.x, card.page_h - r.y - r.h, r.w, r.h)
}

/// Rounded rectangle ring for a layout rect, flipped to PDF space.
fn rounded_rect(card: &CardLayout, r: &RectMm, radius: f32) -> PolygonRing {
    shapes::rounded_rect_ring(r.x, card.page_h - r.y - r.h, r.w, r.h, radius)
}

fn push_text(
    ops: &mut Vec<Op>,
    card: &CardLayout,
    text: &str,
    size_pt: f32,
    font: BuiltinFont,
    x_mm: f32,
    y_top_mm: f32,
) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Mm(x_mm).into_pt(),
            y: Mm(card.page_h - y_top_mm).into_pt(),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size_pt),
        font,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_owned())],
        font,
    });
    ops.push(Op::EndTextSection);
}

fn push_text_centered(
    ops: &mut Vec<Op>,
    card: &CardLayout,
    text: &str,
    size_pt: f32,
    font: BuiltinFont,
    center_x_mm: f32,
    y_top_mm: f32,
) {
    let x = center_x_mm - layout::estimate_text_width_mm(text, size_pt) / 2.0;
    push_text(ops, card, text, size_pt, font, x, y_top_mm);
}

fn push_text_right(
    ops: &mut Vec<Op>,
    card: &CardLayout,
    text: &str,
    size_pt: f32,
    font: BuiltinFont,
    right_x_mm: f32,
    y_top_mm: f32,
) {
    let x = right_x_mm - layout::estimate_text_width_mm(text, size_pt);
    push_text(ops, card, text, size_pt, font, x, y_top_mm);
}

/// Decode the stored photo and produce the op that places it in the photo
/// box, stretched to fill the box exactly.
fn embed_photo(
    doc: &mut PdfDocument,
    photo: &Photo,
    photo_box: &RectMm,
    page_h: f32,
) -> Result<Op> {
    let dynamic = image::load_from_memory(&photo.png).map_err(|err| {
        KartenwerkError::Render(format!("failed to decode photo for embedding: {err}"))
    })?;

    let rgb_image = dynamic.to_rgb8();
    let (img_w, img_h) = rgb_image.dimensions();
    let raw = RawImage {
        pixels: RawImageData::U8(rgb_image.into_raw()),
        width: img_w as usize,
        height: img_h as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let xobject_id = doc.add_image(&raw);

    // Native size at a fixed DPI, then per-axis scale to fill the box.
    let dpi: f32 = 150.0;
    let native_w_pt = img_w as f32 / dpi * 72.0;
    let native_h_pt = img_h as f32 / dpi * 72.0;
    let target_w_pt = Mm(photo_box.w).into_pt().0;
    let target_h_pt = Mm(photo_box.h).into_pt().0;

    Ok(Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Mm(photo_box.x).into_pt()),
            translate_y: Some(Mm(page_h - photo_box.y - photo_box.h).into_pt()),
            scale_x: Some(target_w_pt / native_w_pt),
            scale_y: Some(target_h_pt / native_h_pt),
            dpi: Some(dpi),
            rotate: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb as ImgRgb, RgbImage};
    use kartenwerk_core::types::Palette;

    fn photo(w: u32, h: u32) -> Photo {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, ImgRgb([90, 110, 130])));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        Photo {
            png,
            width: w,
            height: h,
        }
    }

    fn record() -> CardholderRecord {
        CardholderRecord {
            first_name: "Grace".into(),
            middle_name: "Brewster".into(),
            last_name: "Hopper".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1906, 12, 9).unwrap(),
            phone: "5550001234".into(),
            address: "1 Navy Yard, Arlington, Virginia".into(),
            photo: Some(photo(64, 64)),
        }
    }

    fn renderer() -> CardRenderer {
        CardRenderer::new(&AppConfig::default())
    }

    fn issue() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn media_box(bytes: &[u8]) -> (f32, f32) {
        let doc = lopdf::Document::load_mem(bytes).expect("exported card must parse as PDF");
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1, "card must be a single page");
        let (_, page_id) = pages.into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).expect("page dictionary");
        let media = page
            .get(b"MediaBox")
            .expect("page must carry a MediaBox")
            .as_array()
            .expect("MediaBox must be an array");
        (object_to_f32(&media[2]), object_to_f32(&media[3]))
    }

    fn object_to_f32(obj: &lopdf::Object) -> f32 {
        match obj {
            lopdf::Object::Integer(i) => *i as f32,
            lopdf::Object::Real(r) => *r,
            other => panic!("unexpected MediaBox entry: {other:?}"),
        }
    }

    #[test]
    fn renders_single_a6_page() {
        let id = CardId::generate("STU", 2026);
        let bytes = renderer().render(&record(), &id, issue()).unwrap();
        let (w_pt, h_pt) = media_box(&bytes);
        // A6 = 105×148 mm = 297.6×419.5 pt.
        assert!((w_pt - 297.6).abs() < 1.0, "width was {w_pt}pt");
        assert!((h_pt - 419.5).abs() < 1.0, "height was {h_pt}pt");
    }

    #[test]
    fn bad_photo_bytes_fall_back_to_placeholder() {
        let mut rec = record();
        rec.photo = Some(Photo {
            png: b"definitely not a png".to_vec(),
            width: 64,
            height: 64,
        });
        let id = CardId::generate("STU", 2026);
        // Export must still complete.
        let bytes = renderer().render(&rec, &id, issue()).unwrap();
        assert!(!bytes.is_empty());
        media_box(&bytes);
    }

    #[test]
    fn missing_photo_renders_placeholder() {
        let mut rec = record();
        rec.photo = None;
        let id = CardId::generate("STU", 2026);
        let bytes = renderer().render(&rec, &id, issue()).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn page_smaller_than_card_is_render_error() {
        let mut config = AppConfig::default();
        config.page_size = PageSize::Custom {
            width_mm: 50,
            height_mm: 50,
        };
        let renderer = CardRenderer::new(&config);
        let id = CardId::generate("STU", 2026);
        let err = renderer.render(&record(), &id, issue()).unwrap_err();
        assert!(matches!(err, KartenwerkError::Render(_)));
    }

    #[test]
    fn every_photo_frame_variant_renders() {
        for frame in [PhotoFrame::Rounded, PhotoFrame::Square, PhotoFrame::Circle] {
            let mut config = AppConfig::default();
            config.style.photo_frame = frame;
            config.style.palette = Palette::slate();
            let renderer = CardRenderer::new(&config);
            let id = CardId::generate("STU", 2026);
            let bytes = renderer.render(&record(), &id, issue()).unwrap();
            assert!(!bytes.is_empty(), "frame {frame:?} produced no output");
        }
    }

    #[test]
    fn watermark_toggle_changes_output() {
        let id = CardId::generate("STU", 2026);
        let mut config = AppConfig::default();
        config.style.show_watermark = true;
        let with = CardRenderer::new(&config).render(&record(), &id, issue()).unwrap();
        config.style.show_watermark = false;
        let without = CardRenderer::new(&config).render(&record(), &id, issue()).unwrap();
        assert_ne!(with.len(), without.len());
    }

    #[test]
    fn filename_embeds_identifier() {
        let id = CardId::generate("STU", 2026);
        let name = export_filename("University_ID", &id);
        assert_eq!(name, format!("University_ID_{id}.pdf"));
        assert!(name.contains(id.as_str()));
    }

    #[test]
    fn render_to_file_writes_pdf() {
        let dir = std::env::temp_dir().join("kartenwerk-render-test");
        std::fs::create_dir_all(&dir).unwrap();
        let id = CardId::generate("STU", 2026);
        let path = dir.join(export_filename("University_ID", &id));
        renderer()
            .render_to_file(&record(), &id, issue(), &path)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        std::fs::remove_file(&path).ok();
    }
}
