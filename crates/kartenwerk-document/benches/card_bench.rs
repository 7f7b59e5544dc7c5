// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the card rendering pipeline in the
// kartenwerk-document crate.

use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use kartenwerk_core::AppConfig;
use kartenwerk_core::types::{CardholderRecord, CardId, Photo};
use kartenwerk_document::CardRenderer;

fn synthetic_photo(w: u32, h: u32) -> Photo {
    // A gradient, so the PNG is neither trivially small nor pathological.
    let img = RgbImage::from_fn(w, h, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .expect("png encode");
    Photo {
        png,
        width: w,
        height: h,
    }
}

/// Benchmark a full card render with a 640x480 photo — the typical size
/// of a camera capture after intake normalization.
fn bench_render_card(c: &mut Criterion) {
    let record = CardholderRecord {
        first_name: "Grace".into(),
        middle_name: "Brewster".into(),
        last_name: "Hopper".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1906, 12, 9).expect("date"),
        phone: "5550001234".into(),
        address: "1 Navy Yard, Arlington, Virginia".into(),
        photo: Some(synthetic_photo(640, 480)),
    };
    let card_id = CardId::generate("STU", 2026);
    let issue = NaiveDate::from_ymd_opt(2026, 8, 7).expect("date");
    let renderer = CardRenderer::new(&AppConfig::default());

    c.bench_function("render_card (640x480 photo)", |b| {
        b.iter(|| {
            let bytes = renderer
                .render(black_box(&record), black_box(&card_id), issue)
                .expect("render");
            black_box(bytes);
        });
    });
}

criterion_group!(benches, bench_render_card);
criterion_main!(benches);
