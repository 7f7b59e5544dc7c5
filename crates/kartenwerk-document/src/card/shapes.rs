// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Vector shape helpers for the card renderer.
//
// printpdf 0.8 paths are point lists where `bezier: true` marks a cubic
// control point. All helpers take millimetre coordinates in PDF space
// (origin bottom-left) and produce closed rings.

use printpdf::{Line, LinePoint, Mm, Point, PolygonRing};

/// Cubic-arc circle approximation constant.
const KAPPA: f32 = 0.552_284_8;

fn point_mm(x: f32, y: f32) -> Point {
    Point {
        x: Mm(x).into_pt(),
        y: Mm(y).into_pt(),
    }
}

fn on_curve(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: point_mm(x, y),
        bezier: false,
    }
}

fn control(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: point_mm(x, y),
        bezier: true,
    }
}

/// Plain rectangle with bottom-left corner at (x, y).
pub(crate) fn rect_ring(x: f32, y: f32, w: f32, h: f32) -> PolygonRing {
    PolygonRing {
        points: vec![
            on_curve(x, y),
            on_curve(x + w, y),
            on_curve(x + w, y + h),
            on_curve(x, y + h),
        ],
    }
}

/// Rectangle with circular corner arcs of radius `r`.
///
/// The radius is clamped so opposing corners never overlap.
pub(crate) fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> PolygonRing {
    let r = r.min(w / 2.0).min(h / 2.0);
    let k = KAPPA * r;

    PolygonRing {
        points: vec![
            // bottom edge, left to right
            on_curve(x + r, y),
            on_curve(x + w - r, y),
            // bottom-right corner
            control(x + w - r + k, y),
            control(x + w, y + r - k),
            on_curve(x + w, y + r),
            // right edge
            on_curve(x + w, y + h - r),
            // top-right corner
            control(x + w, y + h - r + k),
            control(x + w - r + k, y + h),
            on_curve(x + w - r, y + h),
            // top edge
            on_curve(x + r, y + h),
            // top-left corner
            control(x + r - k, y + h),
            control(x, y + h - r + k),
            on_curve(x, y + h - r),
            // left edge
            on_curve(x, y + r),
            // bottom-left corner
            control(x, y + r - k),
            control(x + r - k, y),
        ],
    }
}

/// Circle of radius `r` centred at (cx, cy), as four cubic arcs.
pub(crate) fn circle_ring(cx: f32, cy: f32, r: f32) -> PolygonRing {
    let k = KAPPA * r;

    PolygonRing {
        points: vec![
            on_curve(cx + r, cy),
            control(cx + r, cy + k),
            control(cx + k, cy + r),
            on_curve(cx, cy + r),
            control(cx - k, cy + r),
            control(cx - r, cy + k),
            on_curve(cx - r, cy),
            control(cx - r, cy - k),
            control(cx - k, cy - r),
            on_curve(cx, cy - r),
            control(cx + k, cy - r),
            control(cx + r, cy - k),
        ],
    }
}

/// Open straight line segment between two points.
pub(crate) fn segment(x0: f32, y0: f32, x1: f32, y1: f32) -> Line {
    Line {
        points: vec![on_curve(x0, y0), on_curve(x1, y1)],
        is_closed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt_to_mm(p: &Point) -> (f32, f32) {
        (p.x.0 / 2.834_646, p.y.0 / 2.834_646)
    }

    #[test]
    fn rect_has_four_plain_corners() {
        let ring = rect_ring(10.0, 20.0, 30.0, 40.0);
        assert_eq!(ring.points.len(), 4);
        assert!(ring.points.iter().all(|p| !p.bezier));
    }

    #[test]
    fn rounded_rect_mixes_curve_and_control_points() {
        let ring = rounded_rect_ring(0.0, 0.0, 90.0, 115.0, 8.0);
        assert_eq!(ring.points.len(), 16);
        assert_eq!(ring.points.iter().filter(|p| p.bezier).count(), 8);
    }

    #[test]
    fn rounded_rect_clamps_radius() {
        // A radius larger than half the short edge must not produce points
        // outside the rectangle.
        let ring = rounded_rect_ring(0.0, 0.0, 10.0, 10.0, 50.0);
        for lp in &ring.points {
            let (x, y) = pt_to_mm(&lp.p);
            assert!((-0.01..=10.01).contains(&x), "x out of bounds: {x}");
            assert!((-0.01..=10.01).contains(&y), "y out of bounds: {y}");
        }
    }

    #[test]
    fn circle_has_four_arcs() {
        let ring = circle_ring(50.0, 50.0, 17.0);
        assert_eq!(ring.points.len(), 12);
        assert_eq!(ring.points.iter().filter(|p| p.bezier).count(), 8);
    }

    #[test]
    fn circle_points_stay_on_bounding_box() {
        let ring = circle_ring(0.0, 0.0, 10.0);
        for lp in &ring.points {
            let (x, y) = pt_to_mm(&lp.p);
            assert!(x.abs() <= 10.01 && y.abs() <= 10.01);
        }
    }

    #[test]
    fn segment_is_open() {
        let line = segment(0.0, 0.0, 10.0, 0.0);
        assert_eq!(line.points.len(), 2);
        assert!(!line.is_closed);
    }
}
