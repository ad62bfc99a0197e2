// Copyright (c) 2026 rezky_nightky

//! Turns streaks (lists of viewport pixels) into terminal glyphs.
//!
//! Two-point streaks are drawn as a single segment. Longer ones go through a
//! Catmull-Rom spline whose first and last control points are repeated, so
//! the curve passes through every point of the streak.

use crossterm::style::Color;

use crate::config::CellSize;
use crate::frame::Frame;
use crate::path::{Point, Pointer};

const CURVE_SAMPLES_PER_SEGMENT: usize = 4;
const MAX_SEGMENT_STEPS: usize = 1024;

/// Terminal grid plus the pixel size of each cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub cell: CellSize,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, cell: CellSize) -> Self {
        Self { cols, rows, cell }
    }

    pub fn width_px(&self) -> f64 {
        self.cols as f64 * self.cell.width as f64
    }

    pub fn height_px(&self) -> f64 {
        self.rows as f64 * self.cell.height as f64
    }

    /// Pointer at the centre of a terminal cell.
    pub fn pointer_at(&self, col: u16, row: u16) -> Pointer {
        let cw = self.cell.width as f64;
        let ch = self.cell.height as f64;
        Pointer::new(col as f64 * cw + cw / 2.0, row as f64 * ch + ch / 2.0)
    }

    fn to_cell_space(&self, p: Point) -> (f64, f64) {
        (p.x / self.cell.width as f64, p.y / self.cell.height as f64)
    }
}

fn catmull_rom(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let axis = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point::new(axis(p0.x, p1.x, p2.x, p3.x), axis(p0.y, p1.y, p2.y, p3.y))
}

/// Polyline approximating the streak as it should appear on screen.
pub fn streak_outline(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];
    let mut anchors = Vec::with_capacity(points.len() + 2);
    anchors.push(first);
    anchors.extend_from_slice(points);
    anchors.push(last);

    let mut out = Vec::with_capacity((points.len() - 1) * CURVE_SAMPLES_PER_SEGMENT + 1);
    for w in anchors.windows(4) {
        for s in 0..CURVE_SAMPLES_PER_SEGMENT {
            let t = s as f64 / CURVE_SAMPLES_PER_SEGMENT as f64;
            out.push(catmull_rom(w[0], w[1], w[2], w[3], t));
        }
    }
    out.push(last);
    out
}

/// Glyph for a segment moving `dx` columns and `dy` rows.
pub fn glyph_for(dx: f64, dy: f64) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax <= ay * 0.5 {
        '|'
    } else if ay <= ax * 0.5 {
        '-'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

fn draw_segment(
    frame: &mut Frame,
    viewport: &Viewport,
    a: Point,
    b: Point,
    fg: Color,
    opacity: f32,
) -> usize {
    let (ax, ay) = viewport.to_cell_space(a);
    let (bx, by) = viewport.to_cell_space(b);
    if ![ax, ay, bx, by].iter().all(|v| v.is_finite()) {
        return 0;
    }

    let (dx, dy) = (bx - ax, by - ay);
    let ch = glyph_for(dx, dy);
    let steps = ((dx.abs().max(dy.abs()) * 2.0).ceil() as usize).clamp(1, MAX_SEGMENT_STEPS);

    let mut plotted = 0;
    for k in 0..=steps {
        let t = k as f64 / steps as f64;
        let x = (ax + dx * t).floor() as i64;
        let y = (ay + dy * t).floor() as i64;
        if frame.plot(x, y, ch, fg, opacity) {
            plotted += 1;
        }
    }
    plotted
}

/// Draws one streak and returns the number of cells it lit.
pub fn draw_streak(
    frame: &mut Frame,
    viewport: &Viewport,
    points: &[Point],
    fg: Color,
    opacity: f32,
) -> usize {
    let outline = streak_outline(points);
    outline
        .windows(2)
        .map(|seg| draw_segment(frame, viewport, seg[0], seg[1], fg, opacity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp() -> Viewport {
        Viewport::new(10, 10, CellSize { width: 8, height: 16 })
    }

    #[test]
    fn viewport_measures_in_pixels() {
        let v = vp();
        assert_eq!(v.width_px(), 80.0);
        assert_eq!(v.height_px(), 160.0);
        assert_eq!(v.pointer_at(2, 3), Pointer::new(20.0, 56.0));
    }

    #[test]
    fn outline_passes_through_every_point() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(15.0, 20.0),
            Point::new(15.0, 30.0),
        ];
        let outline = streak_outline(&pts);
        assert_eq!(outline.len(), 3 * CURVE_SAMPLES_PER_SEGMENT + 1);
        for p in &pts {
            assert!(outline
                .iter()
                .any(|q| (q.x - p.x).abs() < 1e-9 && (q.y - p.y).abs() < 1e-9));
        }
    }

    #[test]
    fn two_point_outline_is_unchanged() {
        let pts = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        assert_eq!(streak_outline(&pts), pts);
    }

    #[test]
    fn glyphs_follow_slope() {
        assert_eq!(glyph_for(0.0, 3.0), '|');
        assert_eq!(glyph_for(2.0, 2.0), '\\');
        assert_eq!(glyph_for(-2.0, 2.0), '/');
        assert_eq!(glyph_for(5.0, 0.5), '-');
    }

    #[test]
    fn vertical_streak_lights_a_column() {
        let mut f = Frame::new(10, 10, None);
        let pts = [Point::new(20.0, 0.0), Point::new(20.0, 47.0)];
        let lit = draw_streak(&mut f, &vp(), &pts, Color::White, 1.0);
        assert!(lit >= 3);
        for row in 0..3 {
            assert_eq!(f.get(2, row).unwrap().ch, '|');
        }
        assert_eq!(f.get(3, 0).unwrap().ch, ' ');
    }

    #[test]
    fn non_finite_points_draw_nothing() {
        let mut f = Frame::new(10, 10, None);
        let pts = [Point::new(f64::NAN, 0.0), Point::new(20.0, 47.0)];
        assert_eq!(draw_streak(&mut f, &vp(), &pts, Color::White, 1.0), 0);
    }

    #[test]
    fn streak_outside_grid_is_clipped() {
        let mut f = Frame::new(10, 10, None);
        let pts = [Point::new(-500.0, 0.0), Point::new(-500.0, 40.0)];
        assert_eq!(draw_streak(&mut f, &vp(), &pts, Color::White, 1.0), 0);
        assert_eq!(f.lit_count(), 0);
    }
}
