// Copyright (c) 2026 rezky_nightky

//! Streak geometry for a single drop.
//!
//! A drop far from the pointer falls as a straight two-point segment. Near the
//! pointer its streak is sampled every `interaction_step_divider` pixels: points
//! inside the interaction circle slide out along the circle's edge, points below
//! the pointer are pushed out of the umbrella shadow, and the whole streak is
//! then slanted by the wind.

use crate::config::RainConfig;
use crate::raindrop::Raindrop;

/// Upper bound on samples per curved streak, so a tiny step cannot stall a frame.
pub const MAX_PATH_POINTS: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Pointer position in viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn as_point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Rounds halves towards positive infinity (`-2.5 -> -2`, `2.5 -> 3`).
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Per-drop horizontal jitter in whole pixels, in `-4..=4`.
pub fn noise(seed: f64) -> f64 {
    round_half_up(seed.cos() * 4.0)
}

/// Moves `x` out of the dry band under the pointer, keeping it on its side.
pub fn umbrella_deflect(x: f64, pointer_x: f64, seed: f64, cfg: &RainConfig) -> f64 {
    if !cfg.umbrella_enabled {
        return x;
    }

    let shadow = cfg.shadow_radius();
    if (x - pointer_x).abs() >= shadow {
        return x;
    }

    if x > pointer_x {
        pointer_x + shadow + noise(seed)
    } else {
        pointer_x - shadow - noise(seed)
    }
}

/// Horizontal distance from the pointer to the interaction circle at vertical
/// offset `dy`. Offsets beyond the radius clamp to zero instead of NaN.
fn arc_offset(dy: f64, radius: f64) -> f64 {
    let dy = dy.floor();
    (radius * radius - dy * dy).max(0.0).sqrt().floor()
}

fn apply_wind(points: &mut [Point], wind_speed: f64) {
    let n = points.len() as f64;
    for (i, p) in points.iter_mut().enumerate() {
        p.x += (i as f64 / n) * wind_speed;
    }
}

fn curved_point(
    x0: f64,
    current_y: f64,
    drop: &Raindrop,
    pointer: Pointer,
    cfg: &RainConfig,
) -> Point {
    let here = Point::new(x0, current_y);

    if here.distance(pointer.as_point()) > cfg.interaction_radius {
        if current_y < pointer.y {
            return here;
        }
        return Point::new(umbrella_deflect(x0, pointer.x, drop.seed, cfg), current_y);
    }

    let dx = arc_offset(round_half_up(current_y) - pointer.y, cfg.interaction_radius);
    let mut x = if x0 > pointer.x {
        pointer.x + dx + noise(drop.seed)
    } else {
        pointer.x - dx - noise(drop.seed)
    };
    if current_y > pointer.y {
        x = umbrella_deflect(x, pointer.x, drop.seed, cfg);
    }
    Point::new(x, current_y)
}

fn sample_curve(
    start: Point,
    end: Point,
    drop: &Raindrop,
    pointer: Pointer,
    cfg: &RainConfig,
) -> Option<Vec<Point>> {
    let span = end.y - start.y;
    let divider = cfg.interaction_step_divider;
    if !(span > 0.0) || !(divider > 0.0) || !(cfg.interaction_radius > 0.0) {
        return None;
    }

    let steps = span / divider;
    let mut step = span / steps;
    if !(step > 0.0) || !step.is_finite() {
        return None;
    }
    if span / step > MAX_PATH_POINTS as f64 {
        step = span / MAX_PATH_POINTS as f64;
    }

    let mut points = Vec::with_capacity((span / step).ceil() as usize);
    let mut i = 0usize;
    loop {
        let current_y = start.y + i as f64 * step;
        if current_y >= end.y || points.len() >= MAX_PATH_POINTS {
            break;
        }
        points.push(curved_point(start.x, current_y, drop, pointer, cfg));
        i += 1;
    }

    (points.len() >= 2).then_some(points)
}

/// Computes the streak for `drop` this frame.
///
/// Always returns at least two points, ordered top to bottom. The drop itself is
/// not touched.
pub fn drop_path(drop: &Raindrop, pointer: Pointer, cfg: &RainConfig) -> Vec<Point> {
    let length = cfg.drop_length;
    let start = Point::new(drop.x, drop.y);
    let end = Point::new(drop.x, drop.y + length + length * 0.5 * drop.speed);

    let mut points = if (drop.x - pointer.x).abs() > cfg.interaction_radius {
        vec![start, end]
    } else {
        sample_curve(start, end, drop, pointer, cfg).unwrap_or_else(|| vec![start, end])
    };

    apply_wind(&mut points, cfg.wind_speed);
    points
}
