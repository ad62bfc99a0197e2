// Copyright (c) 2026 rezky_nightky

use rand::Rng;

pub const MIN_SPEED: f64 = 1.0;
pub const MAX_SPEED: f64 = 6.0;
pub const MAX_SEED: f64 = 1000.0;

/// One rain particle.
///
/// `x`, `speed` and `seed` are fixed when the drop is created. Only `y` moves,
/// and only through [`crate::motion::advance_drops`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Raindrop {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub seed: f64,
}

impl Raindrop {
    pub fn new(x: f64, y: f64, speed: f64, seed: f64) -> Self {
        Self { x, y, speed, seed }
    }
}

fn sample_span<R: Rng + ?Sized>(rng: &mut R, upper: f64) -> f64 {
    if upper > 0.0 && upper.is_finite() {
        rng.random_range(0.0..upper)
    } else {
        0.0
    }
}

/// Scatters `count` drops uniformly over a `width` x `height` viewport.
pub fn init_drops<R: Rng + ?Sized>(
    count: usize,
    width: f64,
    height: f64,
    rng: &mut R,
) -> Vec<Raindrop> {
    (0..count)
        .map(|_| {
            let x = sample_span(rng, width);
            let y = sample_span(rng, height);
            let speed = rng.random_range(MIN_SPEED..MAX_SPEED);
            let seed = rng.random_range(0.0..MAX_SEED);
            Raindrop::new(x, y, speed, seed)
        })
        .collect()
}
