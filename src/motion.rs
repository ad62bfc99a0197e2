// Copyright (c) 2026 rezky_nightky

use crate::config::RainConfig;
use crate::raindrop::Raindrop;

/// Moves every drop down by its own speed and recycles the ones that left the
/// viewport: past the bottom they restart at the top, above the top (negative
/// multipliers) they restart at the bottom.
pub fn advance_drops(drops: &mut [Raindrop], cfg: &RainConfig, viewport_height: f64) {
    let multiplier = cfg.global_speed_multiplier;
    for d in drops.iter_mut() {
        d.y += d.speed * multiplier;
        if d.y > viewport_height {
            d.y = 0.0;
        }
        if d.y < -cfg.drop_length {
            d.y = viewport_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still() -> RainConfig {
        RainConfig {
            global_speed_multiplier: 0.0,
            ..RainConfig::default()
        }
    }

    #[test]
    fn drops_fall_by_speed_times_multiplier() {
        let cfg = RainConfig::default();
        let mut drops = vec![Raindrop::new(3.0, 10.0, 2.0, 9.0)];
        advance_drops(&mut drops, &cfg, 400.0);
        assert_eq!(drops[0], Raindrop::new(3.0, 20.0, 2.0, 9.0));
    }

    #[test]
    fn below_viewport_wraps_to_top() {
        let mut drops = vec![Raindrop::new(0.0, 401.0, 3.0, 0.0)];
        advance_drops(&mut drops, &still(), 400.0);
        assert_eq!(drops[0].y, 0.0);
    }

    #[test]
    fn above_viewport_wraps_to_bottom() {
        let cfg = still();
        let mut drops = vec![Raindrop::new(0.0, -cfg.drop_length - 1.0, 3.0, 0.0)];
        advance_drops(&mut drops, &cfg, 400.0);
        assert_eq!(drops[0].y, 400.0);
    }

    #[test]
    fn negative_multiplier_rises_and_wraps() {
        let cfg = RainConfig {
            global_speed_multiplier: -10.0,
            ..RainConfig::default()
        };
        let mut drops = vec![Raindrop::new(0.0, -25.0, 1.0, 0.0)];
        advance_drops(&mut drops, &cfg, 300.0);
        assert_eq!(drops[0].y, 300.0);
    }

    #[test]
    fn edge_of_viewport_is_kept() {
        let mut drops = vec![
            Raindrop::new(0.0, 400.0, 1.0, 0.0),
            Raindrop::new(0.0, -30.0, 1.0, 0.0),
        ];
        advance_drops(&mut drops, &still(), 400.0);
        assert_eq!(drops[0].y, 400.0);
        assert_eq!(drops[1].y, -30.0);
    }

    #[test]
    fn positions_stay_in_bounds_over_many_frames() {
        let cfg = RainConfig::default();
        let mut drops: Vec<Raindrop> = (0..50)
            .map(|i| Raindrop::new(i as f64, i as f64 * 7.0, 1.0 + (i % 5) as f64, 0.0))
            .collect();
        for _ in 0..500 {
            advance_drops(&mut drops, &cfg, 240.0);
            assert!(drops
                .iter()
                .all(|d| d.y >= -cfg.drop_length && d.y <= 240.0));
        }
    }
}
