// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::config::DropColor;
use crate::runtime::ColorMode;

pub const SHADE_LEVELS: usize = 16;

/// Drop color blended over black at `SHADE_LEVELS` evenly spaced opacities,
/// already converted to what the terminal can show.
#[derive(Clone, Debug)]
pub struct Palette {
    pub shades: Vec<Color>,
    pub bg: Option<Color>,
}

fn dist2(a: (u8, u8, u8), b: (u8, u8, u8)) -> i32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    dr * dr + dg * dg + db * db
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let to6 = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (to6(r), to6(g), to6(b));
    let cube = (
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray) = if avg < 8 {
        (16, (0, 0, 0))
    } else if avg > 238 {
        (231, (255, 255, 255))
    } else {
        let step = (avg - 8) / 10;
        let v = 8 + 10 * step;
        (232 + step, (v, v, v))
    };

    if dist2((r, g, b), gray) < dist2((r, g, b), cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(rgb: (u8, u8, u8)) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, ref_rgb)| dist2(rgb, *ref_rgb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}

fn to_terminal(mode: ColorMode, (r, g, b): (u8, u8, u8)) -> Color {
    match mode {
        ColorMode::Mono => Color::White,
        ColorMode::TrueColor => Color::Rgb { r, g, b },
        ColorMode::Color256 => Color::AnsiValue(rgb_to_ansi256(r, g, b)),
        ColorMode::Color16 => rgb_to_color16((r, g, b)),
    }
}

fn scale_u8(v: u8, t: f32) -> u8 {
    (v as f32 * t).round().clamp(0.0, 255.0) as u8
}

/// Opacity of a drop in `0.0..=1.0`: faster drops are closer and brighter.
pub fn drop_opacity(color: DropColor, speed: f64) -> f32 {
    ((color.base_alpha as f64 * speed / 5.0) / 255.0).clamp(0.0, 1.0) as f32
}

pub fn build_palette(color: DropColor, mode: ColorMode, default_background: bool) -> Palette {
    let bg = if default_background {
        None
    } else {
        Some(match mode {
            ColorMode::Color16 => Color::Black,
            ColorMode::TrueColor => Color::Rgb { r: 0, g: 0, b: 0 },
            _ => Color::AnsiValue(16),
        })
    };

    let shades = (1..=SHADE_LEVELS)
        .map(|level| {
            let t = level as f32 / SHADE_LEVELS as f32;
            let rgb = (
                scale_u8(color.r, t),
                scale_u8(color.g, t),
                scale_u8(color.b, t),
            );
            to_terminal(mode, rgb)
        })
        .collect();

    Palette { shades, bg }
}

impl Palette {
    /// Shade for `opacity`, or `None` when the drop would be invisible.
    pub fn shade(&self, opacity: f32) -> Option<Color> {
        let level = (opacity.clamp(0.0, 1.0) * self.shades.len() as f32).round() as usize;
        if level == 0 {
            return None;
        }
        self.shades.get(level - 1).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truecolor_ramp_ends_at_full_color() {
        let color = DropColor {
            r: 200,
            g: 100,
            b: 50,
            base_alpha: 255,
        };
        let p = build_palette(color, ColorMode::TrueColor, false);
        assert_eq!(p.shades.len(), SHADE_LEVELS);
        assert_eq!(
            p.shade(1.0),
            Some(Color::Rgb {
                r: 200,
                g: 100,
                b: 50
            })
        );
        assert_eq!(p.bg, Some(Color::Rgb { r: 0, g: 0, b: 0 }));
    }

    #[test]
    fn zero_opacity_is_invisible() {
        let p = build_palette(DropColor::default(), ColorMode::Color256, true);
        assert_eq!(p.shade(0.0), None);
        assert!(p.bg.is_none());
    }

    #[test]
    fn opacity_scales_with_speed() {
        let c = DropColor {
            base_alpha: 51,
            ..DropColor::default()
        };
        assert!((drop_opacity(c, 5.0) - 0.2).abs() < 1e-6);
        assert!(drop_opacity(c, 1.0) < drop_opacity(c, 6.0));
        assert_eq!(drop_opacity(DropColor::default(), 100.0), 1.0);
    }

    #[test]
    fn ansi256_maps_extremes() {
        assert_eq!(rgb_to_ansi256(0, 0, 0), 16);
        assert_eq!(rgb_to_ansi256(255, 255, 255), 231);
        assert_eq!(rgb_to_ansi256(255, 0, 0), 196);
    }

    #[test]
    fn color16_picks_nearest() {
        assert_eq!(rgb_to_color16((250, 250, 250)), Color::White);
        assert_eq!(rgb_to_color16((10, 10, 120)), Color::DarkBlue);
    }

    #[test]
    fn mono_is_all_white() {
        let p = build_palette(DropColor::default(), ColorMode::Mono, false);
        assert!(p.shades.iter().all(|c| *c == Color::White));
    }
}
