// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::error::ConfigError;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  parasol --drops 300 --length 30 --speed 5 --radius 100 --step 10 --shadow 0.8 --wind -10 --color 220,220,255,160 --cell-size 8,16 --fps 60";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_usage(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.ends_with(':') && line == line.to_ascii_uppercase() {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("  parasol") {
            out.push_str("  \x1b[1;34mparasol\x1b[0m");
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_usage(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
    #[value(name = "transparent")]
    Transparent,
}

/// Drop stroke color. `base_alpha` is scaled by each drop's speed when shaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub base_alpha: u8,
}

impl Default for DropColor {
    fn default() -> Self {
        Self {
            r: 220,
            g: 220,
            b: 255,
            base_alpha: 160,
        }
    }
}

impl FromStr for DropColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ConfigError::Color(s.to_string());
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| bad())?;
        match parts.as_slice() {
            &[r, g, b] => Ok(Self {
                r,
                g,
                b,
                ..Self::default()
            }),
            &[r, g, b, base_alpha] => Ok(Self {
                r,
                g,
                b,
                base_alpha,
            }),
            _ => Err(bad()),
        }
    }
}

/// How many virtual pixels one terminal cell covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSize {
    pub width: u16,
    pub height: u16,
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 8,
            height: 16,
        }
    }
}

impl FromStr for CellSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ConfigError::CellSize(s.to_string());
        let (a, b) = s.split_once(',').ok_or_else(bad)?;
        let width: u16 = a.trim().parse().map_err(|_| bad())?;
        let height: u16 = b.trim().parse().map_err(|_| bad())?;
        if width == 0 || height == 0 {
            return Err(bad());
        }
        Ok(Self { width, height })
    }
}

/// Simulation parameters shared by the path generator and the motion updater.
///
/// Values are trusted: degenerate ones (zero radius, zero step) make the path
/// generator fall back to straight streaks instead of failing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainConfig {
    pub drop_count: usize,
    pub drop_length: f64,
    pub global_speed_multiplier: f64,
    pub interaction_radius: f64,
    pub interaction_step_divider: f64,
    pub umbrella_enabled: bool,
    pub umbrella_shadow_fraction: f64,
    pub wind_speed: f64,
    pub drop_color: DropColor,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            drop_count: 300,
            drop_length: 30.0,
            global_speed_multiplier: 5.0,
            interaction_radius: 100.0,
            interaction_step_divider: 10.0,
            umbrella_enabled: true,
            umbrella_shadow_fraction: 0.8,
            wind_speed: -10.0,
            drop_color: DropColor::default(),
        }
    }
}

fn require_finite(flag: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { flag, value })
    }
}

impl RainConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        Ok(Self {
            drop_count: args.drops,
            drop_length: require_finite("--length", args.length)?,
            global_speed_multiplier: require_finite("--speed", args.speed)?,
            interaction_radius: require_finite("--radius", args.radius)?,
            interaction_step_divider: require_finite("--step", args.step)?,
            umbrella_enabled: !args.no_umbrella,
            umbrella_shadow_fraction: require_finite("--shadow", args.shadow)?,
            wind_speed: require_finite("--wind", args.wind)?,
            drop_color: args.color,
        })
    }

    /// Radius of the band under the pointer that no drop may enter.
    pub fn shadow_radius(&self) -> f64 {
        self.umbrella_shadow_fraction * self.interaction_radius
    }

    pub fn with_umbrella(self, umbrella_enabled: bool) -> Self {
        Self {
            umbrella_enabled,
            ..self
        }
    }

    pub fn with_wind_speed(self, wind_speed: f64) -> Self {
        Self { wind_speed, ..self }
    }

    pub fn with_speed_multiplier(self, global_speed_multiplier: f64) -> Self {
        Self {
            global_speed_multiplier,
            ..self
        }
    }

    pub fn with_interaction_radius(self, interaction_radius: f64) -> Self {
        Self {
            interaction_radius,
            ..self
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "parasol", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'n',
        long = "drops",
        default_value_t = 300,
        help_heading = "RAIN",
        help = "Number of drops"
    )]
    pub drops: usize,

    #[arg(
        short = 'L',
        long = "length",
        default_value_t = 30.0,
        allow_negative_numbers = true,
        help_heading = "RAIN",
        help = "Base drop length in pixels (faster drops render longer)"
    )]
    pub length: f64,

    #[arg(
        short = 'S',
        long = "speed",
        default_value_t = 5.0,
        allow_negative_numbers = true,
        help_heading = "RAIN",
        help = "Global fall speed multiplier"
    )]
    pub speed: f64,

    #[arg(
        short = 'w',
        long = "wind",
        default_value_t = -10.0,
        allow_negative_numbers = true,
        help_heading = "RAIN",
        help = "Wind drift in pixels at the tail of a drop (negative blows left)"
    )]
    pub wind: f64,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "220,220,255,160",
        help_heading = "APPEARANCE",
        help = "Drop color R,G,B[,ALPHA]; alpha is scaled by drop speed"
    )]
    pub color: DropColor,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "cell-size",
        default_value = "8,16",
        help_heading = "APPEARANCE",
        help = "Virtual pixels covered by one terminal cell: WIDTH,HEIGHT"
    )]
    pub cell_size: CellSize,

    #[arg(
        short = 'r',
        long = "radius",
        default_value_t = 100.0,
        allow_negative_numbers = true,
        help_heading = "UMBRELLA",
        help = "Radius around the pointer where drops start to curve"
    )]
    pub radius: f64,

    #[arg(
        long = "step",
        default_value_t = 10.0,
        allow_negative_numbers = true,
        help_heading = "UMBRELLA",
        help = "Vertical sampling step for curving drops (smaller is smoother)"
    )]
    pub step: f64,

    #[arg(
        long = "shadow",
        default_value_t = 0.8,
        allow_negative_numbers = true,
        help_heading = "UMBRELLA",
        help = "Fraction of the radius kept dry under the pointer"
    )]
    pub shadow: f64,

    #[arg(
        long = "no-umbrella",
        help_heading = "UMBRELLA",
        help = "Disable the dry shadow under the pointer"
    )]
    pub no_umbrella: bool,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "GENERAL",
        help = "Target frames per second"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        allow_negative_numbers = true,
        help_heading = "GENERAL",
        help = "Stop after N seconds, 0.1 to 86400 (<=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed for a reproducible drop layout"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write log records here (RUST_LOG filter); stderr only gets warnings"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}
