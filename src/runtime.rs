// Copyright (c) 2026 rezky_nightky

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

impl ColorMode {
    pub fn from_depth(depth: u16) -> Result<Self, ConfigError> {
        match depth {
            0 => Ok(Self::Mono),
            16 => Ok(Self::Color16),
            8 | 256 => Ok(Self::Color256),
            24 | 32 => Ok(Self::TrueColor),
            other => Err(ConfigError::ColorMode(other)),
        }
    }

    /// Guesses terminal color depth from `COLORTERM` and `TERM` values.
    pub fn detect(colorterm: &str, term: &str) -> Self {
        let colorterm = colorterm.to_ascii_lowercase();
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return Self::TrueColor;
        }

        let term = term.to_ascii_lowercase();
        if term == "dumb" {
            return Self::Mono;
        }
        if term.contains("256color") {
            return Self::Color256;
        }
        if term.starts_with("linux") || term.starts_with("vt") {
            return Self::Color16;
        }

        Self::Color256
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TrueColor => "24-bit truecolor",
            Self::Color256 => "8-bit (256-color)",
            Self::Color16 => "16-color",
            Self::Mono => "mono",
        }
    }
}
