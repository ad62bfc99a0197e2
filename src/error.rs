// Copyright (c) 2026 rezky_nightky

use std::path::PathBuf;

use thiserror::Error;

/// Rejections raised while turning command line flags into a [`crate::config::RainConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("failed to apply {flag} {value} (must be a finite number)")]
    NonFinite { flag: &'static str, value: f64 },

    #[error("failed to apply {flag} {value} (min {min} max {max})")]
    OutOfRange {
        flag: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid color {0:?} (expected: R,G,B or R,G,B,ALPHA with each 0-255)")]
    Color(String),

    #[error("invalid cell size {0:?} (expected: WIDTH,HEIGHT with each >0)")]
    CellSize(String),

    #[error("invalid --colormode: {0} (allowed: 0,16,8/256,24/32)")]
    ColorMode(u16),
}

#[derive(Error, Debug)]
pub enum ParasolError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_name_the_offending_flag() {
        let e = ConfigError::NonFinite {
            flag: "--wind",
            value: f64::NAN,
        };
        assert_eq!(
            e.to_string(),
            "failed to apply --wind NaN (must be a finite number)"
        );
    }

    #[test]
    fn config_error_passes_through_transparently() {
        let e: ParasolError = ConfigError::ColorMode(7).into();
        assert_eq!(e.to_string(), "invalid --colormode: 7 (allowed: 0,16,8/256,24/32)");
    }
}
