// Copyright (c) 2026 rezky_nightky

use std::fs::File;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

use crate::error::ParasolError;

const DEFAULT_FILTER: &str = "warn";

/// Most verbose level allowed onto stderr while the animation owns the screen.
const SCREEN_MAX_LEVEL: LevelFilter = LevelFilter::Warn;

/// Level actually installed: without a log file, chattier records would be
/// written over the alternate screen, so they are capped at warnings.
fn effective_level(requested: LevelFilter, to_file: bool) -> LevelFilter {
    if to_file {
        requested
    } else {
        requested.min(SCREEN_MAX_LEVEL)
    }
}

/// Installs the global logger. `RUST_LOG` overrides the default `warn` filter;
/// anything chattier than warnings is only kept when `log_file` is given.
pub fn init(log_file: Option<&Path>) -> Result<(), ParasolError> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));

    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| ParasolError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
        builder.target(Target::Pipe(Box::new(file)));
        builder.write_style(env_logger::WriteStyle::Never);
    }

    let logger = builder.build();
    let requested = logger.filter();
    let level = effective_level(requested, log_file.is_some());

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    if level < requested {
        log::warn!(
            "RUST_LOG asks for {} but stderr is capped at {}; pass --log-file to keep them",
            requested,
            level
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_log_file_is_reported() {
        let err = init(Some(Path::new("/nonexistent-dir/parasol.log"))).unwrap_err();
        assert!(matches!(err, ParasolError::LogFile { .. }));
    }

    #[test]
    fn stderr_is_capped_at_warnings() {
        assert_eq!(effective_level(LevelFilter::Trace, false), LevelFilter::Warn);
        assert_eq!(effective_level(LevelFilter::Debug, false), LevelFilter::Warn);
        assert_eq!(effective_level(LevelFilter::Error, false), LevelFilter::Error);
        assert_eq!(effective_level(LevelFilter::Off, false), LevelFilter::Off);
    }

    #[test]
    fn log_file_keeps_requested_level() {
        assert_eq!(effective_level(LevelFilter::Trace, true), LevelFilter::Trace);
        assert_eq!(effective_level(LevelFilter::Warn, true), LevelFilter::Warn);
    }
}
