// Copyright (c) 2026 rezky_nightky

mod cell;
mod config;
mod error;
mod frame;
mod logging;
mod motion;
mod palette;
mod path;
mod raindrop;
mod render;
mod runtime;
mod storm;
mod terminal;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use log::{debug, info, trace, warn};
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{color_enabled_stdout, default_params_usage_for_help, Args, ColorBg, RainConfig};
use crate::error::{ConfigError, ParasolError};
use crate::frame::Frame;
use crate::render::Viewport;
use crate::runtime::ColorMode;
use crate::storm::Storm;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

const KEYS_HELP: &str = "KEYS:
  q, Esc        quit
  space         scatter a fresh set of drops
  p             pause / resume
  u             toggle the umbrella
  Left, Right   wind -1 / +1
  Up, Down      fall speed +1 / -1
  +, -          interaction radius +10 / -10";

const MIN_FPS: f64 = 1.0;
const MAX_FPS: f64 = 240.0;
const MIN_DURATION_S: f64 = 0.1;
const MAX_DURATION_S: f64 = 86400.0;

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn parse_args() -> Args {
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    let cmd = Args::command()
        .styles(clap_styles())
        .before_help(default_params_usage_for_help())
        .after_help(KEYS_HELP)
        .help_template(help_template);

    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn install_exit_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        match Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            Ok(mut signals) => {
                thread::spawn(move || {
                    if let Some(sig) = signals.forever().next() {
                        restore_terminal_best_effort();
                        warn!("caught signal {}, exiting", sig);
                        std::process::exit(128 + sig);
                    }
                });
            }
            Err(e) => warn!("failed to install signal handlers: {}", e),
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            warn!("caught Ctrl-C, exiting");
            std::process::exit(130);
        }) {
            warn!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn color_mode_for(args: &Args) -> Result<ColorMode, ParasolError> {
    if let Some(depth) = args.colormode {
        return Ok(ColorMode::from_depth(depth)?);
    }
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    let term = env::var("TERM").unwrap_or_default();
    Ok(ColorMode::detect(&colorterm, &term))
}

fn target_fps(requested: f64) -> f64 {
    if requested.is_finite() && (MIN_FPS..=MAX_FPS).contains(&requested) {
        return requested;
    }
    let clamped = if requested.is_nan() {
        60.0
    } else {
        requested.clamp(MIN_FPS, MAX_FPS)
    };
    warn!("--fps {} out of range, using {}", requested, clamped);
    clamped
}

/// Turns `--duration` into the instant the loop should stop at. Values `<= 0`
/// mean run until quit.
fn run_deadline(start: Instant, requested: Option<f64>) -> Result<Option<Instant>, ConfigError> {
    let Some(s) = requested else {
        return Ok(None);
    };
    if !s.is_finite() {
        return Err(ConfigError::NonFinite {
            flag: "--duration",
            value: s,
        });
    }
    if s <= 0.0 {
        return Ok(None);
    }
    let out_of_range = ConfigError::OutOfRange {
        flag: "--duration",
        value: s,
        min: MIN_DURATION_S,
        max: MAX_DURATION_S,
    };
    if !(MIN_DURATION_S..=MAX_DURATION_S).contains(&s) {
        return Err(out_of_range);
    }
    let limit = Duration::try_from_secs_f64(s).map_err(|_| out_of_range.clone())?;
    start.checked_add(limit).map(Some).ok_or(out_of_range)
}

/// Applies a key press. Returns `false` when the key asks to quit.
fn apply_key(storm: &mut Storm, code: KeyCode, modifiers: KeyModifiers) -> bool {
    let cfg = *storm.config();
    match (code, modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => return false,
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => return false,
        (KeyCode::Char(' '), _) => {
            let viewport = *storm.viewport();
            storm.reset(viewport);
        }
        (KeyCode::Char('p'), _) => storm.toggle_pause(),
        (KeyCode::Char('u'), _) => {
            storm.set_config(cfg.with_umbrella(!cfg.umbrella_enabled));
            debug!(
                "umbrella {} at {:?}",
                if storm.config().umbrella_enabled { "open" } else { "closed" },
                storm.pointer()
            );
        }
        (KeyCode::Left, _) => storm.set_config(cfg.with_wind_speed(cfg.wind_speed - 1.0)),
        (KeyCode::Right, _) => storm.set_config(cfg.with_wind_speed(cfg.wind_speed + 1.0)),
        (KeyCode::Up, _) => {
            storm.set_config(cfg.with_speed_multiplier(cfg.global_speed_multiplier + 1.0))
        }
        (KeyCode::Down, _) => storm.set_config(
            cfg.with_speed_multiplier((cfg.global_speed_multiplier - 1.0).max(0.0)),
        ),
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => {
            storm.set_config(cfg.with_interaction_radius(cfg.interaction_radius + 10.0))
        }
        (KeyCode::Char('-'), _) => storm.set_config(
            cfg.with_interaction_radius((cfg.interaction_radius - 10.0).max(0.0)),
        ),
        _ => {}
    }
    if *storm.config() != cfg {
        debug!("config now {:?}", storm.config());
    }
    true
}

fn run() -> Result<(), ParasolError> {
    let args = parse_args();

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", env!("PARASOL_BUILD"));
        let sha = env!("PARASOL_GIT_SHA");
        if !sha.is_empty() {
            println!("Commit: {}", sha);
        }
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    logging::init(args.log_file.as_deref())?;
    install_exit_handlers();

    let config = RainConfig::from_args(&args)?;
    let color_mode = color_mode_for(&args)?;
    let fps = target_fps(args.fps);
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    info!(
        "starting: {} drops, {} fps, color mode {}, {:?}",
        config.drop_count,
        fps,
        color_mode.label(),
        config
    );

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let viewport = Viewport::new(w, h, args.cell_size);

    let mut storm = Storm::new(
        config,
        viewport,
        color_mode,
        matches!(
            args.color_bg,
            ColorBg::DefaultBackground | ColorBg::Transparent
        ),
        rng,
    );
    let mut frame = Frame::new(w, h, storm.palette.bg);

    let start_time = Instant::now();
    let end_time = run_deadline(start_time, args.duration)?;

    let target_period = Duration::from_secs_f64(1.0 / fps);
    let mut next_frame = Instant::now();

    while storm.raining {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            info!("duration elapsed");
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Mouse(m) => {
                        if matches!(
                            m.kind,
                            MouseEventKind::Moved
                                | MouseEventKind::Drag(_)
                                | MouseEventKind::Down(_)
                        ) {
                            storm.set_pointer_cell(m.column, m.row);
                        }
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if args.screensaver || !apply_key(&mut storm, k.code, k.modifiers) {
                            storm.raining = false;
                        }
                    }
                    _ => {}
                }
            }

            if !storm.raining || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !storm.raining {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            debug!("resize to {}x{} cells", nw, nh);
            storm.reset(Viewport::new(nw, nh, args.cell_size));
            frame = Frame::new(nw, nh, storm.palette.bg);
        }

        let work_start = Instant::now();
        storm.rain(&mut frame);
        term.draw(&frame)?;
        let work = work_start.elapsed();
        if work > target_period {
            trace!(
                "frame took {:.2}ms (budget {:.2}ms)",
                work.as_secs_f64() * 1000.0,
                target_period.as_secs_f64() * 1000.0
            );
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    drop(term);
    info!("stopped after {:.1}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        restore_terminal_best_effort();
        eprintln!("parasol: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::config::CellSize;

    fn make_storm() -> Storm {
        Storm::new(
            RainConfig::default(),
            Viewport::new(20, 10, CellSize::default()),
            ColorMode::Mono,
            true,
            StdRng::seed_from_u64(3),
        )
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut storm = make_storm();
        assert!(!apply_key(&mut storm, KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!apply_key(&mut storm, KeyCode::Esc, KeyModifiers::NONE));
        assert!(!apply_key(&mut storm, KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(apply_key(&mut storm, KeyCode::Char('c'), KeyModifiers::NONE));
    }

    #[test]
    fn arrow_keys_tune_wind_and_speed() {
        let mut storm = make_storm();
        apply_key(&mut storm, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(storm.config().wind_speed, -9.0);
        for _ in 0..10 {
            apply_key(&mut storm, KeyCode::Down, KeyModifiers::NONE);
        }
        assert_eq!(storm.config().global_speed_multiplier, 0.0);
        apply_key(&mut storm, KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(storm.config().global_speed_multiplier, 1.0);
    }

    #[test]
    fn umbrella_and_radius_keys() {
        let mut storm = make_storm();
        apply_key(&mut storm, KeyCode::Char('u'), KeyModifiers::NONE);
        assert!(!storm.config().umbrella_enabled);
        apply_key(&mut storm, KeyCode::Char('+'), KeyModifiers::NONE);
        assert_eq!(storm.config().interaction_radius, 110.0);
        for _ in 0..20 {
            apply_key(&mut storm, KeyCode::Char('-'), KeyModifiers::NONE);
        }
        assert_eq!(storm.config().interaction_radius, 0.0);
    }

    #[test]
    fn out_of_range_fps_is_clamped() {
        assert_eq!(target_fps(30.0), 30.0);
        assert_eq!(target_fps(0.0), MIN_FPS);
        assert_eq!(target_fps(1e9), MAX_FPS);
        assert_eq!(target_fps(f64::NAN), 60.0);
    }

    #[test]
    fn duration_is_bounded_and_never_panics() {
        let start = Instant::now();
        assert_eq!(run_deadline(start, None).unwrap(), None);
        assert_eq!(run_deadline(start, Some(0.0)).unwrap(), None);
        assert_eq!(run_deadline(start, Some(-5.0)).unwrap(), None);
        assert_eq!(
            run_deadline(start, Some(2.5)).unwrap(),
            Some(start + Duration::from_millis(2500))
        );
        assert_eq!(
            run_deadline(start, Some(MAX_DURATION_S)).unwrap(),
            Some(start + Duration::from_secs(86400))
        );

        for huge in [1e300, f64::MAX, MAX_DURATION_S + 1.0] {
            assert!(matches!(
                run_deadline(start, Some(huge)),
                Err(ConfigError::OutOfRange { flag: "--duration", .. })
            ));
        }
        assert!(matches!(
            run_deadline(start, Some(0.01)),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            run_deadline(start, Some(f64::INFINITY)),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn huge_duration_flag_is_rejected_not_panicking() {
        let args = Args::try_parse_from(["parasol", "--duration", "1e300"]).unwrap();
        let err = run_deadline(Instant::now(), args.duration).unwrap_err().to_string();
        assert!(err.starts_with("failed to apply --duration 1000"), "{}", err);
        assert!(err.ends_with("(min 0.1 max 86400)"), "{}", err);
    }
}
