// Copyright (c) 2026 rezky_nightky

use log::{debug, trace};
use rand::rngs::StdRng;

use crate::config::RainConfig;
use crate::frame::Frame;
use crate::motion::advance_drops;
use crate::palette::{build_palette, drop_opacity, Palette};
use crate::path::{drop_path, Pointer};
use crate::raindrop::{init_drops, Raindrop};
use crate::render::{draw_streak, Viewport};
use crate::runtime::ColorMode;

/// Owns the drop store and drives one frame at a time: draw every streak,
/// then let every drop fall.
pub struct Storm {
    pub raining: bool,
    pub pause: bool,
    pub palette: Palette,

    config: RainConfig,
    viewport: Viewport,
    pointer: Pointer,
    drops: Vec<Raindrop>,
    rng: StdRng,
}

impl Storm {
    pub fn new(
        config: RainConfig,
        viewport: Viewport,
        color_mode: ColorMode,
        default_background: bool,
        rng: StdRng,
    ) -> Self {
        let mut storm = Self {
            raining: true,
            pause: false,
            palette: build_palette(config.drop_color, color_mode, default_background),
            config,
            viewport,
            pointer: Pointer::default(),
            drops: Vec::new(),
            rng,
        };
        storm.reset(viewport);
        storm
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    #[cfg(test)]
    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    /// Replaces the parameters. The drop store is rebuilt only if the drop
    /// count changed.
    pub fn set_config(&mut self, config: RainConfig) {
        let rebuild = config.drop_count != self.config.drop_count;
        self.config = config;
        if rebuild {
            self.reset(self.viewport);
        }
    }

    pub fn set_pointer_cell(&mut self, col: u16, row: u16) {
        self.pointer = self.viewport.pointer_at(col, row);
    }

    pub fn toggle_pause(&mut self) {
        self.pause = !self.pause;
        debug!("pause {}", if self.pause { "on" } else { "off" });
    }

    /// Scatters a fresh drop store over `viewport`.
    pub fn reset(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.drops = init_drops(
            self.config.drop_count,
            viewport.width_px(),
            viewport.height_px(),
            &mut self.rng,
        );
        debug!(
            "scattered {} drops over {}x{} px ({}x{} cells)",
            self.drops.len(),
            viewport.width_px(),
            viewport.height_px(),
            viewport.cols,
            viewport.rows
        );
    }

    /// Renders the current frame into `frame`, then advances the store unless
    /// paused. Returns the number of cells lit.
    pub fn rain(&mut self, frame: &mut Frame) -> usize {
        frame.clear();

        let mut lit = 0;
        for d in &self.drops {
            let opacity = drop_opacity(self.config.drop_color, d.speed);
            let Some(fg) = self.palette.shade(opacity) else {
                continue;
            };
            let points = drop_path(d, self.pointer, &self.config);
            lit += draw_streak(frame, &self.viewport, &points, fg, opacity);
        }
        trace!("frame lit {} cells", lit);

        if !self.pause {
            advance_drops(&mut self.drops, &self.config, self.viewport.height_px());
        }
        lit
    }
}
