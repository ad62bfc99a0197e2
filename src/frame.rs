// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::Cell;

/// Off-screen cell grid for one animation frame.
///
/// Each cell remembers the opacity of whatever was plotted into it so that a
/// dim, distant drop never paints over a bright, close one.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    opacity: Vec<f32>,
    blank: Cell,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let len = width as usize * height as usize;
        let blank = Cell::blank_with_bg(bg);
        Self {
            width,
            height,
            cells: vec![blank; len],
            opacity: vec![0.0; len],
            blank,
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(self.blank);
        self.opacity.fill(0.0);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Draws `ch` at a possibly off-screen position. Returns whether the cell
    /// changed; cells already holding a brighter glyph are kept.
    pub fn plot(&mut self, x: i64, y: i64, ch: char, fg: Color, opacity: f32) -> bool {
        if x < 0 || y < 0 || x > u16::MAX as i64 || y > u16::MAX as i64 {
            return false;
        }
        let Some(i) = self.index(x as u16, y as u16) else {
            return false;
        };
        if self.opacity[i] > opacity {
            return false;
        }
        self.opacity[i] = opacity;
        self.cells[i] = Cell {
            ch,
            fg: Some(fg),
            bg: self.blank.bg,
        };
        true
    }

    #[cfg(test)]
    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_blank()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_makes_cells_blank() {
        let mut f = Frame::new(2, 2, None);
        assert!(f.plot(0, 0, 'x', Color::White, 0.5));
        assert_eq!(f.get(0, 0).unwrap().ch, 'x');
        f.clear();
        assert_eq!(f.get(0, 0).unwrap().ch, ' ');
        assert_eq!(f.lit_count(), 0);
    }

    #[test]
    fn brighter_glyph_wins() {
        let mut f = Frame::new(3, 1, None);
        f.plot(1, 0, '|', Color::White, 0.8);
        assert!(!f.plot(1, 0, '/', Color::Grey, 0.2));
        assert_eq!(f.get(1, 0).unwrap().ch, '|');
        assert!(f.plot(1, 0, '\\', Color::White, 0.9));
        assert_eq!(f.get(1, 0).unwrap().ch, '\\');
    }

    #[test]
    fn off_screen_plots_are_ignored() {
        let mut f = Frame::new(3, 3, None);
        assert!(!f.plot(-1, 0, '|', Color::White, 1.0));
        assert!(!f.plot(0, 3, '|', Color::White, 1.0));
        assert!(!f.plot(i64::MAX, 0, '|', Color::White, 1.0));
        assert_eq!(f.lit_count(), 0);
    }

    #[test]
    fn plotted_cells_keep_background() {
        let bg = Some(Color::AnsiValue(16));
        let mut f = Frame::new(1, 1, bg);
        f.plot(0, 0, '|', Color::White, 1.0);
        assert_eq!(f.get(0, 0).unwrap().bg, bg);
    }
}
