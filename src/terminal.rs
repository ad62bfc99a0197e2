// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

/// Raw-mode alternate screen with mouse reporting.
///
/// Keeps a copy of what is on screen and only rewrites cells that changed,
/// batching horizontally adjacent cells with the same colors into one print.
pub struct Terminal {
    stdout: Stdout,
    shown: Vec<Cell>,
    shown_size: (u16, u16),
    run: String,
}

fn leave(out: &mut Stdout) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            out.execute(EnableMouseCapture)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = init {
            leave(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            shown: Vec::new(),
            shown_size: (0, 0),
            run: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn set_colors(
        &mut self,
        cell: &Cell,
        cur: &mut Option<(Option<Color>, Option<Color>)>,
    ) -> Result<()> {
        let want = (cell.fg, cell.bg);
        if *cur == Some(want) {
            return Ok(());
        }
        self.stdout.queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
        self.stdout.queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
        *cur = Some(want);
        Ok(())
    }

    /// Writes the cells of `frame` that differ from the previous draw.
    /// Returns how many cells were rewritten.
    pub fn draw(&mut self, frame: &Frame) -> Result<usize> {
        let size = (frame.width, frame.height);
        let full = self.shown_size != size;
        if full {
            self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
            self.shown = vec![Cell::blank_with_bg(None); frame.cells().len()];
            self.shown_size = size;
        }

        let width = frame.width as usize;
        let mut colors: Option<(Option<Color>, Option<Color>)> = None;
        let mut written = 0usize;

        for row in 0..frame.height as usize {
            let base = row * width;
            let mut col = 0usize;
            while col < width {
                let cell = frame.cells()[base + col];
                if !full && self.shown[base + col] == cell {
                    col += 1;
                    continue;
                }

                let start = col;
                self.run.clear();
                while col < width {
                    let next = frame.cells()[base + col];
                    let changed = full || self.shown[base + col] != next;
                    if !changed || next.fg != cell.fg || next.bg != cell.bg {
                        break;
                    }
                    self.run.push(next.ch);
                    self.shown[base + col] = next;
                    col += 1;
                }

                self.stdout.queue(cursor::MoveTo(start as u16, row as u16))?;
                self.set_colors(&cell, &mut colors)?;
                self.stdout.queue(Print(self.run.as_str()))?;
                written += col - start;
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        Ok(written)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        leave(&mut self.stdout);
    }
}

pub fn restore_terminal_best_effort() {
    leave(&mut stdout());
}
