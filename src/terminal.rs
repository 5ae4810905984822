use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use log::warn;

use crate::color::Color;
use crate::surface::{Canvas, Surface};

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '\u{2580}';

/// Terminal size as `(columns, rows)`, falling back to 80x24
pub fn size() -> (u16, u16) {
    match termsize::get() {
        Some(size) if size.cols > 0 && size.rows > 0 => (size.cols, size.rows),
        _ => {
            warn!("could not read the terminal size, assuming 80x24");
            (80, 24)
        }
    }
}

/// Pixel resolution a terminal of `(columns, rows)` cells can show
pub fn pixel_size((cols, rows): (u16, u16)) -> (u32, u32) {
    (cols as u32, rows as u32 * 2)
}

fn to_crossterm(color: Color) -> style::Color {
    let (r, g, b) = color.to_rgb();
    style::Color::Rgb { r, g, b }
}

/// Two vertically stacked pixels sharing one character cell
#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    top: Color,
    bottom: Color,
}

/// Cells of a canvas, row by row
fn cells(canvas: &Canvas) -> Vec<Cell> {
    let columns = canvas.width();
    let rows = canvas.height().div_ceil(2);
    let mut cells = Vec::with_capacity((columns * rows) as usize);
    for row in 0..rows {
        for x in 0..columns {
            let top = canvas.pixel(x, row * 2).unwrap_or_default();
            let bottom = canvas.pixel(x, row * 2 + 1).unwrap_or(top);
            cells.push(Cell { top, bottom });
        }
    }
    cells
}

/// Shows canvases on the terminal's alternate screen, sending only the cells
/// that changed since the previous frame
pub struct TerminalDisplay {
    out: Stdout,
    columns: u32,
    previous: Vec<Cell>,
}

impl TerminalDisplay {
    pub fn new() -> Result<Self> {
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, DisableLineWrap, cursor::Hide)
            .context("failed to set up the terminal")?;
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        Ok(TerminalDisplay {
            out,
            columns: 0,
            previous: Vec::new(),
        })
    }

    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        let next = cells(canvas);
        if self.columns != canvas.width() || self.previous.len() != next.len() {
            queue!(self.out, ResetColor, terminal::Clear(terminal::ClearType::All))?;
            self.previous.clear();
            self.columns = canvas.width();
        }

        queue!(self.out, BeginSynchronizedUpdate)?;
        let mut last: Option<Cell> = None;
        for (index, cell) in next.iter().enumerate() {
            if self.previous.get(index) == Some(cell) {
                continue;
            }
            let x = (index as u32 % self.columns) as u16;
            let y = (index as u32 / self.columns) as u16;
            queue!(self.out, cursor::MoveTo(x, y))?;

            if last.map(|c| c.top) != Some(cell.top) {
                queue!(self.out, SetForegroundColor(to_crossterm(cell.top)))?;
            }
            if last.map(|c| c.bottom) != Some(cell.bottom) {
                queue!(self.out, SetBackgroundColor(to_crossterm(cell.bottom)))?;
            }
            last = Some(*cell);
            queue!(self.out, Print(HALF_BLOCK))?;
        }
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush().context("failed to draw the frame")?;

        self.previous = next;
        Ok(())
    }

    /// Rings the terminal bell
    pub fn bell(&mut self) -> Result<()> {
        queue!(self.out, Print('\u{7}'))?;
        Ok(())
    }

    /// Drains pending input; true once the user asked to quit
    pub fn quit_requested(&self) -> Result<bool> {
        let mut quit = false;
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => quit = true,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        quit = true
                    }
                    _ => {}
                }
            }
        }
        Ok(quit)
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
    }
}
