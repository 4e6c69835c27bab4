use std::io::{Stdout, Write, stdout};

use anyhow::{Context, Result, bail};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Attribute;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use log::warn;

use crate::TermInt;
use crate::canvas::{Canvas, Color, Rect};
use crate::config::{GridConfig, ViewportConfig};

const FILL_CHAR: char = '█';
const BOLD_FONT_SIZE: u16 = 30;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Cell {
    ch: char,
    color: Color,
    bold: bool,
}

const BLANK: Cell = Cell { ch: ' ', color: Color::Black, bold: false };

/// Maps logic units onto terminal cells: one grid cell is one row high and
/// `cols_per_cell` columns wide.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Raster {
    cell_size: i32,
    cols_per_cell: i32,
    cols: TermInt,
    rows: TermInt,
}

impl Raster {
    /// Picks double-width cells when the terminal has room for them, since
    /// terminal characters are about twice as tall as they are wide.
    fn fit(
        grid: GridConfig,
        viewport: ViewportConfig,
        term_size: (TermInt, TermInt),
    ) -> Result<Self> {
        let cell_cols = (viewport.width / grid.cell_size) as TermInt;
        let rows = (viewport.height / grid.cell_size) as TermInt;
        let (term_w, term_h) = term_size;

        if term_w < cell_cols || term_h < rows {
            bail!(
                "terminal is {}x{} but the game needs at least {}x{}",
                term_w, term_h, cell_cols, rows
            );
        }

        let cols_per_cell = if term_w >= cell_cols * 2 { 2 } else { 1 };
        Ok(Raster {
            cell_size: grid.cell_size,
            cols_per_cell,
            cols: cell_cols * cols_per_cell as TermInt,
            rows,
        })
    }

    fn col(&self, x: i32) -> i32 {
        x.div_euclid(self.cell_size) * self.cols_per_cell
    }

    fn row(&self, y: i32) -> i32 {
        y.div_euclid(self.cell_size)
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }
}

pub struct TermManager {
    stdout: Stdout,
    raster: Raster,
    // What the next present() should show, and what is on screen right now.
    back: Vec<Cell>,
    front: Vec<Cell>,
}

impl TermManager {
    pub fn new(grid: GridConfig, viewport: ViewportConfig) -> Result<Self> {
        let size = terminal::size().context("Error reading terminal size")?;
        Self::with_size(grid, viewport, size)
    }

    fn with_size(
        grid: GridConfig,
        viewport: ViewportConfig,
        size: (TermInt, TermInt),
    ) -> Result<Self> {
        let raster = Raster::fit(grid, viewport, size)?;
        let cells = raster.cols as usize * raster.rows as usize;

        Ok(TermManager {
            stdout: stdout(),
            raster,
            back: vec![BLANK; cells],
            front: vec![BLANK; cells],
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(
            self.stdout,
            cursor::Hide,
            cursor::DisableBlinking,
            terminal::Clear(ClearType::All)
        ).context("Error preparing the screen")?;
        Ok(())
    }

    /// Best effort: every step is attempted even if an earlier one fails.
    pub fn restore(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            warn!("failed to disable raw mode: {}", err);
        }
        let cursor_res = execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking
        );
        if let Err(err) = cursor_res {
            warn!("failed to restore the cursor: {}", err);
        }
        if let Err(err) = execute!(self.stdout, LeaveAlternateScreen) {
            warn!("failed to leave alt screen: {}", err);
        }
    }

    /// Writes every cell that changed since the last call, then flushes.
    pub fn present(&mut self) -> Result<()> {
        let cols = self.raster.cols as usize;

        for (i, (new, old)) in self.back.iter().zip(self.front.iter_mut()).enumerate() {
            if new == old {
                continue;
            }
            let (x, y) = ((i % cols) as TermInt, (i / cols) as TermInt);
            let weight = if new.bold { Attribute::Bold } else { Attribute::NormalIntensity };
            queue!(
                self.stdout,
                cursor::MoveTo(x, y),
                style::SetAttribute(weight),
                style::SetForegroundColor(term_color(new.color)),
                style::Print(new.ch)
            ).context("Error queueing cell")?;
            *old = *new;
        }

        self.stdout.flush().context("Error flushing")?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if let Some(i) = self.raster.index(col, row) {
            self.back[i] = cell;
        }
    }
}

impl Canvas for TermManager {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.w <= 0 || rect.h <= 0 {
            return;
        }

        let ch = if color == Color::Black { ' ' } else { FILL_CHAR };
        let cell = Cell { ch, color, bold: false };

        let r = self.raster;
        let (c0, c1) = (r.col(rect.x), r.col(rect.x + rect.w - 1) + r.cols_per_cell);
        let (r0, r1) = (r.row(rect.y), r.row(rect.y + rect.h - 1) + 1);
        for row in r0..r1 {
            for col in c0..c1 {
                self.put(col, row, cell);
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32, font_size: u16, color: Color) {
        // The baseline sits at the bottom of the text, so draw on the row above it.
        let row = self.raster.row(y - 1);
        let col = self.raster.col(x);
        let bold = font_size >= BOLD_FONT_SIZE;

        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, Cell { ch, color, bold });
        }
    }
}

fn term_color(color: Color) -> style::Color {
    match color {
        Color::Black => style::Color::Black,
        Color::White => style::Color::White,
        Color::Red => style::Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(term_size: (TermInt, TermInt)) -> Result<Raster> {
        Raster::fit(GridConfig::default(), ViewportConfig::default(), term_size)
    }

    fn term(term_size: (TermInt, TermInt)) -> TermManager {
        TermManager::with_size(GridConfig::default(), ViewportConfig::default(), term_size).unwrap()
    }

    #[test]
    fn wide_terminal_gets_double_columns() {
        let r = raster((200, 50)).unwrap();
        assert_eq!((r.cols_per_cell, r.cols, r.rows), (2, 120, 40));
        assert_eq!(r.col(70), 14);
        assert_eq!(r.row(200), 20);
    }

    #[test]
    fn narrow_terminal_falls_back_to_single_columns() {
        let r = raster((80, 40)).unwrap();
        assert_eq!((r.cols_per_cell, r.cols, r.rows), (1, 60, 40));
    }

    #[test]
    fn tiny_terminal_is_an_error() {
        let err = raster((80, 24)).unwrap_err();
        assert!(err.to_string().contains("at least 60x40"), "{}", err);
    }

    #[test]
    fn out_of_range_cells_are_dropped() {
        let r = raster((120, 40)).unwrap();
        assert_eq!(r.index(-1, 0), None);
        assert_eq!(r.index(0, 40), None);
        assert_eq!(r.index(119, 39), Some(39 * 120 + 119));
    }

    #[test]
    fn rects_cover_whole_cells() {
        let mut term = term((120, 40));
        term.fill_rect(Rect::new(70, 200, 10, 10), Color::Red);

        let red: Vec<usize> = (0..term.back.len())
            .filter(|&i| term.back[i].color == Color::Red)
            .collect();
        assert_eq!(red, vec![20 * 120 + 14, 20 * 120 + 15]);
        assert_eq!(term.back[20 * 120 + 14].ch, FILL_CHAR);
    }

    #[test]
    fn score_bar_is_one_row() {
        let mut term = term((60, 40));
        term.fill_rect(Rect::new(5, 350, 590, 5), Color::White);

        let rows: Vec<usize> = (0..term.back.len())
            .filter(|&i| term.back[i] != BLANK)
            .map(|i| i / 60)
            .collect();
        assert_eq!(rows.len(), 60);
        assert!(rows.iter().all(|&r| r == 35));
    }

    #[test]
    fn text_sits_above_its_baseline() {
        let mut term = term((60, 40));
        term.fill_text("12", 30, 385, 36, Color::White);

        assert_eq!(term.back[38 * 60 + 3], Cell { ch: '1', color: Color::White, bold: true });
        assert_eq!(term.back[38 * 60 + 4], Cell { ch: '2', color: Color::White, bold: true });
    }

    #[test]
    fn black_clears_to_blank() {
        let mut term = term((60, 40));
        term.fill_rect(Rect::new(0, 0, 600, 400), Color::White);
        term.fill_rect(Rect::new(0, 0, 600, 400), Color::Black);
        assert!(term.back.iter().all(|c| *c == BLANK));
    }
}
