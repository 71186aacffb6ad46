//! Screen (C3): grid of cells, cursor, attribute/color state, and the
//! append-only row deque with a viewport index that backs scrollback.

use std::collections::VecDeque;

use crate::attrs::{CellAttributes, TerminalModes};
use crate::cell::Cell;
use crate::color::{Color, PALETTE_16};
use crate::error::{CursorError, ResizeError};

/// Default cap on scrollback rows kept above the viewport. Bounds memory
/// growth under adversarial repeated-newline input; not specified by name
/// anywhere upstream, chosen generously for an interactive terminal.
pub const DEFAULT_MAX_SCROLLBACK: usize = 10_000;

type Row = Vec<Cell>;

fn blank_row(cols: usize) -> Row {
    vec![Cell::blank(); cols]
}

/// Cursor position and visual state, as handed to a render consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
    pub visible: bool,
    pub blink: bool,
}

/// A `rows x cols` grid of [`Cell`]s with cursor, paint state, and mode
/// flags. A [`crate::terminal::TerminalCore`] owns a primary/alternate pair and
/// keeps only one active at a time.
#[derive(Debug, Clone)]
pub struct Screen {
    rows: VecDeque<Row>,
    viewport_start: usize,
    max_rows: usize,
    max_cols: usize,
    max_scrollback: usize,

    cursor_row: usize,
    cursor_col: usize,

    cur_fg: Color,
    cur_bg: Color,
    cur_attrs: CellAttributes,
    modes: TerminalModes,
}

impl Screen {
    /// Build a blank screen of `rows x cols` with the default scrollback cap.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_scrollback(rows, cols, DEFAULT_MAX_SCROLLBACK)
    }

    /// Build a blank screen with an explicit scrollback cap.
    #[must_use]
    pub fn with_scrollback(rows: usize, cols: usize, max_scrollback: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let mut deque = VecDeque::with_capacity(rows);
        for _ in 0..rows {
            deque.push_back(blank_row(cols));
        }
        Self {
            rows: deque,
            viewport_start: 0,
            max_rows: rows,
            max_cols: cols,
            max_scrollback,
            cursor_row: 0,
            cursor_col: 0,
            cur_fg: Color::Default,
            cur_bg: Color::Default,
            cur_attrs: CellAttributes::empty(),
            modes: TerminalModes::default(),
        }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.max_rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.max_cols
    }

    #[must_use]
    pub const fn modes(&self) -> TerminalModes {
        self.modes
    }

    #[must_use]
    pub const fn cur_fg(&self) -> Color {
        self.cur_fg
    }

    #[must_use]
    pub const fn cur_bg(&self) -> Color {
        self.cur_bg
    }

    #[must_use]
    pub const fn cur_attrs(&self) -> CellAttributes {
        self.cur_attrs
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        Cursor {
            row: self.cursor_row,
            col: self.cursor_col,
            visible: self.modes.contains(TerminalModes::CURSOR_VISIBLE),
            blink: self.modes.contains(TerminalModes::CURSOR_BLINK),
        }
    }

    /// Borrow a visible row (`0..rows()`), or `None` if out of range.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(self.viewport_start + row).map(Vec::as_slice)
    }

    fn row_mut(&mut self, row: usize) -> &mut Row {
        let idx = self.viewport_start + row;
        &mut self.rows[idx]
    }

    // -- writing -----------------------------------------------------

    /// Place `glyph` at the cursor with current paint state, applying
    /// DECAWM autowrap semantics.
    pub fn put_char(&mut self, glyph: &[u8]) {
        let autowrap = self.modes.contains(TerminalModes::AUTOWRAP);
        if autowrap {
            if self.cursor_col == self.max_cols {
                self.newline();
                self.carriage_return();
            }
            let (row, col) = (self.cursor_row, self.cursor_col);
            self.write_cell(row, col, glyph);
            self.cursor_col += 1;
        } else {
            let col = self.cursor_col.min(self.max_cols - 1);
            self.write_cell(self.cursor_row, col, glyph);
            self.cursor_col = (col + 1).min(self.max_cols - 1);
        }
    }

    fn write_cell(&mut self, row: usize, col: usize, glyph: &[u8]) {
        let fg = self.cur_fg;
        let bg = self.cur_bg;
        let attrs = self.cur_attrs;
        let cell = Cell::new(glyph, fg, bg, attrs);
        self.row_mut(row)[col] = cell;
    }

    // -- cursor motion -------------------------------------------------

    pub fn newline(&mut self) {
        if self.cursor_row == self.max_rows - 1 {
            self.rows.push_back(blank_row(self.max_cols));
            self.viewport_start += 1;
            self.trim_scrollback();
        } else {
            self.cursor_row += 1;
        }
    }

    pub fn carriage_return(&mut self) {
        self.cursor_col = 0;
    }

    pub fn backspace(&mut self) {
        if self.cursor_col == 0 {
            if self.cursor_row == 0 {
                return;
            }
            self.cursor_row -= 1;
            self.cursor_col = self.max_cols - 1;
        } else {
            self.cursor_col -= 1;
        }
    }

    /// Relative cursor motion (CUU/CUD/CUF/CUB); clamps to grid bounds.
    pub fn cursor_move(&mut self, drow: isize, dcol: isize) {
        let row = (self.cursor_row as isize + drow).clamp(0, self.max_rows as isize - 1);
        let col = (self.cursor_col as isize + dcol).clamp(0, self.max_cols as isize - 1);
        self.cursor_row = row as usize;
        self.cursor_col = col as usize;
    }

    /// Absolute cursor motion (CUP/HVP), 1-based input.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError`] if `row` or `col` is out of range; the
    /// dispatcher is expected to log and drop on error per the error policy.
    pub fn cursor_to(&mut self, row: usize, col: usize) -> Result<(), CursorError> {
        if row == 0 || row > self.max_rows {
            return Err(CursorError::RowOutOfBounds {
                row,
                rows: self.max_rows,
            });
        }
        if col == 0 || col > self.max_cols {
            return Err(CursorError::ColOutOfBounds {
                col,
                cols: self.max_cols,
            });
        }
        self.cursor_row = row - 1;
        self.cursor_col = col - 1;
        Ok(())
    }

    /// Absolute column motion (CHA), 1-based, clamped into range.
    pub fn cursor_to_column(&mut self, col: usize) {
        let col = col.max(1) - 1;
        self.cursor_col = col.min(self.max_cols - 1);
    }

    /// Absolute row motion (VPA), 1-based, clamped into range.
    pub fn cursor_to_row(&mut self, row: usize) {
        let row = row.max(1) - 1;
        self.cursor_row = row.min(self.max_rows - 1);
    }

    // -- erasing ---------------------------------------------------

    pub fn erase_in_display(&mut self, mode: u32) {
        match mode {
            0 => {
                self.erase_in_line(0);
                for r in (self.cursor_row + 1)..self.max_rows {
                    self.clear_row(r);
                }
            }
            1 => {
                self.erase_in_line(1);
                for r in 0..self.cursor_row {
                    self.clear_row(r);
                }
            }
            _ => {
                for r in 0..self.max_rows {
                    self.clear_row(r);
                }
            }
        }
    }

    pub fn erase_in_line(&mut self, mode: u32) {
        let row = self.cursor_row;
        let cols = self.max_cols;
        let col = self.cursor_col.min(cols - 1);
        match mode {
            0 => {
                for c in col..cols {
                    self.row_mut(row)[c] = Cell::blank();
                }
            }
            1 => {
                for c in 0..=col {
                    self.row_mut(row)[c] = Cell::blank();
                }
            }
            _ => self.clear_row(row),
        }
    }

    fn clear_row(&mut self, row: usize) {
        let cols = self.max_cols;
        let slot = self.row_mut(row);
        for cell in slot.iter_mut().take(cols) {
            *cell = Cell::blank();
        }
    }

    /// Clear `n` cells forward from the cursor, wrapping to the next row at
    /// `max_cols` and stopping at the end of the grid.
    pub fn erase_chars(&mut self, n: usize) {
        let mut row = self.cursor_row;
        let mut col = self.cursor_col.min(self.max_cols - 1);
        for _ in 0..n {
            if row >= self.max_rows {
                break;
            }
            self.row_mut(row)[col] = Cell::blank();
            col += 1;
            if col == self.max_cols {
                col = 0;
                row += 1;
            }
        }
    }

    /// Erase every visible cell and home the cursor, without touching
    /// paint state or mode flags. Used when switching into the alternate
    /// screen (spec: "the destination screen is cleared").
    pub fn clear(&mut self) {
        for r in 0..self.max_rows {
            self.clear_row(r);
        }
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    // -- scrolling ---------------------------------------------------

    /// Scroll the viewport: negative moves content up (new blank rows at
    /// the bottom), positive moves content down (blank rows at the top,
    /// drawing from scrollback history if any is available).
    pub fn scroll(&mut self, delta: isize) {
        if delta < 0 {
            let n = (-delta) as usize;
            for _ in 0..n {
                self.rows.push_back(blank_row(self.max_cols));
                self.viewport_start += 1;
            }
            self.trim_scrollback();
        } else {
            let mut remaining = delta as usize;
            while remaining > 0 && self.viewport_start > 0 {
                self.viewport_start -= 1;
                remaining -= 1;
            }
            for _ in 0..remaining {
                self.rows.push_front(blank_row(self.max_cols));
                if self.rows.len() > self.viewport_start + self.max_rows {
                    self.rows.pop_back();
                }
            }
        }
    }

    fn trim_scrollback(&mut self) {
        if self.viewport_start > self.max_scrollback {
            let excess = self.viewport_start - self.max_scrollback;
            for _ in 0..excess {
                self.rows.pop_front();
            }
            self.viewport_start -= excess;
        }
    }

    // -- paint state ---------------------------------------------------

    /// Apply one SGR parameter, per the accumulate-left-to-right table.
    pub fn apply_sgr(&mut self, code: u32) {
        match code {
            0 => {
                self.cur_fg = Color::Default;
                self.cur_bg = Color::Default;
                self.cur_attrs = CellAttributes::empty();
            }
            1 => self.cur_attrs.insert(CellAttributes::BOLD),
            2 => self.cur_attrs.insert(CellAttributes::FAINT),
            3 => self.cur_attrs.insert(CellAttributes::ITALIC),
            4 => self.cur_attrs.insert(CellAttributes::UNDERLINE),
            7 => self.cur_attrs.insert(CellAttributes::INVERT),
            9 => self.cur_attrs.insert(CellAttributes::CROSSED_OUT),
            27 => self.cur_attrs.remove(CellAttributes::INVERT),
            29 => self.cur_attrs.remove(CellAttributes::CROSSED_OUT),
            30..=37 => self.cur_fg = Color::Indexed(index16(code - 30)),
            39 => self.cur_fg = Color::Default,
            40..=47 => self.cur_bg = Color::Indexed(index16(code - 40)),
            49 => self.cur_bg = Color::Default,
            90..=97 => self.cur_fg = Color::Indexed(index16(code - 90 + 8)),
            100..=107 => self.cur_bg = Color::Indexed(index16(code - 100 + 8)),
            _ => {}
        }
    }

    /// `38;5;N` / `48;5;N` extended color selection; called by the
    /// dispatcher once it has recognized the 3-parameter form.
    pub fn set_fg_indexed(&mut self, index: u8) {
        self.cur_fg = Color::Indexed(index);
    }

    pub fn set_bg_indexed(&mut self, index: u8) {
        self.cur_bg = Color::Indexed(index);
    }

    pub fn set_mode(&mut self, mode: TerminalModes, enable: bool) {
        self.modes.set(mode, enable);
    }

    /// DECOM on reset homes the cursor; on set, unsupported (logged by the
    /// caller). Origin-mode relative clamping is not otherwise applied.
    pub fn home_cursor(&mut self) {
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    /// Full reset (`RIS`/`DECSTR`-equivalent baseline): attributes, colors,
    /// autowrap-on mode set, cursor homed, grid cleared.
    pub fn reset(&mut self) {
        self.cur_fg = Color::Default;
        self.cur_bg = Color::Default;
        self.cur_attrs = CellAttributes::empty();
        self.modes = TerminalModes::default();
        self.clear();
    }

    /// Resize the grid. Every row in the deque, not just the visible range,
    /// is re-widthed so a later positive `scroll` can never pull an
    /// old-width scrollback row into view.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError`] if either dimension is zero.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), ResizeError> {
        if rows == 0 || cols == 0 {
            return Err(ResizeError::ZeroDimension { rows, cols });
        }
        while self.rows.len() < self.viewport_start + rows {
            self.rows.push_back(blank_row(cols));
        }
        for row in &mut self.rows {
            row.resize(cols, Cell::blank());
        }
        self.max_rows = rows;
        self.max_cols = cols;
        self.cursor_row = self.cursor_row.min(rows - 1);
        self.cursor_col = self.cursor_col.min(cols);
        Ok(())
    }
}

fn index16(n: u32) -> u8 {
    (n as usize).min(PALETTE_16.len() - 1) as u8
}
