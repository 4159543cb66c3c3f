#![forbid(unsafe_code)]

//! Terminal model for presenter validation.
//!
//! A minimal terminal emulator that understands the subset of ANSI
//! sequences a live region emits, so painting can be verified byte for byte
//! without real terminal I/O.
//!
//! # Scope
//!
//! This is NOT a full VT emulator. It supports only:
//! - Relative cursor moves (CUU, CUD, CUF, CUB), CHA and CUP
//! - CR, LF (scrolling at the bottom row), BS
//! - Deferred autowrap at the right margin
//! - Erase operations (EL, ED)
//! - SGR (flags, 16/256/RGB colours)
//! - DECTCEM cursor visibility and DEC 2026 synchronized output (tracked)
//! - UTF-8 text, wide and zero-width characters
//!
//! Rows scrolled off the top are kept in a scrollback list.
//!
//! ```
//! use inkline_render::terminal_model::TerminalModel;
//!
//! let mut model = TerminalModel::new(10, 2);
//! model.process(b"one\r\ntwo\r\nthree");
//! assert_eq!(model.scrollback(), ["one"]);
//! assert_eq!(model.screen_text(), vec!["two", "three"]);
//! ```

use unicode_width::UnicodeWidthChar;

use crate::style::{Color, Style, StyleFlags};

/// A single cell of the model grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCell {
    /// Base character plus any zero-width continuation characters.
    pub text: String,
    /// Style active when the cell was written.
    pub style: Style,
}

impl Default for ModelCell {
    fn default() -> Self {
        Self {
            text: " ".to_string(),
            style: Style::new(),
        }
    }
}

/// Terminal modes toggled through DEC private sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeFlags {
    /// DECTCEM.
    pub cursor_visible: bool,
    /// Nesting depth of DEC 2026 begin markers.
    pub sync_output_level: u32,
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self {
            cursor_visible: true,
            sync_output_level: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Ground,
    Escape,
    CsiEntry,
    CsiParam,
    Osc,
}

/// A minimal terminal model for testing presenter output.
#[derive(Debug)]
pub struct TerminalModel {
    width: usize,
    height: usize,
    cells: Vec<ModelCell>,
    cursor_x: usize,
    cursor_y: usize,
    wrap_pending: bool,
    sgr: Style,
    modes: ModeFlags,
    scrollback: Vec<String>,
    parse_state: ParseState,
    csi_params: Vec<u32>,
    csi_private: bool,
    utf8: Vec<u8>,
}

impl TerminalModel {
    /// Create a blank model. Both dimensions are raised to at least 1.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![ModelCell::default(); width * height],
            cursor_x: 0,
            cursor_y: 0,
            wrap_pending: false,
            sgr: Style::new(),
            modes: ModeFlags::default(),
            scrollback: Vec::new(),
            parse_state: ParseState::Ground,
            csi_params: Vec::with_capacity(8),
            csi_private: false,
            utf8: Vec::with_capacity(4),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cursor position as `(column, row)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    /// Style that the next printed character would get.
    pub fn sgr_state(&self) -> Style {
        self.sgr
    }

    pub fn modes(&self) -> ModeFlags {
        self.modes
    }

    /// True when every synchronized-output begin has been closed.
    pub fn sync_output_balanced(&self) -> bool {
        self.modes.sync_output_level == 0
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&ModelCell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Text of row `y` with trailing blanks removed.
    pub fn row_text(&self, y: usize) -> Option<String> {
        if y >= self.height {
            return None;
        }
        let row = &self.cells[y * self.width..(y + 1) * self.width];
        let text: String = row.iter().map(|c| c.text.as_str()).collect();
        Some(text.trim_end().to_string())
    }

    /// Every visible row, trailing blank rows included.
    pub fn screen_text(&self) -> Vec<String> {
        (0..self.height).filter_map(|y| self.row_text(y)).collect()
    }

    /// Rows that scrolled off the top, oldest first.
    pub fn scrollback(&self) -> &[String] {
        &self.scrollback
    }

    /// Scrollback followed by the visible rows up to the last non-blank row.
    pub fn transcript(&self) -> Vec<String> {
        let mut rows = self.scrollback.clone();
        let screen = self.screen_text();
        let used = screen
            .iter()
            .rposition(|row| !row.is_empty())
            .map_or(0, |last| last + 1);
        rows.extend(screen.into_iter().take(used));
        rows
    }

    /// Feed bytes to the model.
    pub fn process(&mut self, bytes: &[u8]) {
        for &b in bytes {
            match self.parse_state {
                ParseState::Ground => self.ground_state(b),
                ParseState::Escape => self.escape_state(b),
                ParseState::CsiEntry | ParseState::CsiParam => self.csi_state(b),
                ParseState::Osc => self.osc_state(b),
            }
        }
    }

    fn ground_state(&mut self, b: u8) {
        match b {
            0x1B => {
                self.utf8.clear();
                self.parse_state = ParseState::Escape;
            }
            0x00..=0x1F | 0x7F => self.handle_c0(b),
            0x20..=0x7E => self.put_char(b as char),
            _ => {
                self.utf8.push(b);
                match std::str::from_utf8(&self.utf8) {
                    Ok(s) => {
                        let chars: Vec<char> = s.chars().collect();
                        self.utf8.clear();
                        for ch in chars {
                            self.put_char(ch);
                        }
                    }
                    Err(e) if e.error_len().is_some() => self.utf8.clear(),
                    Err(_) => {}
                }
            }
        }
    }

    fn escape_state(&mut self, b: u8) {
        match b {
            b'[' => {
                self.csi_params.clear();
                self.csi_private = false;
                self.parse_state = ParseState::CsiEntry;
            }
            b']' => self.parse_state = ParseState::Osc,
            0x1B => {}
            _ => self.parse_state = ParseState::Ground,
        }
    }

    fn csi_state(&mut self, b: u8) {
        match b {
            b'0'..=b'9' => {
                if self.parse_state == ParseState::CsiEntry || self.csi_params.is_empty() {
                    self.csi_params.push(0);
                }
                self.parse_state = ParseState::CsiParam;
                if let Some(last) = self.csi_params.last_mut() {
                    *last = last.saturating_mul(10).saturating_add(u32::from(b - b'0'));
                }
            }
            b';' | b':' => {
                if self.csi_params.is_empty() {
                    self.csi_params.push(0);
                }
                self.csi_params.push(0);
                self.parse_state = ParseState::CsiParam;
            }
            b'?' => self.csi_private = true,
            0x20..=0x2F | b'<' | b'=' | b'>' => {}
            0x40..=0x7E => {
                self.execute_csi(b);
                self.parse_state = ParseState::Ground;
            }
            _ => self.parse_state = ParseState::Ground,
        }
    }

    fn osc_state(&mut self, b: u8) {
        // Contents ignored; BEL or ESC terminates.
        match b {
            0x07 => self.parse_state = ParseState::Ground,
            0x1B => self.parse_state = ParseState::Escape,
            _ => {}
        }
    }

    fn handle_c0(&mut self, b: u8) {
        match b {
            0x08 => {
                self.wrap_pending = false;
                self.cursor_x = self.cursor_x.saturating_sub(1);
            }
            0x0A => self.line_feed(),
            0x0D => {
                self.wrap_pending = false;
                self.cursor_x = 0;
            }
            _ => {}
        }
    }

    fn line_feed(&mut self) {
        self.wrap_pending = false;
        if self.cursor_y + 1 < self.height {
            self.cursor_y += 1;
        } else {
            self.scroll_up();
        }
    }

    fn scroll_up(&mut self) {
        let top = self.row_text(0).unwrap_or_default();
        self.scrollback.push(top);
        self.cells.drain(..self.width);
        self.cells
            .extend(std::iter::repeat_with(ModelCell::default).take(self.width));
    }

    fn put_char(&mut self, ch: char) {
        let width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width == 0 {
            // Attach to the previously written cell.
            let x = if self.wrap_pending {
                self.cursor_x
            } else {
                self.cursor_x.saturating_sub(1)
            };
            let idx = self.cursor_y * self.width + x;
            if let Some(cell) = self.cells.get_mut(idx) {
                cell.text.push(ch);
            }
            return;
        }

        if self.wrap_pending || self.cursor_x + width > self.width {
            self.cursor_x = 0;
            self.line_feed();
        }

        let idx = self.cursor_y * self.width + self.cursor_x;
        self.cells[idx] = ModelCell {
            text: ch.to_string(),
            style: self.sgr,
        };
        if width == 2 && self.cursor_x + 1 < self.width {
            self.cells[idx + 1] = ModelCell {
                text: String::new(),
                style: self.sgr,
            };
        }

        if self.cursor_x + width >= self.width {
            self.cursor_x = self.width - 1;
            self.wrap_pending = true;
        } else {
            self.cursor_x += width;
        }
    }

    fn param(&self, index: usize, default: u32) -> u32 {
        match self.csi_params.get(index).copied() {
            Some(0) | None => default,
            Some(n) => n,
        }
    }

    fn execute_csi(&mut self, final_byte: u8) {
        if self.csi_private {
            match final_byte {
                b'h' => self.set_private_modes(true),
                b'l' => self.set_private_modes(false),
                _ => {}
            }
            return;
        }
        self.wrap_pending = final_byte == b'm' && self.wrap_pending;
        let n = self.param(0, 1) as usize;
        match final_byte {
            b'A' => self.cursor_y = self.cursor_y.saturating_sub(n),
            b'B' => self.cursor_y = (self.cursor_y + n).min(self.height - 1),
            b'C' => self.cursor_x = (self.cursor_x + n).min(self.width - 1),
            b'D' => self.cursor_x = self.cursor_x.saturating_sub(n),
            b'G' => self.cursor_x = (n - 1).min(self.width - 1),
            b'H' | b'f' => {
                let col = self.param(1, 1) as usize;
                self.cursor_y = (n - 1).min(self.height - 1);
                self.cursor_x = (col - 1).min(self.width - 1);
            }
            b'J' => self.erase_display(),
            b'K' => self.erase_line(),
            b'm' => self.apply_sgr(),
            _ => {}
        }
    }

    fn set_private_modes(&mut self, on: bool) {
        for &code in &self.csi_params {
            match code {
                25 => self.modes.cursor_visible = on,
                2026 if on => self.modes.sync_output_level += 1,
                2026 => {
                    self.modes.sync_output_level = self.modes.sync_output_level.saturating_sub(1);
                }
                _ => {}
            }
        }
    }

    fn erase_cells(&mut self, from: usize, to: usize) {
        let to = to.min(self.cells.len());
        for cell in &mut self.cells[from.min(to)..to] {
            *cell = ModelCell::default();
        }
    }

    fn erase_display(&mut self) {
        let here = self.cursor_y * self.width + self.cursor_x;
        match self.csi_params.first().copied().unwrap_or(0) {
            0 => self.erase_cells(here, self.cells.len()),
            1 => self.erase_cells(0, here + 1),
            2 | 3 => self.erase_cells(0, self.cells.len()),
            _ => {}
        }
    }

    fn erase_line(&mut self) {
        let row_start = self.cursor_y * self.width;
        let here = row_start + self.cursor_x;
        match self.csi_params.first().copied().unwrap_or(0) {
            0 => self.erase_cells(here, row_start + self.width),
            1 => self.erase_cells(row_start, here + 1),
            2 => self.erase_cells(row_start, row_start + self.width),
            _ => {}
        }
    }

    fn apply_sgr(&mut self) {
        if self.csi_params.is_empty() {
            self.sgr = Style::new();
            return;
        }
        let mut i = 0;
        while i < self.csi_params.len() {
            let code = self.csi_params[i];
            match code {
                0 => self.sgr = Style::new(),
                1 => self.sgr.flags.insert(StyleFlags::BOLD),
                2 => self.sgr.flags.insert(StyleFlags::DIM),
                3 => self.sgr.flags.insert(StyleFlags::ITALIC),
                4 => self.sgr.flags.insert(StyleFlags::UNDERLINE),
                5 => self.sgr.flags.insert(StyleFlags::BLINK),
                7 => self.sgr.flags.insert(StyleFlags::REVERSE),
                8 => self.sgr.flags.insert(StyleFlags::HIDDEN),
                9 => self.sgr.flags.insert(StyleFlags::STRIKETHROUGH),
                21 | 22 => self.sgr.flags.remove(StyleFlags::BOLD | StyleFlags::DIM),
                23 => self.sgr.flags.remove(StyleFlags::ITALIC),
                24 => self.sgr.flags.remove(StyleFlags::UNDERLINE),
                25 => self.sgr.flags.remove(StyleFlags::BLINK),
                27 => self.sgr.flags.remove(StyleFlags::REVERSE),
                28 => self.sgr.flags.remove(StyleFlags::HIDDEN),
                29 => self.sgr.flags.remove(StyleFlags::STRIKETHROUGH),
                30..=37 => self.sgr.fg = Some(Color::Indexed((code - 30) as u8)),
                39 => self.sgr.fg = None,
                40..=47 => self.sgr.bg = Some(Color::Indexed((code - 40) as u8)),
                49 => self.sgr.bg = None,
                90..=97 => self.sgr.fg = Some(Color::Indexed((code - 90 + 8) as u8)),
                100..=107 => self.sgr.bg = Some(Color::Indexed((code - 100 + 8) as u8)),
                38 | 48 => {
                    let color = self.extended_color(&mut i);
                    if code == 38 {
                        self.sgr.fg = color.or(self.sgr.fg);
                    } else {
                        self.sgr.bg = color.or(self.sgr.bg);
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    fn extended_color(&self, i: &mut usize) -> Option<Color> {
        let byte = |v: Option<&u32>| v.map(|&n| n.min(255) as u8);
        match self.csi_params.get(*i + 1).copied()? {
            5 => {
                let idx = byte(self.csi_params.get(*i + 2))?;
                *i += 2;
                Some(Color::Indexed(idx))
            }
            2 => {
                let r = byte(self.csi_params.get(*i + 2))?;
                let g = byte(self.csi_params.get(*i + 3))?;
                let b = byte(self.csi_params.get(*i + 4))?;
                *i += 4;
                Some(Color::Rgb(r, g, b))
            }
            _ => None,
        }
    }
}
