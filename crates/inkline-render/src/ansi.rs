#![forbid(unsafe_code)]

//! ANSI escape sequence generation.
//!
//! Pure byte-generation functions; the [`TerminalWriter`](crate::TerminalWriter)
//! decides when to call them.
//!
//! | Sequence | Meaning |
//! |----------|---------|
//! | `ESC [ p ; … m` | SGR (Select Graphic Rendition) |
//! | `ESC [ n A` / `ESC [ n B` | CUU / CUD (cursor up / down) |
//! | `CR` / `LF` | column 0 / next row (scrolls at the bottom) |
//! | `ESC [ 2 K` | EL: erase the whole line |
//! | `ESC [ J` | ED: erase from cursor to end of screen |
//! | `ESC [ ? 25 l/h` | DECTCEM: hide / show cursor |
//! | `ESC [ ? 2026 h/l` | synchronized output begin / end |

use std::io::{self, Write};

use crate::style::{Color, Style, StyleFlags};

// =============================================================================
// SGR
// =============================================================================

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// Write SGR reset.
#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// SGR "on" code for every style flag, in emission order.
pub const FLAG_CODES: [(StyleFlags, u8); 8] = [
    (StyleFlags::BOLD, 1),
    (StyleFlags::DIM, 2),
    (StyleFlags::ITALIC, 3),
    (StyleFlags::UNDERLINE, 4),
    (StyleFlags::BLINK, 5),
    (StyleFlags::REVERSE, 7),
    (StyleFlags::HIDDEN, 8),
    (StyleFlags::STRIKETHROUGH, 9),
];

fn push_color(params: &mut Vec<String>, color: Color, background: bool) {
    let base = if background { 40 } else { 30 };
    match color {
        Color::Indexed(n) if n < 8 => params.push((base + n as u16).to_string()),
        Color::Indexed(n) if n < 16 => params.push((base + 60 + (n - 8) as u16).to_string()),
        Color::Indexed(n) => params.push(format!("{};5;{n}", base + 8)),
        Color::Rgb(r, g, b) => params.push(format!("{};2;{r};{g};{b}", base + 8)),
    }
}

/// Write a single SGR sequence selecting `style`.
///
/// Writes nothing for a plain style. Does not reset first; callers reset
/// after each styled run.
pub fn sgr<W: Write>(w: &mut W, style: Style) -> io::Result<()> {
    if style.is_plain() {
        return Ok(());
    }
    let mut params = Vec::with_capacity(4);
    for (flag, code) in FLAG_CODES {
        if style.flags.contains(flag) {
            params.push(code.to_string());
        }
    }
    if let Some(fg) = style.fg {
        push_color(&mut params, fg, false);
    }
    if let Some(bg) = style.bg {
        push_color(&mut params, bg, true);
    }
    write!(w, "\x1b[{}m", params.join(";"))
}

// =============================================================================
// Cursor movement
// =============================================================================

/// Cursor up: `CSI n A`
pub fn cuu<W: Write>(w: &mut W, n: u16) -> io::Result<()> {
    match n {
        0 => Ok(()),
        1 => w.write_all(b"\x1b[A"),
        n => write!(w, "\x1b[{n}A"),
    }
}

/// Cursor down: `CSI n B`
pub fn cud<W: Write>(w: &mut W, n: u16) -> io::Result<()> {
    match n {
        0 => Ok(()),
        1 => w.write_all(b"\x1b[B"),
        n => write!(w, "\x1b[{n}B"),
    }
}

#[inline]
pub fn cr<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\r")
}

#[inline]
pub fn lf<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\n")
}

/// Hide cursor: `CSI ? 25 l`
pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";

/// Show cursor: `CSI ? 25 h`
pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";

#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_HIDE)
}

#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_SHOW)
}

// =============================================================================
// Erase
// =============================================================================

/// Erase the entire current line: `CSI 2 K`. The cursor does not move.
#[inline]
pub fn erase_line<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[2K")
}

/// Erase from the cursor to the end of the screen: `CSI J`
#[inline]
pub fn erase_down<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[J")
}

// =============================================================================
// Synchronized output (DEC 2026)
// =============================================================================

pub const SYNC_BEGIN: &[u8] = b"\x1b[?2026h";
pub const SYNC_END: &[u8] = b"\x1b[?2026l";

#[inline]
pub fn sync_begin<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SYNC_BEGIN)
}

#[inline]
pub fn sync_end<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SYNC_END)
}
