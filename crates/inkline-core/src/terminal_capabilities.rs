#![forbid(unsafe_code)]

//! Terminal capability detection for live-region output.
//!
//! Detection happens once, when a live session starts, and the result is
//! fixed for the lifetime of that session. It combines the TTY-ness of the
//! output stream with a handful of environment variables:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `TERM=dumb` | No cursor control (plain append-only output) |
//! | `NO_COLOR` | Keep cursor control, drop SGR styling |
//! | `TERM_PROGRAM`, `TERM` | Known terminals get synchronized output (DEC 2026) |
//! | `TMUX`, `STY`, `ZELLIJ` | Multiplexers: synchronized output is disabled |
//! | `INKLINE_FORCE_INTERACTIVE` | `1`/`0` overrides TTY detection |
//!
//! All detection goes through [`TerminalCapabilities::detect_with`], which
//! takes an environment getter so tests never touch the process environment.

use std::env;

/// Terminals known to honour synchronized output (DEC 2026).
const SYNC_OUTPUT_PROGRAMS: &[&str] = &["WezTerm", "ghostty", "iTerm.app", "contour", "rio"];
const SYNC_OUTPUT_TERMS: &[&str] = &["xterm-kitty", "alacritty", "foot", "foot-extra"];

/// Fallback size when the terminal cannot be queried.
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// What the output terminal can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    /// Cursor movement and erase sequences are honoured.
    pub interactive: bool,
    /// SGR colour and attribute sequences may be emitted.
    pub color: bool,
    /// DEC 2026 synchronized output is supported.
    pub sync_output: bool,
    /// Running inside tmux.
    pub in_tmux: bool,
    /// Running inside GNU screen.
    pub in_screen: bool,
    /// Running inside zellij.
    pub in_zellij: bool,
}

impl TerminalCapabilities {
    /// A redirected stream: no cursor control, no styling.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            interactive: false,
            color: false,
            sync_output: false,
            in_tmux: false,
            in_screen: false,
            in_zellij: false,
        }
    }

    /// An interactive terminal with colour but without synchronized output.
    #[must_use]
    pub const fn basic() -> Self {
        Self {
            interactive: true,
            color: true,
            ..Self::plain()
        }
    }

    /// An interactive terminal with every feature we use.
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            sync_output: true,
            ..Self::basic()
        }
    }

    /// Detect capabilities from the process environment.
    ///
    /// `is_tty` is the interactivity of the output stream itself.
    #[must_use]
    pub fn detect(is_tty: bool) -> Self {
        Self::detect_with(is_tty, |key| env::var(key).ok())
    }

    /// Detect capabilities using `get` to read environment variables.
    #[must_use]
    pub fn detect_with<F>(is_tty: bool, get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let term = get("TERM").unwrap_or_default();
        let term_program = get("TERM_PROGRAM").unwrap_or_default();
        let dumb = term == "dumb";

        let interactive = match get("INKLINE_FORCE_INTERACTIVE").as_deref() {
            Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            _ => is_tty && !dumb,
        };

        let in_tmux = get("TMUX").is_some_and(|v| !v.is_empty());
        let in_screen = get("STY").is_some_and(|v| !v.is_empty());
        let in_zellij = get("ZELLIJ").is_some();

        let known_sync = SYNC_OUTPUT_PROGRAMS.contains(&term_program.as_str())
            || SYNC_OUTPUT_TERMS.contains(&term.as_str());

        let caps = Self {
            interactive,
            color: interactive && get("NO_COLOR").is_none(),
            sync_output: false,
            in_tmux,
            in_screen,
            in_zellij,
        };

        Self {
            // Muxes swallow or mangle DEC 2026.
            sync_output: interactive && known_sync && !caps.in_any_mux(),
            ..caps
        }
    }

    /// True inside any terminal multiplexer.
    #[must_use]
    pub const fn in_any_mux(&self) -> bool {
        self.in_tmux || self.in_screen || self.in_zellij
    }

    /// True when SGR sequences may be written.
    #[must_use]
    pub const fn styled(&self) -> bool {
        self.interactive && self.color
    }
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self::plain()
    }
}

/// Query the controlling terminal size as `(columns, rows)`.
///
/// Returns `None` when there is no terminal (redirected output, CI).
#[must_use]
pub fn terminal_size() -> Option<(u16, u16)> {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => Some((cols, rows)),
        _ => None,
    }
}
