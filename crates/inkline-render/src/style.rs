#![forbid(unsafe_code)]

//! Structured text styles.
//!
//! Styles are plain values attached to text runs. Formatting collaborators
//! build them directly; nothing in the render kernel parses markup.

bitflags::bitflags! {
    /// 8-bit text attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        /// Bold / increased intensity.
        const BOLD          = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM           = 0b0000_0010;
        /// Italic text.
        const ITALIC        = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE     = 0b0000_1000;
        /// Blinking text.
        const BLINK         = 0b0001_0000;
        /// Reverse video (swap fg/bg).
        const REVERSE       = 0b0010_0000;
        /// Strikethrough text.
        const STRIKETHROUGH = 0b0100_0000;
        /// Hidden / invisible text.
        const HIDDEN        = 0b1000_0000;
    }
}

/// A terminal colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Palette index: 0-7 standard, 8-15 bright, 16-255 extended.
    Indexed(u8),
    /// 24-bit colour.
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Self = Self::Indexed(0);
    pub const RED: Self = Self::Indexed(1);
    pub const GREEN: Self = Self::Indexed(2);
    pub const YELLOW: Self = Self::Indexed(3);
    pub const BLUE: Self = Self::Indexed(4);
    pub const MAGENTA: Self = Self::Indexed(5);
    pub const CYAN: Self = Self::Indexed(6);
    pub const WHITE: Self = Self::Indexed(7);
    pub const BRIGHT_BLACK: Self = Self::Indexed(8);
    pub const BRIGHT_RED: Self = Self::Indexed(9);
    pub const BRIGHT_GREEN: Self = Self::Indexed(10);
    pub const BRIGHT_YELLOW: Self = Self::Indexed(11);
    pub const BRIGHT_BLUE: Self = Self::Indexed(12);
    pub const BRIGHT_MAGENTA: Self = Self::Indexed(13);
    pub const BRIGHT_CYAN: Self = Self::Indexed(14);
    pub const BRIGHT_WHITE: Self = Self::Indexed(15);
}

/// Foreground, background, and attributes for a text run.
///
/// `None` colours mean "terminal default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground colour.
    pub fg: Option<Color>,
    /// Background colour.
    pub bg: Option<Color>,
    /// Attribute flags.
    pub flags: StyleFlags,
}

impl Style {
    /// The unstyled style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            flags: StyleFlags::empty(),
        }
    }

    /// Set the foreground colour.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background colour.
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add attribute flags.
    #[must_use]
    pub const fn flags(mut self, flags: StyleFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    #[must_use]
    pub const fn bold(self) -> Self {
        self.flags(StyleFlags::BOLD)
    }

    #[must_use]
    pub const fn dim(self) -> Self {
        self.flags(StyleFlags::DIM)
    }

    #[must_use]
    pub const fn italic(self) -> Self {
        self.flags(StyleFlags::ITALIC)
    }

    #[must_use]
    pub const fn underline(self) -> Self {
        self.flags(StyleFlags::UNDERLINE)
    }

    /// True when the style changes nothing.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.flags.is_empty()
    }

    /// Layer `other` on top of `self`: set colours win, flags accumulate.
    #[must_use]
    pub fn patch(self, other: Style) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            flags: self.flags | other.flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates() {
        let style = Style::new().fg(Color::GREEN).bold().underline();
        assert_eq!(style.fg, Some(Color::GREEN));
        assert_eq!(style.bg, None);
        assert!(style.flags.contains(StyleFlags::BOLD | StyleFlags::UNDERLINE));
        assert!(!style.is_plain());
    }

    #[test]
    fn default_is_plain() {
        assert!(Style::default().is_plain());
        assert_eq!(Style::default(), Style::new());
    }

    #[test]
    fn patch_prefers_overlay_colors() {
        let base = Style::new().fg(Color::RED).bg(Color::BLACK).bold();
        let overlay = Style::new().fg(Color::Rgb(1, 2, 3)).italic();
        let merged = base.patch(overlay);
        assert_eq!(merged.fg, Some(Color::Rgb(1, 2, 3)));
        assert_eq!(merged.bg, Some(Color::BLACK));
        assert_eq!(merged.flags, StyleFlags::BOLD | StyleFlags::ITALIC);
    }
}
