//! Terminal color detection and ANSI codes.

/// ANSI escape codes used by the text renderer.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    /// Bold white for headings.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    pub const GRAY: &str = "\x1b[90m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes: real ANSI sequences, or empty strings when color is
/// disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub heading: &'static str,
    pub muted: &'static str,
    pub value: &'static str,
    pub good: &'static str,
    pub bad: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            heading: colors::WHITE_BOLD,
            muted: colors::GRAY,
            value: colors::CYAN,
            good: colors::GREEN,
            bad: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            heading: "",
            muted: "",
            value: "",
            good: "",
            bad: "",
        }
    }

    /// Colored palette when the environment allows it.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

/// Check whether colored output is allowed.
///
/// Honors the `NO_COLOR` and `TERM=dumb` conventions.
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_palette_is_empty() {
        let palette = ColorPalette::plain();
        assert!(palette.reset.is_empty());
        assert!(palette.heading.is_empty());
        assert!(palette.bad.is_empty());
    }

    #[test]
    fn colored_palette_uses_ansi_codes() {
        let palette = ColorPalette::colored();
        assert_eq!(palette.reset, colors::RESET);
        assert!(palette.value.starts_with("\x1b["));
    }
}
