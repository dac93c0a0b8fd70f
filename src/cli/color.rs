use owo_colors::OwoColorize;

use trip_spotlight::ui::Style;

/// Color helper with a single policy shared across commands.
///
/// All functions return `String`; colors are applied only if `style.color == true`.
pub struct Colors {
    pub enabled: bool,
}

impl Colors {
    pub fn new(style: &Style) -> Self {
        Self {
            enabled: style.color,
        }
    }

    pub fn stdout() -> Self {
        Self::new(&Style::default())
    }

    #[inline]
    pub fn ok(&self, s: impl AsRef<str>) -> String {
        let s = s.as_ref();
        if self.enabled {
            s.green().to_string()
        } else {
            s.to_string()
        }
    }

    #[inline]
    pub fn err(&self, s: impl AsRef<str>) -> String {
        let s = s.as_ref();
        if self.enabled {
            s.red().to_string()
        } else {
            s.to_string()
        }
    }

    #[inline]
    pub fn warn(&self, s: impl AsRef<str>) -> String {
        let s = s.as_ref();
        if self.enabled {
            s.yellow().to_string()
        } else {
            s.to_string()
        }
    }

    #[inline]
    pub fn info(&self, s: impl AsRef<str>) -> String {
        let s = s.as_ref();
        if self.enabled {
            s.cyan().to_string()
        } else {
            s.to_string()
        }
    }

    #[inline]
    pub fn dim(&self, s: impl AsRef<str>) -> String {
        let s = s.as_ref();
        if self.enabled {
            s.bright_black().to_string()
        } else {
            s.to_string()
        }
    }

    // Domain-specific helpers (policy)
    #[inline]
    pub fn origin(&self, s: impl AsRef<str>) -> String {
        self.err(s)
    }

    #[inline]
    pub fn destination(&self, s: impl AsRef<str>) -> String {
        self.ok(s)
    }

    #[inline]
    pub fn user_added(&self, s: impl AsRef<str>) -> String {
        self.warn(s)
    }

    #[inline]
    pub fn confidence(&self, level: &str) -> String {
        match level {
            "high" => self.ok(level),
            "medium" => self.warn(level),
            _ => self.err(level),
        }
    }
}
