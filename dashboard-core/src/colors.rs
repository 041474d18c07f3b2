//! Terminal palette for dashboard output.
//!
//! Mapped onto plain ANSI bright colors so it works in any terminal.

use colored::{ColoredString, Colorize};

use crate::expiry::ExpiryBand;

pub trait PaletteExt {
    /// Column labels and prompts (sky)
    fn label(&self) -> ColoredString;
    /// Section headers (lavender)
    fn heading(&self) -> ColoredString;
    /// Plain values (text)
    fn value(&self) -> ColoredString;
    /// Sentinels and rules (overlay)
    fn muted(&self) -> ColoredString;
    /// Errors and expired registrations (red)
    fn danger(&self) -> ColoredString;
    /// Registrations about to lapse (peach)
    fn alert(&self) -> ColoredString;
    /// Registrations due within a quarter (yellow)
    fn caution(&self) -> ColoredString;
    /// Healthy registrations and success marks (green)
    fn good(&self) -> ColoredString;
    /// Colors the text the way `band` is shown.
    fn band(&self, band: ExpiryBand) -> ColoredString;
}

impl<S: AsRef<str>> PaletteExt for S {
    fn label(&self) -> ColoredString {
        self.as_ref().bright_cyan()
    }

    fn heading(&self) -> ColoredString {
        self.as_ref().bright_purple().bold()
    }

    fn value(&self) -> ColoredString {
        self.as_ref().bright_white()
    }

    fn muted(&self) -> ColoredString {
        self.as_ref().bright_black()
    }

    fn danger(&self) -> ColoredString {
        self.as_ref().bright_red()
    }

    fn alert(&self) -> ColoredString {
        self.as_ref().red()
    }

    fn caution(&self) -> ColoredString {
        self.as_ref().bright_yellow()
    }

    fn good(&self) -> ColoredString {
        self.as_ref().bright_green()
    }

    fn band(&self, band: ExpiryBand) -> ColoredString {
        match band {
            ExpiryBand::Expired => self.danger().bold(),
            ExpiryBand::Critical => self.alert().bold(),
            ExpiryBand::Warning => self.caution(),
            ExpiryBand::Ok => self.good(),
            ExpiryBand::Unknown => self.muted(),
        }
    }
}
