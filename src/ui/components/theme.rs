//! Theme definitions.
//!
//! The active theme is a plain [`ThemeMode`] value owned by the presentation
//! layer. Palettes are derived from it on every render, so toggling is just
//! flipping the value.

use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Color constants for the two palettes.
pub mod colors {
    use ratatui::style::Color;

    // ═══════════════════════════════════════════════════════════════════════════
    // LIGHT - warm paper tones
    // ═══════════════════════════════════════════════════════════════════════════

    /// Window background
    pub const LIGHT_BG: Color = Color::Rgb(255, 243, 224); // #fff3e0

    /// Form panel background
    pub const LIGHT_SURFACE: Color = Color::Rgb(255, 224, 178); // #ffe0b2

    /// Input background
    pub const LIGHT_INPUT: Color = Color::Rgb(255, 255, 255); // #ffffff

    /// Results table background
    pub const LIGHT_TABLE: Color = Color::Rgb(255, 253, 231); // #fffde7

    /// Labels and body text
    pub const LIGHT_TEXT: Color = Color::Rgb(78, 52, 46); // #4e342e

    /// Headings
    pub const LIGHT_ACCENT: Color = Color::Rgb(191, 54, 12); // #bf360c

    /// Focus ring / buttons
    pub const LIGHT_FOCUS: Color = Color::Rgb(255, 152, 0); // #ff9800

    // ═══════════════════════════════════════════════════════════════════════════
    // DARK - neutral grays
    // ═══════════════════════════════════════════════════════════════════════════

    pub const DARK_BG: Color = Color::Rgb(33, 33, 33); // #212121

    pub const DARK_SURFACE: Color = Color::Rgb(66, 66, 66); // #424242

    pub const DARK_INPUT: Color = Color::Rgb(97, 97, 97); // #616161

    pub const DARK_TABLE: Color = Color::Rgb(48, 48, 48); // #303030

    pub const DARK_TEXT: Color = Color::Rgb(255, 255, 255); // #ffffff

    pub const DARK_ACCENT: Color = Color::Rgb(255, 183, 77); // #ffb74d

    pub const DARK_FOCUS: Color = Color::Rgb(255, 152, 0); // #ff9800

    // ═══════════════════════════════════════════════════════════════════════════
    // STATUS COLORS - shared by both palettes
    // ═══════════════════════════════════════════════════════════════════════════

    /// Warning states (blank submission)
    pub const STATUS_WARNING: Color = Color::Rgb(224, 175, 104); // #e0af68

    /// Info states (no results)
    pub const STATUS_INFO: Color = Color::Rgb(125, 207, 255); // #7dcfff
}

/// Which palette the presentation layer renders with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn palette(self) -> ThemePalette {
        match self {
            ThemeMode::Light => ThemePalette::light(),
            ThemeMode::Dark => ThemePalette::dark(),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        })
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme {other:?}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemePalette {
    pub bg: Color,
    pub surface: Color,
    pub input: Color,
    pub table: Color,
    pub fg: Color,
    pub accent: Color,
    pub focus: Color,
}

impl ThemePalette {
    pub fn light() -> Self {
        Self {
            bg: colors::LIGHT_BG,
            surface: colors::LIGHT_SURFACE,
            input: colors::LIGHT_INPUT,
            table: colors::LIGHT_TABLE,
            fg: colors::LIGHT_TEXT,
            accent: colors::LIGHT_ACCENT,
            focus: colors::LIGHT_FOCUS,
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: colors::DARK_BG,
            surface: colors::DARK_SURFACE,
            input: colors::DARK_INPUT,
            table: colors::DARK_TABLE,
            fg: colors::DARK_TEXT,
            accent: colors::DARK_ACCENT,
            focus: colors::DARK_FOCUS,
        }
    }

    /// Title style - accent colored with bold modifier
    pub fn title(self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn base(self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn surface_style(self) -> Style {
        Style::default().fg(self.fg).bg(self.surface)
    }

    pub fn input_style(self) -> Style {
        Style::default().fg(self.fg).bg(self.input)
    }

    pub fn table_style(self) -> Style {
        Style::default().fg(self.fg).bg(self.table)
    }

    pub fn border_style(self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn border_focus_style(self) -> Style {
        Style::default()
            .fg(self.focus)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header_style(self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning_style(self) -> Style {
        Style::default().fg(colors::STATUS_WARNING)
    }

    pub fn info_style(self) -> Style {
        Style::default().fg(colors::STATUS_INFO)
    }
}
