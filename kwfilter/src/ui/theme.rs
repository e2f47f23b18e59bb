//! Colors for the kwfilter console output.
//!
//! Each logical part of the output maps to a 16-color ANSI foreground. Color
//! is only applied when the target stream is a terminal.

use owo_colors::{AnsiColors, OwoColorize};
use std::collections::HashMap;

/// Type alias for the theme map, providing a consistent type definition.
pub type ThemeMap = HashMap<ThemeEntry, ThemeStyle>;

/// The different logical parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeEntry {
    Header,
    Success,
    Info,
    Warn,
    Error,
    /// Text produced by a rule (masks, replacements).
    FilteredText,
    SummaryRuleName,
    SummaryOccurrences,
}

/// A named ANSI color (e.g., "red", "brightgreen").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColor(String);

impl ThemeColor {
    fn named(name: &str) -> Self {
        ThemeColor(name.to_string())
    }

    /// Converts the color name into its `owo_colors::AnsiColors` value.
    pub fn to_ansi_color(&self) -> AnsiColors {
        match self.0.as_str() {
            "black" => AnsiColors::Black,
            "red" => AnsiColors::Red,
            "green" => AnsiColors::Green,
            "yellow" => AnsiColors::Yellow,
            "blue" => AnsiColors::Blue,
            "magenta" => AnsiColors::Magenta,
            "cyan" => AnsiColors::Cyan,
            "white" => AnsiColors::White,
            "brightblack" => AnsiColors::BrightBlack,
            "brightred" => AnsiColors::BrightRed,
            "brightgreen" => AnsiColors::BrightGreen,
            "brightyellow" => AnsiColors::BrightYellow,
            "brightblue" => AnsiColors::BrightBlue,
            "brightmagenta" => AnsiColors::BrightMagenta,
            "brightcyan" => AnsiColors::BrightCyan,
            "brightwhite" => AnsiColors::BrightWhite,
            _ => AnsiColors::White,
        }
    }
}

/// The style configuration for a specific `ThemeEntry`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeStyle {
    pub fg: Option<ThemeColor>,
}

impl ThemeStyle {
    /// Returns the default theme map.
    pub fn default_theme_map() -> ThemeMap {
        let entries = [
            (ThemeEntry::Header, "brightcyan"),
            (ThemeEntry::Success, "green"),
            (ThemeEntry::Info, "white"),
            (ThemeEntry::Warn, "yellow"),
            (ThemeEntry::Error, "red"),
            (ThemeEntry::FilteredText, "magenta"),
            (ThemeEntry::SummaryRuleName, "brightblue"),
            (ThemeEntry::SummaryOccurrences, "brightyellow"),
        ];
        entries
            .into_iter()
            .map(|(entry, color)| (entry, ThemeStyle { fg: Some(ThemeColor::named(color)) }))
            .collect()
    }
}

/// Renders `text` with the entry's color when `enable_colors` is set.
pub fn styled(text: &str, entry: ThemeEntry, theme_map: &ThemeMap, enable_colors: bool) -> String {
    if !enable_colors {
        return text.to_string();
    }
    match theme_map.get(&entry).and_then(|style| style.fg.as_ref()) {
        Some(color) => text.color(color.to_ansi_color()).to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_ansi_color_maps_names() {
        assert_eq!(ThemeColor::named("blue").to_ansi_color(), AnsiColors::Blue);
        assert_eq!(ThemeColor::named("brightyellow").to_ansi_color(), AnsiColors::BrightYellow);
    }

    #[test]
    fn default_theme_covers_every_entry() {
        let theme = ThemeStyle::default_theme_map();
        assert_eq!(theme.len(), 8);
        assert!(theme.values().all(|style| style.fg.is_some()));
    }

    #[test]
    fn styled_is_plain_without_colors() {
        let theme = ThemeStyle::default_theme_map();
        assert_eq!(styled("rule", ThemeEntry::Header, &theme, false), "rule");
        assert_ne!(styled("rule", ThemeEntry::Header, &theme, true), "rule");
    }
}
