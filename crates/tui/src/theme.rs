//! Theme and styling for the CV Lift TUI.
//!
//! Dark theme with an indigo accent. Score colors follow the band thresholds
//! used everywhere results are presented: strong scores green, fair amber,
//! weak red.

use cvlift_types::ScoreBand;
use ratatui::style::{Color, Modifier, Style};

/// Indigo accent color for highlights and focus indicators.
pub const ACCENT: Color = Color::Rgb(99, 102, 241);

/// Primary foreground color for normal text.
pub const FG: Color = Color::Rgb(224, 224, 230);

/// Muted foreground color for hints, labels, and secondary information.
pub const FG_MUTED: Color = Color::Rgb(168, 168, 175);

/// Default border color for unfocused UI elements.
pub const BORDER: Color = Color::Rgb(72, 72, 80);

/// Focused border color.
pub const BORDER_FOCUS: Color = ACCENT;

/// Warning color for error states and the weak score band.
pub const WARN: Color = Color::Rgb(220, 96, 110);

/// Color for strong scores and positive deltas.
pub const OK: Color = Color::Rgb(16, 185, 129);

/// Color for the fair score band.
pub const AMBER: Color = Color::Rgb(245, 158, 11);

/// Creates a border style based on focus state.
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(BORDER_FOCUS)
    } else {
        Style::default().fg(BORDER)
    }
}

/// Style for block titles.
pub fn title_style() -> Style {
    Style::default().fg(FG).add_modifier(Modifier::BOLD)
}

/// Style for normal text content.
pub fn text_style() -> Style {
    Style::default().fg(FG)
}

/// Style for secondary text.
pub fn text_muted() -> Style {
    Style::default().fg(FG_MUTED)
}

/// Style for error banners and messages.
pub fn error_style() -> Style {
    Style::default().fg(WARN).add_modifier(Modifier::BOLD)
}

/// Color associated with a 0-100 score.
pub fn score_color(score: u8) -> Color {
    match ScoreBand::of(score) {
        ScoreBand::Strong => OK,
        ScoreBand::Fair => AMBER,
        ScoreBand::Weak => WARN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_colors_follow_bands() {
        assert_eq!(score_color(85), OK);
        assert_eq!(score_color(65), AMBER);
        assert_eq!(score_color(40), WARN);
    }
}
