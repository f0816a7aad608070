//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Background luma above which the terminal counts as light.
const LIGHT_LUMA_THRESHOLD: f32 = 0.6;

/// Detect the terminal background. Falls back to dark when the terminal
/// does not answer the color query.
pub fn resolve_theme() -> Theme {
    match terminal_light::luma() {
        Ok(luma) if luma > LIGHT_LUMA_THRESHOLD => Theme::Light,
        Ok(_) => Theme::Dark,
        Err(e) => {
            tracing::debug!(error = %e, "Terminal background query failed, using dark theme");
            Theme::Dark
        }
    }
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // Position movement against the official order
    pub gain: Color,
    pub loss: Color,

    pub muted: Color,
    pub title_color: Color,
    pub accent: Color,

    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popups
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,

    pub chart_axis: Color,
}

impl ThemeColors {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            gain: Color::Green,
            loss: Color::Red,
            muted: Color::Gray,
            title_color: Color::Cyan,
            accent: Color::Yellow,
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
            chart_axis: Color::Gray,
        }
    }

    pub fn light() -> Self {
        Self {
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Indexed(244),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            gain: Color::Indexed(28),
            loss: Color::Indexed(160),
            muted: Color::Indexed(240),
            title_color: Color::Blue,
            accent: Color::Indexed(130),
            tab_active_style: Style::new().fg(Color::Blue).bold(),
            tab_inactive_style: Style::new().fg(Color::Indexed(245)),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Indexed(28),
            flash_error: Color::Indexed(160),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
            chart_axis: Color::Indexed(240),
        }
    }

    /// Color for an official-vs-custom position delta (positive = gained places)
    pub fn movement_color(&self, delta: i64) -> Color {
        match delta.signum() {
            1 => self.gain,
            -1 => self.loss,
            _ => self.muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_theme() {
        assert_eq!(ThemeColors::for_theme(Theme::Dark).title_color, Color::Cyan);
        assert_eq!(ThemeColors::for_theme(Theme::Light).title_color, Color::Blue);
    }

    #[test]
    fn test_movement_color() {
        let theme = ThemeColors::dark();
        assert_eq!(theme.movement_color(3), Color::Green);
        assert_eq!(theme.movement_color(-1), Color::Red);
        assert_eq!(theme.movement_color(0), Color::Gray);
    }
}
