use ratatui::style::Color;

use crate::local_state::ThemePreference;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub surface_bright: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub positive: Color,
    pub warning: Color,
    pub error: Color,
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(8, 12, 16),
            surface_bright: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(170, 170, 170),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(110, 190, 110),
            warning: Color::Rgb(220, 170, 60),
            error: Color::Rgb(200, 80, 80),
            border: Color::Rgb(60, 70, 80),
            border_focused: Color::Rgb(80, 160, 160),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(246, 246, 242),
            surface_bright: Color::Rgb(255, 255, 255),
            text: Color::Rgb(30, 30, 30),
            text_muted: Color::Rgb(90, 90, 90),
            dim: Color::Rgb(120, 120, 120),
            accent: Color::Rgb(20, 110, 120),
            positive: Color::Rgb(30, 130, 60),
            warning: Color::Rgb(170, 110, 0),
            error: Color::Rgb(180, 40, 40),
            border: Color::Rgb(200, 200, 200),
            border_focused: Color::Rgb(20, 110, 120),
        }
    }

    pub fn for_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Dark => Self::dark(),
            ThemePreference::Light => Self::light(),
        }
    }
}
