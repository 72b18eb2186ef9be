use ratatui::style::{Color, Modifier, Style, palette::tailwind};

/// Colours used by the demo views
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg_primary: Color,
    pub bg_panel: Color,
    pub bg_secondary: Color,

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent_primary: Color,
    /// Binding hints in the palette; `None` leaves them dim
    pub binding_accent: Option<Color>,

    pub status_error: Color,
    pub status_warning: Color,

    pub selected_bg: Color,
    pub selected_fg: Color,
}

impl Theme {
    pub fn new(binding_accent: Option<Color>) -> Self {
        Self {
            bg_primary: tailwind::SLATE.c950,
            bg_panel: tailwind::SLATE.c900,
            bg_secondary: tailwind::SLATE.c800,

            text_primary: tailwind::SLATE.c100,
            text_secondary: tailwind::SLATE.c300,
            text_muted: tailwind::SLATE.c500,

            accent_primary: tailwind::CYAN.c400,
            binding_accent,

            status_error: tailwind::ROSE.c400,
            status_warning: tailwind::AMBER.c400,

            selected_bg: tailwind::CYAN.c800,
            selected_fg: Color::White,
        }
    }

    /// Style handed to the palette context for binding hints
    pub fn binding_hint(&self) -> Option<Style> {
        self.binding_accent.map(|color| Style::default().fg(color))
    }

    pub fn panel_border(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }
}
