use ratatui::{prelude::*, widgets::*};

use crate::app::App;

/// Key hints for the focused part of the screen
pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = Vec::new();

    for (key, label) in app.footer() {
        spans.push(Span::styled(format!(" {} ", key), theme.key_hint()));
        spans.push(Span::styled(format!("{}  ", label), theme.muted()));
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_panel));
    f.render_widget(footer, area);
}
