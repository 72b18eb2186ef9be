use ratatui::{
    layout::{Constraint, Layout, Margin},
    prelude::*,
    widgets::*,
};

use super::popup_area;
use crate::app::App;

/// Render the help document as a floating window
pub fn render_help(f: &mut Frame, area: Rect, app: &App) {
    let Some(state) = &app.help_state else {
        return;
    };
    let theme = &app.theme;
    let popup = popup_area(area, 80, 90, 100, 40);

    f.render_widget(Clear, popup);

    let title = if state.lines.len() > 1 {
        format!(" Help  [{}/{}] ", state.scroll + 1, state.lines.len())
    } else {
        " Help ".to_string()
    };
    let block = Block::bordered()
        .title(title)
        .title_style(theme.panel_border())
        .border_style(theme.panel_border())
        .style(Style::default().bg(theme.bg_panel));
    f.render_widget(block, popup);

    let inner = popup.inner(Margin {
        horizontal: 2,
        vertical: 1,
    });
    let [content, footer] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let lines: Vec<Line> = state.lines.iter().map(|line| style_markdown(line, app)).collect();
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((state.scroll as u16, 0))
        .style(Style::default().bg(theme.bg_panel));
    f.render_widget(paragraph, content);

    let hint = Line::from(vec![
        Span::styled("Esc", theme.key_hint()),
        Span::styled(" or ", theme.muted()),
        Span::styled("F1", theme.key_hint()),
        Span::styled(" to close", theme.muted()),
    ]);
    f.render_widget(Paragraph::new(hint).alignment(Alignment::Center), footer);
}

/// Headings stand out, table rules fade, everything else is plain
fn style_markdown(line: &str, app: &App) -> Line<'static> {
    let theme = &app.theme;
    if line.starts_with('#') {
        Line::from(Span::styled(
            line.trim_start_matches('#').trim().to_string(),
            Style::default()
                .fg(theme.status_warning)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ))
    } else if line.starts_with("| -") {
        Line::from(Span::styled(line.to_string(), theme.muted()))
    } else {
        Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(theme.text_secondary),
        ))
    }
}
