use ratatui::{
    layout::{Constraint, Layout, Margin},
    prelude::*,
    widgets::*,
};

use super::popup_area;
use crate::app::App;

/// Render the command palette popup
pub fn render_palette(f: &mut Frame, area: Rect, app: &App) {
    let Some(state) = &app.palette_state else {
        return;
    };
    let theme = &app.theme;
    let popup = popup_area(area, 70, 60, 100, 30);

    f.render_widget(Clear, popup);
    let block = Block::bordered()
        .title(format!(" Command Palette ({}) ", state.rows.len()))
        .title_style(theme.panel_border())
        .border_style(theme.panel_border())
        .style(Style::default().bg(theme.bg_panel));
    f.render_widget(block, popup);

    let inner = popup.inner(Margin {
        horizontal: 2,
        vertical: 1,
    });
    let [input, results, details] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(inner);

    let input_line = if state.query.is_empty() {
        Line::from(Span::styled(app.palette_prompt().to_string(), theme.muted()))
    } else {
        Line::from(Span::styled(
            state.query.clone(),
            Style::default().fg(theme.text_primary),
        ))
    };
    f.render_widget(
        Paragraph::new(input_line).block(
            Block::bordered()
                .border_style(Style::default().fg(theme.accent_primary))
                .style(Style::default().bg(theme.bg_secondary)),
        ),
        input,
    );

    if state.rows.is_empty() {
        f.render_widget(
            Paragraph::new("No matching commands")
                .style(theme.muted())
                .alignment(Alignment::Center),
            results,
        );
    } else {
        // Keep the selection in view
        let visible = results.height as usize;
        let first = state.selected.saturating_sub(visible.saturating_sub(1));
        let lines: Vec<Line> = state
            .rows
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, row)| {
                let mut line = row.label.clone();
                if i == state.selected {
                    line = line.style(
                        Style::default()
                            .fg(theme.selected_fg)
                            .bg(theme.selected_bg),
                    );
                    line.spans.insert(0, Span::raw("> "));
                } else {
                    line.spans.insert(0, Span::raw("  "));
                }
                line
            })
            .collect();
        f.render_widget(Paragraph::new(lines), results);
    }

    if let Some(row) = state.rows.get(state.selected) {
        f.render_widget(
            Paragraph::new(row.help.clone())
                .style(Style::default().fg(theme.text_secondary))
                .wrap(Wrap { trim: true }),
            details,
        );
    }
}
