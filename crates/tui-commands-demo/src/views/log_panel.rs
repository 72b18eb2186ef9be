use ratatui::{prelude::*, widgets::*};

use crate::app::App;

/// Render captured log records, newest at the bottom
pub fn render_log_panel(f: &mut Frame, area: Rect, app: &App) {
    use ::log::Level;

    let theme = &app.theme;
    let visible = area.height.saturating_sub(2) as usize;

    let items: Vec<ListItem> = match app.logs.lock() {
        Ok(logs) => {
            let end = logs.len().saturating_sub(app.log_offset);
            let start = end.saturating_sub(visible);
            logs.range(start..end)
                .map(|entry| {
                    let color = match entry.level {
                        Level::Error => theme.status_error,
                        Level::Warn => theme.status_warning,
                        Level::Info => theme.text_primary,
                        Level::Debug => theme.text_secondary,
                        Level::Trace => theme.text_muted,
                    };
                    ListItem::new(format!(
                        "{} {:5} {} {}",
                        entry.timestamp.format("%H:%M:%S%.3f"),
                        entry.level,
                        entry.target,
                        entry.message
                    ))
                    .style(Style::default().fg(color))
                })
                .collect()
        }
        Err(_) => Vec::new(),
    };

    let title = if app.log_offset > 0 {
        format!(" Log ({} newer hidden) ", app.log_offset)
    } else {
        " Log ".to_string()
    };
    let list = List::new(items).block(
        Block::bordered()
            .title(title)
            .border_style(Style::default().fg(theme.accent_primary))
            .style(Style::default().bg(theme.bg_secondary)),
    );
    f.render_widget(list, area);
}
