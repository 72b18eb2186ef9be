use ratatui::{
    layout::{Constraint, Layout, Rect},
    prelude::*,
    widgets::*,
};

use crate::app::App;

mod footer;
mod help;
mod log_panel;
mod palette;

pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.bg_primary)),
        area,
    );

    let [body, footer_area] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    if app.log_visible() {
        let [main, log] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
        render_main(f, main, app);
        log_panel::render_log_panel(f, log, app);
    } else {
        render_main(f, body, app);
    }

    footer::render_footer(f, footer_area, app);

    if app.help_state.is_some() {
        help::render_help(f, area, app);
    }
    if app.palette_state.is_some() {
        palette::render_palette(f, area, app);
    }
}

fn render_main(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let lines = vec![
        Line::from(Span::styled(
            "tui-commands demo",
            theme.panel_border(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Ctrl+P", theme.key_hint()),
            Span::styled(" or ", theme.muted()),
            Span::styled(":", theme.key_hint()),
            Span::styled(" opens the command palette.", Style::default().fg(theme.text_secondary)),
        ]),
        Line::from(vec![
            Span::styled("F1", theme.key_hint()),
            Span::styled(" shows help for whatever has focus.", Style::default().fg(theme.text_secondary)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_style(Style::default().fg(theme.text_muted))
                .style(Style::default().bg(theme.bg_primary)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// Centered popup of the given percentage, capped to a maximum size
fn popup_area(area: Rect, percent_x: u16, percent_y: u16, max_width: u16, max_height: u16) -> Rect {
    let width = percent_of(area.width, percent_x).min(max_width);
    let height = percent_of(area.height, percent_y).min(max_height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn percent_of(length: u16, percent: u16) -> u16 {
    let scaled = u32::from(length) * u32::from(percent) / 100;
    u16::try_from(scaled).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_area_on_wide_terminal() {
        let popup = popup_area(Rect::new(0, 0, 1000, 500), 80, 90, 100, 40);
        assert_eq!(popup, Rect::new(450, 230, 100, 40));
    }

    #[test]
    fn test_popup_area_on_maximum_terminal() {
        let area = Rect::new(0, 0, u16::MAX, u16::MAX);
        let popup = popup_area(area, 70, 60, u16::MAX, u16::MAX);
        assert_eq!(popup.width, 45874);
        assert_eq!(popup.height, 39321);
    }

    #[test]
    fn test_popup_area_on_small_terminal() {
        let popup = popup_area(Rect::new(2, 1, 40, 20), 70, 60, 100, 30);
        assert_eq!(popup, Rect::new(8, 5, 28, 12));
    }
}
