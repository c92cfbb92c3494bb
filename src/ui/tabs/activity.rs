use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::logview::LogLevel;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Activity ({} events) ", app.log.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.log.is_empty() {
        let empty = Paragraph::new(Span::styled("No activity yet", styles::muted_style()))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let visible = area.height.saturating_sub(2) as usize;

    // Newest entries at the bottom; log_scroll counts lines back from the tail
    let lines: Vec<Line> = app
        .log
        .entries()
        .rev()
        .skip(app.log_scroll)
        .take(visible)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|entry| {
            let level_style = match entry.level {
                LogLevel::Info => styles::muted_style(),
                LogLevel::Warn => styles::highlight_style(),
                LogLevel::Error => styles::error_style(),
            };
            Line::from(vec![
                Span::styled(entry.time_display(), styles::muted_style()),
                Span::raw(" "),
                Span::styled(format!("{:<5}", entry.level.label()), level_style),
                Span::raw(" "),
                Span::raw(entry.message.clone()),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
