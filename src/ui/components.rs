//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, request status and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let base = Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg);
    let mut spans = vec![Span::styled(
        format!(
            "mode: {mode}  shown:{}/{}  rows/page:{}  ",
            app.visible.len(),
            app.store.users().len(),
            app.rows_per_page
        ),
        base,
    )];
    if app.store.is_loading() {
        spans.push(Span::styled("Loading...  ", base));
    }
    if let Some(msg) = app.store.error() {
        spans.push(Span::styled(
            format!("{msg} (x: dismiss)"),
            base.fg(app.theme.error_fg).add_modifier(Modifier::BOLD),
        ));
    }
    let p = Paragraph::new(Line::from(spans)).style(base);
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
