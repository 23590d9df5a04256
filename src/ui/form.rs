use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::AppState;
use crate::app::form::{FormField, FormState};
use crate::ui::components::centered_rect;

/// Lines of the form body: one per input, each followed by its error if any.
pub fn form_lines(app: &AppState, form: &FormState) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(FormField::ALL.len() * 2 + 3);
    for field in FormField::ALL {
        let focused = field == form.focus;
        let marker = if focused { "▶ " } else { "  " };
        let value = form.display_value(field);
        let mut style = Style::default().fg(app.theme.text);
        if field.read_only() {
            style = style.fg(app.theme.muted);
        } else if focused {
            style = style.fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD);
        }
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<20}", format!("{}:", field.label())), style),
            Span::styled(format!("{value}{cursor}"), style),
        ]));
        if let Some(err) = form.error_for(field) {
            lines.push(Line::from(Span::styled(
                format!("    {err}"),
                Style::default().fg(app.theme.error_fg),
            )));
        }
    }
    lines.push(Line::raw(""));
    if app.store.is_saving() {
        lines.push(Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Tab/↓ next  Shift-Tab/↑ prev  Enter submit  Esc cancel",
        Style::default().fg(app.theme.muted),
    )));
    lines
}

pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, form: &FormState) {
    let lines = form_lines(app, form);
    let width = area.width.saturating_sub(8).clamp(40, 80);
    let height = (lines.len() as u16).saturating_add(2);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(form.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, id: u64, name: &str, selected: usize) {
    let rect = centered_rect(50, 7, area);
    let yes = if selected == 0 { "[Yes]" } else { " Yes " };
    let no = if selected == 1 { "[No]" } else { " No  " };
    let body = format!("Delete user '{name}' (id {id})?\n\n  {yes}    {no}");
    let p = Paragraph::new(body).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
