use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::app::AppState;
use crate::model::User;

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = (app.selected / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.visible.len());
    let users = app.store.users();

    let rows = app.visible[start..end].iter().enumerate().filter_map(|(i, &idx)| {
        let u = users.get(idx)?;
        let absolute_index = start + i;
        let style = if absolute_index == app.selected {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else if absolute_index % 2 == 0 {
            Style::default().fg(app.theme.text).bg(app.theme.stripe_bg)
        } else {
            Style::default().fg(app.theme.text)
        };
        Some(
            Row::new(vec![
                Cell::from(u.id.map(|id| id.to_string()).unwrap_or_default()),
                Cell::from(u.name.clone()),
                Cell::from(u.email.clone()),
                Cell::from(u.phone.clone()),
            ])
            .style(style),
        )
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
        Constraint::Percentage(30),
    ];

    let header = Row::new(vec!["ID", "Name", "Email", "Phone"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = if app.store.is_loading() { "Users (loading...)" } else { "Users" };
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

/// Detail lines for one user, or the not-found message.
pub fn detail_text(user: Option<&User>) -> String {
    match user {
        None => "User not found".to_string(),
        Some(u) => format!(
            "{}\n\nEmail: {}\nPhone: {}\nUsername: {}\nAddress: {}, {}\nCompany: {}\nWebsite: {}",
            u.name,
            u.email,
            u.phone,
            u.username,
            u.address.street,
            u.address.city,
            u.company.as_deref().unwrap_or_default(),
            u.website.as_deref().unwrap_or_default(),
        ),
    }
}

pub fn render_user_detail(f: &mut Frame, area: Rect, app: &AppState, id: u64) {
    let text = detail_text(app.store.find(id));
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(format!("User {id}"))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}
