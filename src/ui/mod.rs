pub mod components;
pub mod form;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState, Screen};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}", app.search_query),
        InputMode::Normal | InputMode::Modal if !app.search_query.is_empty() => {
            format!("  filter: {}", app.search_query)
        }
        _ => String::new(),
    };
    let hints = match app.screen {
        Screen::List => "Enter: view; n: new; e: edit; d: delete; /: search; r: reload; q: quit",
        Screen::Detail(_) => "Esc: back; e: edit; d: delete; q: quit",
    };
    let p = Paragraph::new(format!(
        "{}  users:{}{prompt}  | {hints}",
        app.base_url,
        app.store.users().len()
    ))
    .block(
        Block::default()
            .title("User Management")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    match app.screen {
        Screen::List => users::render_users_table(f, root[1], app),
        Screen::Detail(id) => users::render_user_detail(f, root[1], app, id),
    }

    components::render_status_bar(f, root[2], app);

    let area = f.area();
    match &app.modal {
        Some(ModalState::Form(form)) => form::render_form_modal(f, area, app, form),
        Some(ModalState::DeleteConfirm { name, id, selected }) => {
            form::render_delete_modal(f, area, app, *id, name, *selected)
        }
        None => {}
    }
}
