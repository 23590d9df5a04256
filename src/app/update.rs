use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::app::{AppState, InputMode, ModalState, Screen};
use crate::dispatch::{Dispatcher, drain};
use crate::search::apply_search;
use crate::store::Completion;
use crate::ui;

/// Whether the event loop keeps going after a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Draw, apply arrived completions, handle one key; until `q`.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    dispatcher: &Dispatcher,
    completions: &mut UnboundedReceiver<Completion>,
) -> Result<()> {
    dispatcher.load();

    loop {
        if drain(completions, &mut app.store) > 0 {
            app.sync_with_store();
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key(app, dispatcher, key.code) == Flow::Quit
                {
                    break;
                }
            }
        }
    }

    info!("quit requested");
    Ok(())
}

pub fn handle_key(app: &mut AppState, dispatcher: &Dispatcher, code: KeyCode) -> Flow {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, dispatcher, code),
        InputMode::Modal => handle_modal_key(app, dispatcher, code),
        InputMode::Search => match code {
            KeyCode::Enter => {
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                app.input_mode = InputMode::Normal;
                app.search_query.clear();
                apply_search(app);
            }
            KeyCode::Backspace => {
                app.search_query.pop();
                apply_search(app);
            }
            KeyCode::Char(c) => {
                app.search_query.push(c);
                app.selected = 0;
                apply_search(app);
            }
            _ => {}
        },
    }
    Flow::Continue
}

fn handle_normal_key(app: &mut AppState, dispatcher: &Dispatcher, code: KeyCode) -> Flow {
    match code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('/') => {
            app.screen = Screen::List;
            app.input_mode = InputMode::Search;
        }
        KeyCode::Esc => {
            if let Screen::Detail(_) = app.screen {
                app.screen = Screen::List;
            } else if !app.search_query.is_empty() {
                app.search_query.clear();
                apply_search(app);
            }
        }
        KeyCode::Char('r') => {
            app.store.begin_reload();
            dispatcher.load();
        }
        KeyCode::Char('x') => app.store.dismiss_error(),
        KeyCode::Char('n') | KeyCode::Char('a') => app.open_form_for_new(),
        KeyCode::Char('e') => {
            if let Some(id) = current_id(app) {
                app.open_form_for_edit(id);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = current_id(app) {
                let name = app.store.find(id).map(|u| u.name.clone()).unwrap_or_default();
                app.modal = Some(ModalState::DeleteConfirm { id, name, selected: 1 });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyCode::Enter => {
            if let Some(id) = app.selected_user().and_then(|u| u.id) {
                app.screen = Screen::Detail(id);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.selected = app.selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.selected + 1 < app.visible.len() {
                app.selected += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
            app.selected = app.selected.saturating_sub(app.rows_per_page.max(1));
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
            let new_idx = app.selected.saturating_add(app.rows_per_page.max(1));
            app.selected = new_idx.min(app.visible.len().saturating_sub(1));
        }
        _ => {}
    }
    Flow::Continue
}

// On the detail screen actions target the shown record, otherwise the cursor row.
fn current_id(app: &AppState) -> Option<u64> {
    match app.screen {
        Screen::Detail(id) => app.store.find(id).and_then(|u| u.id),
        Screen::List => app.selected_user().and_then(|u| u.id),
    }
}

fn handle_modal_key(app: &mut AppState, dispatcher: &Dispatcher, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Form(form)) => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(c) => form.push_char(c),
            KeyCode::Enter => {
                // Stays open until the completion clears the editing selection.
                if app.store.is_saving() {
                    debug!("submit ignored while a save is in flight");
                    return;
                }
                let target = form.target();
                let submitted = form.submit(|draft| match target {
                    Some(id) => dispatcher.update(id, draft),
                    None => dispatcher.create(draft),
                });
                if submitted {
                    app.store.begin_save();
                } else {
                    debug!(errors = form.errors.len(), "form submit blocked by validation");
                }
            }
            _ => {}
        },
        Some(ModalState::DeleteConfirm { id, selected, .. }) => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *selected = 1 - *selected;
            }
            KeyCode::Char('y') => {
                dispatcher.delete(*id);
                app.close_modal();
            }
            KeyCode::Char('n') => app.close_modal(),
            KeyCode::Enter => {
                if *selected == 0 {
                    dispatcher.delete(*id);
                }
                app.close_modal();
            }
            _ => {}
        },
        None => {
            app.input_mode = InputMode::Normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FakeUserApi;
    use crate::app::Theme;
    use crate::app::form::{FormField, UsernamePrefix};
    use crate::error::Operation;
    use crate::model::{Address, User};
    use crate::store::UserStore;
    use std::sync::Arc;
    use tokio::runtime::Handle;

    fn mk_user(id: u64, name: &str) -> User {
        User {
            id: Some(id),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "1234567890".into(),
            username: name.to_lowercase(),
            address: Address { street: "Main St".into(), city: "Springfield".into() },
            ..User::draft()
        }
    }

    fn setup() -> (AppState, Dispatcher, UnboundedReceiver<Completion>, Arc<FakeUserApi>) {
        let users = vec![mk_user(1, "Alice"), mk_user(2, "Bob")];
        let api = Arc::new(FakeUserApi::with_users(users.clone()));
        let (dispatcher, rx) = Dispatcher::new(api.clone(), Handle::current());
        let app = AppState::with_store(
            UserStore::with_users(users),
            Theme::dark(),
            UsernamePrefix::DisplayOnly,
            "http://fake",
        );
        (app, dispatcher, rx, api)
    }

    fn type_str(app: &mut AppState, dispatcher: &Dispatcher, s: &str) {
        for c in s.chars() {
            handle_key(app, dispatcher, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn edit_submit_updates_and_closes_form() {
        let (mut app, dispatcher, mut rx, api) = setup();
        handle_key(&mut app, &dispatcher, KeyCode::Down);
        handle_key(&mut app, &dispatcher, KeyCode::Char('e'));
        assert!(matches!(app.modal, Some(ModalState::Form(_))));
        assert_eq!(app.store.editing().and_then(|u| u.id), Some(2));

        type_str(&mut app, &dispatcher, "by");
        handle_key(&mut app, &dispatcher, KeyCode::Enter);
        app.store.apply(rx.recv().await.unwrap());
        app.sync_with_store();

        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.store.find(2).map(|u| u.name.as_str()), Some("Bobby"));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn repeated_enter_sends_one_request_until_completion() {
        let (mut app, dispatcher, mut rx, api) = setup();
        handle_key(&mut app, &dispatcher, KeyCode::Char('e'));
        handle_key(&mut app, &dispatcher, KeyCode::Enter);
        handle_key(&mut app, &dispatcher, KeyCode::Enter);
        assert!(app.store.is_saving());

        app.store.apply(rx.recv().await.unwrap());
        app.sync_with_store();
        assert!(app.modal.is_none());
        assert!(!app.store.is_saving());
        assert_eq!(api.call_count(), 1);
        assert!(rx.try_recv().is_err());
        assert_eq!(api.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn failed_save_allows_resubmit() {
        let (mut app, dispatcher, mut rx, api) = setup();
        api.fail(Operation::Create).await;
        handle_key(&mut app, &dispatcher, KeyCode::Char('n'));
        for value in ["Carol", "carol@example.com", "5551234567", "Elm", "Town"] {
            type_str(&mut app, &dispatcher, value);
            handle_key(&mut app, &dispatcher, KeyCode::Tab);
        }
        handle_key(&mut app, &dispatcher, KeyCode::Enter);
        handle_key(&mut app, &dispatcher, KeyCode::Enter);
        app.store.apply(rx.recv().await.unwrap());
        app.sync_with_store();
        assert_eq!(app.store.error(), Some("Failed to create user"));
        assert!(matches!(app.modal, Some(ModalState::Form(_))));
        assert_eq!(api.call_count(), 1);

        api.recover(Operation::Create).await;
        handle_key(&mut app, &dispatcher, KeyCode::Enter);
        app.store.apply(rx.recv().await.unwrap());
        app.sync_with_store();
        assert!(app.modal.is_none());
        assert_eq!(api.call_count(), 2);
        assert_eq!(app.store.find(3).map(|u| u.name.as_str()), Some("Carol"));
    }

    #[tokio::test]
    async fn invalid_new_user_issues_no_request() {
        let (mut app, dispatcher, mut rx, api) = setup();
        handle_key(&mut app, &dispatcher, KeyCode::Char('n'));
        type_str(&mut app, &dispatcher, "Al");
        handle_key(&mut app, &dispatcher, KeyCode::Enter);

        match &app.modal {
            Some(ModalState::Form(form)) => {
                assert!(form.error_for(FormField::Name).is_some());
                assert!(form.error_for(FormField::Email).is_some());
            }
            other => panic!("expected form, got {other:?}"),
        }
        assert_eq!(api.call_count(), 0);
        assert!(rx.try_recv().is_err());

        handle_key(&mut app, &dispatcher, KeyCode::Esc);
        assert!(app.modal.is_none());
        assert!(app.store.editing().is_none());
    }

    #[tokio::test]
    async fn delete_confirmation_defaults_to_no() {
        let (mut app, dispatcher, mut rx, api) = setup();
        handle_key(&mut app, &dispatcher, KeyCode::Char('d'));
        handle_key(&mut app, &dispatcher, KeyCode::Enter);
        assert_eq!(api.call_count(), 0);

        handle_key(&mut app, &dispatcher, KeyCode::Char('d'));
        handle_key(&mut app, &dispatcher, KeyCode::Char('y'));
        app.store.apply(rx.recv().await.unwrap());
        app.sync_with_store();
        assert!(app.store.find(1).is_none());
        assert_eq!(app.selected_user().map(|u| u.name.as_str()), Some("Bob"));
    }

    #[tokio::test]
    async fn detail_screen_and_search_navigation() {
        let (mut app, dispatcher, _rx, _api) = setup();
        handle_key(&mut app, &dispatcher, KeyCode::Char('/'));
        type_str(&mut app, &dispatcher, "bob");
        handle_key(&mut app, &dispatcher, KeyCode::Enter);
        assert_eq!(app.visible, vec![1]);

        handle_key(&mut app, &dispatcher, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Detail(2));
        handle_key(&mut app, &dispatcher, KeyCode::Esc);
        assert_eq!(app.screen, Screen::List);
        handle_key(&mut app, &dispatcher, KeyCode::Esc);
        assert_eq!(app.visible, vec![0, 1]);

        assert_eq!(handle_key(&mut app, &dispatcher, KeyCode::Char('q')), Flow::Quit);
    }
}
