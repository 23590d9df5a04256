use crate::app::AppState;
use crate::model::User;

/// Indices of the users matching `query`, case-insensitively, on name, email,
/// username, phone, city or id. An empty query matches everything.
pub fn filter_users(users: &[User], query: &str) -> Vec<usize> {
    let q = query.to_lowercase();
    users
        .iter()
        .enumerate()
        .filter(|(_, u)| {
            q.is_empty()
                || u.name.to_lowercase().contains(&q)
                || u.email.to_lowercase().contains(&q)
                || u.username.to_lowercase().contains(&q)
                || u.phone.to_lowercase().contains(&q)
                || u.address.city.to_lowercase().contains(&q)
                || u.id.is_some_and(|id| id.to_string().contains(&q))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Recompute the visible rows from the store and keep the selection in range.
pub fn apply_search(app: &mut AppState) {
    app.visible = filter_users(app.store.users(), &app.search_query);
    app.selected = app.selected.min(app.visible.len().saturating_sub(1));
}
