mod admin;
pub mod form;
mod notes;
mod posts;

use std::time::Duration;

use axum::{response::Redirect, routing::get, Router};

use crate::AppState;

/// Form action creating a post; the admin list renders its pending title.
pub const NEW_POST_ACTION: &str = "/posts/admin/new";
pub const NEW_NOTE_ACTION: &str = "/notes/new";
pub const ADMIN_PATH: &str = "/posts/admin";

pub fn admin_post_path(slug: &str) -> String {
    format!("{}/{}", ADMIN_PATH, urlencoding::encode(slug))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/posts") }))
        .nest("/posts", posts::routes().merge(admin::routes()))
        .nest("/notes", notes::routes())
}

/// Hold a mutating action back so pending UI stays observable.
async fn action_delay(state: &AppState) {
    let delay_ms = state.config.app.action_delay_ms;
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
