use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};
use serde_json::json;

use super::form::page;
use crate::error::{AppError, Result};
use crate::views::render_markdown;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/:slug", get(get_post))
}

async fn list_posts(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let posts = state.posts.get_posts().await?;

    page(&headers, json!({ "posts": &posts }), || {
        state.views.posts_index(&posts)
    })
}

async fn get_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Response> {
    let post = state
        .posts
        .get_post(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post not found: {}", slug)))?;

    let html = render_markdown(&post.markdown);
    page(&headers, json!({ "post": &post, "html": html }), || {
        state.views.post_detail(&post)
    })
}
