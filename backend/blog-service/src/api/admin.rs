use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde_json::json;
use validator::Validate;

use super::form::{page, validation_failed, FormData};
use super::{action_delay, admin_post_path, ADMIN_PATH};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{NewPost, Post, PostUpdate};
use crate::validation::{validate_form, FieldErrors};
use crate::views::{Navigation, PostFormValues};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_index))
        .route("/admin/new", get(new_post_form).post(create_post))
        .route("/admin/:slug", get(edit_post_form).post(edit_post_action))
}

const POST_FIELDS: &[&str] = &["title", "slug", "markdown"];

#[derive(Debug, Validate)]
pub struct CreatePostForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Slug name is required"))]
    pub slug: String,
    #[validate(length(min = 1, message = "Markdown content is required"))]
    pub markdown: String,
}

impl CreatePostForm {
    fn from_form(form: &FormData) -> Self {
        Self {
            title: form.text("title"),
            slug: form.text("slug"),
            markdown: form.text("markdown"),
        }
    }

    fn values(&self) -> PostFormValues {
        PostFormValues {
            title: self.title.clone(),
            slug: self.slug.clone(),
            markdown: self.markdown.clone(),
        }
    }
}

/// Edit action intents, carried by the submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Update,
    Delete,
}

impl Intent {
    fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some("update") => Ok(Intent::Update),
            Some("delete") => Ok(Intent::Delete),
            other => Err(AppError::InvalidIntent(
                other.unwrap_or("<missing>").to_string(),
            )),
        }
    }
}

fn post_not_found(slug: &str) -> AppError {
    AppError::NotFound(format!("Post not found: {}", slug))
}

/// Load the post under `slug`, refusing posts owned by someone else.
async fn owned_post(state: &AppState, slug: &str, user: &CurrentUser) -> Result<Post> {
    let post = state
        .posts
        .get_post(slug)
        .await?
        .ok_or_else(|| post_not_found(slug))?;

    if post.user_id != user.id {
        tracing::warn!(slug = %slug, user_id = %user.id, "Refused access to another user's post");
        return Err(AppError::Forbidden);
    }

    Ok(post)
}

async fn admin_index(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
) -> Result<Response> {
    let posts = state.posts.get_posts_by_user_id(&user.id).await?;

    page(&headers, json!({ "posts": &posts }), || {
        state.views.admin_index(&posts, &Navigation::idle())
    })
}

async fn new_post_form(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
) -> Result<Response> {
    let posts = state.posts.get_posts_by_user_id(&user.id).await?;

    page(&headers, json!({ "posts": &posts }), || {
        state.views.admin_new_post(
            &posts,
            &PostFormValues::default(),
            None,
            &Navigation::idle(),
        )
    })
}

async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
    form: FormData,
) -> Result<Response> {
    let input = CreatePostForm::from_form(&form);

    if let Err(errors) = validate_form(&input, POST_FIELDS) {
        tracing::debug!(user_id = %user.id, ?errors, "Rejected new post");
        let posts = state.posts.get_posts_by_user_id(&user.id).await?;
        return validation_failed(&headers, errors, |errors| {
            state
                .views
                .admin_new_post(&posts, &input.values(), Some(errors), &Navigation::idle())
        });
    }

    action_delay(&state).await;

    let post = state
        .posts
        .create_post(NewPost {
            slug: input.slug,
            title: input.title,
            markdown: input.markdown,
            user_id: user.id.clone(),
        })
        .await?;

    tracing::info!(slug = %post.slug, user_id = %user.id, "Post created");

    Ok(Redirect::to(ADMIN_PATH).into_response())
}

async fn edit_post_form(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Response> {
    let post = owned_post(&state, &slug, &user).await?;
    let posts = state.posts.get_posts_by_user_id(&user.id).await?;

    page(&headers, json!({ "post": &post }), || {
        state.views.admin_edit_post(
            &posts,
            &post.slug,
            &PostFormValues::from(&post),
            None,
            &Navigation::idle(),
        )
    })
}

/// Update or delete the post named by the hidden `slug-original` field.
async fn edit_post_action(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
    form: FormData,
) -> Result<Response> {
    action_delay(&state).await;

    let slug_original = form
        .get("slug-original")
        .ok_or_else(|| AppError::BadRequest("slug-original must be a string".to_string()))?
        .to_string();

    match Intent::parse(form.get("intent"))? {
        Intent::Delete => {
            owned_post(&state, &slug_original, &user).await?;
            if !state.posts.delete_post(&slug_original, &user.id).await? {
                return Err(post_not_found(&slug_original));
            }

            tracing::info!(slug = %slug_original, user_id = %user.id, "Post deleted");

            Ok(Redirect::to(ADMIN_PATH).into_response())
        }
        Intent::Update => {
            owned_post(&state, &slug_original, &user).await?;

            let mut errors = FieldErrors::for_fields(POST_FIELDS);
            errors.require("title", form.get("title"), "Title is required");
            errors.require("slug", form.get("slug"), "Slug is required");
            errors.require("markdown", form.get("markdown"), "Markdown is required");

            if errors.has_errors() {
                tracing::debug!(slug = %slug_original, ?errors, "Rejected post update");
                let posts = state.posts.get_posts_by_user_id(&user.id).await?;
                let values = PostFormValues {
                    title: form.text("title"),
                    slug: form.text("slug"),
                    markdown: form.text("markdown"),
                };
                return validation_failed(&headers, errors, |errors| {
                    state.views.admin_edit_post(
                        &posts,
                        &slug_original,
                        &values,
                        Some(errors),
                        &Navigation::idle(),
                    )
                });
            }

            let post = state
                .posts
                .update_post(
                    &slug_original,
                    &user.id,
                    PostUpdate {
                        slug: form.text("slug"),
                        title: form.text("title"),
                        markdown: form.text("markdown"),
                    },
                )
                .await?
                .ok_or_else(|| post_not_found(&slug_original))?;

            tracing::info!(
                slug = %post.slug,
                previous_slug = %slug_original,
                user_id = %user.id,
                "Post updated"
            );

            Ok(Redirect::to(&admin_post_path(&post.slug)).into_response())
        }
    }
}
