use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::form::{page, validation_failed, FormData};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::NewNote;
use crate::validation::validate_form;
use crate::views::{Navigation, NoteFormValues};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notes))
        .route("/new", get(new_note_form).post(create_note))
        .route("/:id", get(get_note).post(delete_note))
}

const NOTE_FIELDS: &[&str] = &["title", "body"];

#[derive(Debug, Validate)]
pub struct CreateNoteForm {
    #[validate(length(min = 12, message = "A minimum of 12 chars is required for title."))]
    pub title: String,
    #[validate(length(min = 144, message = "A minimum of 144 chars is required for body."))]
    pub body: String,
}

impl CreateNoteForm {
    fn from_form(form: &FormData) -> Self {
        Self {
            title: form.text("title"),
            body: form.text("body"),
        }
    }

    fn values(&self) -> NoteFormValues {
        NoteFormValues {
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}

fn note_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Note not found: {}", id))
}

/// Unparseable ids cannot name a stored note.
fn parse_note_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| note_not_found(raw))
}

async fn list_notes(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
) -> Result<Response> {
    let notes = state.notes.get_note_list_items(&user.id).await?;

    page(&headers, json!({ "notes": &notes }), || {
        state.views.notes_index(&notes)
    })
}

async fn new_note_form(
    State(state): State<AppState>,
    _user: CurrentUser,
    headers: HeaderMap,
) -> Result<Response> {
    page(&headers, json!({}), || {
        state
            .views
            .new_note(&NoteFormValues::default(), None, &Navigation::idle())
    })
}

async fn create_note(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
    form: FormData,
) -> Result<Response> {
    let input = CreateNoteForm::from_form(&form);

    if let Err(errors) = validate_form(&input, NOTE_FIELDS) {
        tracing::debug!(user_id = %user.id, ?errors, "Rejected new note");
        return validation_failed(&headers, errors, |errors| {
            state
                .views
                .new_note(&input.values(), Some(errors), &Navigation::idle())
        });
    }

    let note = state
        .notes
        .create_note(NewNote {
            title: input.title,
            body: input.body,
            user_id: user.id.clone(),
        })
        .await?;

    tracing::info!(note_id = %note.id, user_id = %user.id, "Note created");

    Ok(Redirect::to(&format!("/notes/{}", note.id)).into_response())
}

async fn get_note(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response> {
    let note_id = parse_note_id(&id)?;
    let note = state
        .notes
        .get_note(note_id, &user.id)
        .await?
        .ok_or_else(|| note_not_found(&id))?;

    page(&headers, json!({ "note": &note }), || {
        state.views.note_detail(&note)
    })
}

async fn delete_note(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let note_id = parse_note_id(&id)?;
    if !state.notes.delete_note(note_id, &user.id).await? {
        return Err(note_not_found(&id));
    }

    tracing::info!(note_id = %note_id, user_id = %user.id, "Note deleted");

    Ok(Redirect::to("/notes").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_title_and_body_are_rejected_together() {
        let form = FormData::new(vec![
            ("title".into(), "Too short".into()),
            ("body".into(), "tiny".into()),
        ]);
        let errors = validate_form(&CreateNoteForm::from_form(&form), NOTE_FIELDS).unwrap_err();
        assert_eq!(
            errors.get("title"),
            Some("A minimum of 12 chars is required for title.")
        );
        assert_eq!(
            errors.get("body"),
            Some("A minimum of 144 chars is required for body.")
        );
    }

    #[test]
    fn lengths_at_the_minimum_pass() {
        let input = CreateNoteForm {
            title: "a".repeat(12),
            body: "b".repeat(144),
        };
        assert!(validate_form(&input, NOTE_FIELDS).is_ok());
    }

    #[test]
    fn malformed_note_id_is_not_found() {
        assert!(matches!(parse_note_id("nope"), Err(AppError::NotFound(_))));
    }
}
