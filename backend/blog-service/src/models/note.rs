use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Note summary for list views
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct NoteListItem {
    pub id: Uuid,
    pub title: String,
}

impl From<&Note> for NoteListItem {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub body: String,
    pub user_id: String,
}
