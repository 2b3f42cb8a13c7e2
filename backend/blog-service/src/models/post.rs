use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Blog post, addressed publicly by its slug
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub markdown: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub slug: String,
    pub title: String,
    pub markdown: String,
    pub user_id: String,
}

/// Replacement fields for an existing post; `slug` may differ from the original.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub slug: String,
    pub title: String,
    pub markdown: String,
}
