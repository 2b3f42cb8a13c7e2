//! Data access for posts and notes.
//!
//! Handlers only see the repository traits. Postgres backs production;
//! the in-memory implementations back local demos and the HTTP tests.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewNote, NewPost, Note, NoteListItem, Post, PostUpdate};

pub use memory::{MemoryNoteRepository, MemoryPostRepository};
pub use postgres::{PgNoteRepository, PgPostRepository};

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, oldest first.
    async fn get_posts(&self) -> Result<Vec<Post>>;

    /// Posts owned by `user_id`, oldest first.
    async fn get_posts_by_user_id(&self, user_id: &str) -> Result<Vec<Post>>;

    async fn get_post(&self, slug: &str) -> Result<Option<Post>>;

    /// Insert a post. A slug already in use is a `Conflict`.
    async fn create_post(&self, post: NewPost) -> Result<Post>;

    /// Replace the post `user_id` owns under `slug`, possibly renaming it.
    ///
    /// Returns `None` when that user owns no post with that slug. Renaming
    /// onto a slug held by another post is a `Conflict`.
    async fn update_post(
        &self,
        slug: &str,
        user_id: &str,
        update: PostUpdate,
    ) -> Result<Option<Post>>;

    /// Returns whether a post owned by `user_id` was removed.
    async fn delete_post(&self, slug: &str, user_id: &str) -> Result<bool>;
}

/// Notes are only ever reached through their owner.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Owner's notes, newest first.
    async fn get_note_list_items(&self, user_id: &str) -> Result<Vec<NoteListItem>>;

    async fn get_note(&self, id: Uuid, user_id: &str) -> Result<Option<Note>>;

    async fn create_note(&self, note: NewNote) -> Result<Note>;

    async fn delete_note(&self, id: Uuid, user_id: &str) -> Result<bool>;
}
