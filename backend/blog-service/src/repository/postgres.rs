use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NoteRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::models::{NewNote, NewPost, Note, NoteListItem, Post, PostUpdate};

/// Map a unique-key violation on `posts.slug` to a conflict, pass anything else through.
fn slug_conflict(err: sqlx::Error, slug: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("A post with slug '{}' already exists", slug))
        }
        _ => AppError::Database(err),
    }
}

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn get_posts(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT slug, title, markdown, user_id, created_at, updated_at
            FROM posts
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn get_posts_by_user_id(&self, user_id: &str) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT slug, title, markdown, user_id, created_at, updated_at
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn get_post(&self, slug: &str) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT slug, title, markdown, user_id, created_at, updated_at
            FROM posts
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (slug, title, markdown, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING slug, title, markdown, user_id, created_at, updated_at
            "#,
        )
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.markdown)
        .bind(&post.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| slug_conflict(e, &post.slug))
    }

    async fn update_post(
        &self,
        slug: &str,
        user_id: &str,
        update: PostUpdate,
    ) -> Result<Option<Post>> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET slug = $3, title = $4, markdown = $5, updated_at = NOW()
            WHERE slug = $1 AND user_id = $2
            RETURNING slug, title, markdown, user_id, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(user_id)
        .bind(&update.slug)
        .bind(&update.title)
        .bind(&update.markdown)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| slug_conflict(e, &update.slug))
    }

    async fn delete_post(&self, slug: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE slug = $1 AND user_id = $2")
            .bind(slug)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn get_note_list_items(&self, user_id: &str) -> Result<Vec<NoteListItem>> {
        let notes = sqlx::query_as::<_, NoteListItem>(
            r#"
            SELECT id, title
            FROM notes
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    async fn get_note(&self, id: Uuid, user_id: &str) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, body, user_id, created_at, updated_at
            FROM notes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    async fn create_note(&self, note: NewNote) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, title, body, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, body, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&note.title)
        .bind(&note.body)
        .bind(&note.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    async fn delete_note(&self, id: Uuid, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
