use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NoteRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::models::{NewNote, NewPost, Note, NoteListItem, Post, PostUpdate};

/// Posts kept in insertion order.
#[derive(Default)]
pub struct MemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_taken(slug: &str) -> AppError {
    AppError::Conflict(format!("A post with slug '{}' already exists", slug))
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn get_posts(&self) -> Result<Vec<Post>> {
        Ok(self.posts.read().await.clone())
    }

    async fn get_posts_by_user_id(&self, user_id: &str) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_post(&self, slug: &str) -> Result<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(slug_taken(&post.slug));
        }

        let now = Utc::now();
        let post = Post {
            slug: post.slug,
            title: post.title,
            markdown: post.markdown,
            user_id: post.user_id,
            created_at: now,
            updated_at: now,
        };
        posts.push(post.clone());

        Ok(post)
    }

    async fn update_post(
        &self,
        slug: &str,
        user_id: &str,
        update: PostUpdate,
    ) -> Result<Option<Post>> {
        let mut posts = self.posts.write().await;
        let Some(index) = posts
            .iter()
            .position(|p| p.slug == slug && p.user_id == user_id)
        else {
            return Ok(None);
        };

        if update.slug != slug && posts.iter().any(|p| p.slug == update.slug) {
            return Err(slug_taken(&update.slug));
        }

        let post = &mut posts[index];
        post.slug = update.slug;
        post.title = update.title;
        post.markdown = update.markdown;
        post.updated_at = Utc::now();

        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, slug: &str, user_id: &str) -> Result<bool> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| !(p.slug == slug && p.user_id == user_id));
        Ok(posts.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryNoteRepository {
    notes: RwLock<Vec<Note>>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn get_note_list_items(&self, user_id: &str) -> Result<Vec<NoteListItem>> {
        let notes = self.notes.read().await;
        let mut owned: Vec<&Note> = notes.iter().filter(|n| n.user_id == user_id).collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned.into_iter().map(NoteListItem::from).collect())
    }

    async fn get_note(&self, id: Uuid, user_id: &str) -> Result<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes
            .iter()
            .find(|n| n.id == id && n.user_id == user_id)
            .cloned())
    }

    async fn create_note(&self, note: NewNote) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: note.title,
            body: note.body,
            user_id: note.user_id,
            created_at: now,
            updated_at: now,
        };
        self.notes.write().await.push(note.clone());

        Ok(note)
    }

    async fn delete_note(&self, id: Uuid, user_id: &str) -> Result<bool> {
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| !(n.id == id && n.user_id == user_id));
        Ok(notes.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(slug: &str, user_id: &str) -> NewPost {
        NewPost {
            slug: slug.to_string(),
            title: format!("Title of {}", slug),
            markdown: "# Hello".to_string(),
            user_id: user_id.to_string(),
        }
    }

    fn rename_to(slug: &str, title: &str) -> PostUpdate {
        PostUpdate {
            slug: slug.to_string(),
            title: title.to_string(),
            markdown: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn test_post_lifecycle() {
        let repo = MemoryPostRepository::new();
        repo.create_post(new_post("foo", "alice")).await.unwrap();

        let updated = repo
            .update_post("foo", "alice", rename_to("bar", "Bar"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.slug, "bar");
        assert_eq!(updated.user_id, "alice");
        assert!(repo.get_post("foo").await.unwrap().is_none());
        assert_eq!(repo.get_post("bar").await.unwrap().unwrap().title, "Bar");

        assert!(repo.delete_post("bar", "alice").await.unwrap());
        assert!(!repo.delete_post("bar", "alice").await.unwrap());
        assert!(repo.get_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let repo = MemoryPostRepository::new();
        repo.create_post(new_post("foo", "alice")).await.unwrap();
        repo.create_post(new_post("bar", "alice")).await.unwrap();

        let err = repo.create_post(new_post("foo", "bob")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = repo
            .update_post("bar", "alice", rename_to("foo", "t"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_post_is_none() {
        let repo = MemoryPostRepository::new();
        let result = repo
            .update_post("missing", "alice", rename_to("x", "t"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_writes_only_touch_the_owners_post() {
        let repo = MemoryPostRepository::new();
        let original = repo.create_post(new_post("foo", "bob")).await.unwrap();

        let result = repo
            .update_post("foo", "alice", rename_to("stolen", "Stolen"))
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(!repo.delete_post("foo", "alice").await.unwrap());

        assert_eq!(repo.get_post("foo").await.unwrap(), Some(original));
        assert!(repo.get_post("stolen").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_posts_by_user() {
        let repo = MemoryPostRepository::new();
        repo.create_post(new_post("a", "alice")).await.unwrap();
        repo.create_post(new_post("b", "bob")).await.unwrap();
        repo.create_post(new_post("c", "alice")).await.unwrap();

        let slugs: Vec<String> = repo
            .get_posts_by_user_id("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_notes_are_scoped_to_owner() {
        let repo = MemoryNoteRepository::new();
        let note = repo
            .create_note(NewNote {
                title: "Groceries for the week".to_string(),
                body: "milk".to_string(),
                user_id: "alice".to_string(),
            })
            .await
            .unwrap();

        assert!(repo.get_note(note.id, "bob").await.unwrap().is_none());
        assert!(repo.get_note_list_items("bob").await.unwrap().is_empty());
        assert!(!repo.delete_note(note.id, "bob").await.unwrap());

        let items = repo.get_note_list_items("alice").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Groceries for the week");

        assert!(repo.delete_note(note.id, "alice").await.unwrap());
        assert!(repo.get_note(note.id, "alice").await.unwrap().is_none());
    }
}
