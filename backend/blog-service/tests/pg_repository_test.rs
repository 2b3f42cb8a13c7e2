//! Postgres repository tests.
//!
//! Need a disposable database: `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`

use blog_service::error::AppError;
use blog_service::models::{NewNote, NewPost, PostUpdate};
use blog_service::repository::{NoteRepository, PgNoteRepository, PgPostRepository, PostRepository};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

async fn pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore]
async fn post_lifecycle_round_trips_through_postgres() {
    let repo = PgPostRepository::new(pool().await);
    let user = unique("user");
    let slug = unique("post");

    let created = repo
        .create_post(NewPost {
            slug: slug.clone(),
            title: "Hello".into(),
            markdown: "# Hello".into(),
            user_id: user.clone(),
        })
        .await
        .unwrap();
    assert_eq!(created.user_id, user);

    let duplicate = repo
        .create_post(NewPost {
            slug: slug.clone(),
            title: "Again".into(),
            markdown: "x".into(),
            user_id: user.clone(),
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let renamed = unique("renamed");
    let updated = repo
        .update_post(
            &slug,
            &user,
            PostUpdate {
                slug: renamed.clone(),
                title: "Renamed".into(),
                markdown: "body".into(),
            },
        )
        .await
        .unwrap()
        .expect("post exists");
    assert_eq!(updated.slug, renamed);
    assert!(repo.get_post(&slug).await.unwrap().is_none());

    let mine = repo.get_posts_by_user_id(&user).await.unwrap();
    assert_eq!(mine.len(), 1);

    assert!(!repo.delete_post(&renamed, "someone-else").await.unwrap());
    assert!(repo.delete_post(&renamed, &user).await.unwrap());
    assert!(!repo.delete_post(&renamed, &user).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn notes_are_scoped_to_their_owner() {
    let repo = PgNoteRepository::new(pool().await);
    let owner = unique("owner");
    let other = unique("other");

    let note = repo
        .create_note(NewNote {
            title: "A note title".into(),
            body: "b".repeat(144),
            user_id: owner.clone(),
        })
        .await
        .unwrap();

    assert!(repo.get_note(note.id, &other).await.unwrap().is_none());
    assert!(!repo.delete_note(note.id, &other).await.unwrap());

    let items = repo.get_note_list_items(&owner).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, note.id);

    assert!(repo.delete_note(note.id, &owner).await.unwrap());
    assert!(repo.get_note(note.id, &owner).await.unwrap().is_none());
}
