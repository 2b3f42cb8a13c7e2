/// Blog Service Library
///
/// Server-rendered blog and notes application: public post pages, an
/// authenticated post admin, and per-user notes.
///
/// # Modules
///
/// - `api`: Route handlers (loaders and form actions)
/// - `repository`: Data access for posts and notes (Postgres or in-memory)
/// - `validation`: Field-keyed form validation
/// - `views`: Page templates and pending-submission state
/// - `middleware`: Session verification
/// - `config`: Configuration management
/// - `error`: Error types and responses
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod validation;
pub mod views;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub use config::Config;
pub use error::{AppError, Result};

use crate::db::Database;
use crate::repository::{
    MemoryNoteRepository, MemoryPostRepository, NoteRepository, PgNoteRepository,
    PgPostRepository, PostRepository,
};
use crate::views::Views;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub views: Arc<Views>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        notes: Arc<dyn NoteRepository>,
        config: Config,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            posts,
            notes,
            views: Arc::new(Views::new()?),
            config: Arc::new(config),
        })
    }

    /// State backed by process memory; contents are lost on restart.
    pub fn in_memory(config: Config) -> anyhow::Result<Self> {
        Self::new(
            Arc::new(MemoryPostRepository::new()),
            Arc::new(MemoryNoteRepository::new()),
            config,
        )
    }

    pub fn postgres(db: &Database, config: Config) -> anyhow::Result<Self> {
        Self::new(
            Arc::new(PgPostRepository::new(db.pg.clone())),
            Arc::new(PgNoteRepository::new(db.pg.clone())),
            config,
        )
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(api::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
