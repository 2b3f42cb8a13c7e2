use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Browser request without a session; carries the login location to redirect to.
    #[error("Login required")]
    LoginRequired(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Invalid intent: {0}")]
    InvalidIntent(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::LoginRequired(_) => StatusCode::SEE_OTHER,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::InvalidIntent(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match &self {
            AppError::LoginRequired(location) => {
                return Redirect::to(location).into_response();
            }
            AppError::Unauthorized => ("UNAUTHORIZED", self.to_string()),
            AppError::Forbidden => ("FORBIDDEN", self.to_string()),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => ("BAD_REQUEST", msg.clone()),
            AppError::InvalidIntent(_) => {
                tracing::warn!("Rejected action: {}", self);
                ("INVALID_INTENT", self.to_string())
            }
            AppError::Conflict(msg) => ("CONFLICT", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ("DATABASE_ERROR", "Database error occurred".to_string())
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {:?}", e);
                ("TEMPLATE_ERROR", "Page could not be rendered".to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
