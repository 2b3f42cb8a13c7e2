use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::validation::FieldErrors;

/// Submitted form fields, from either a urlencoded or a multipart body.
///
/// Fields keep their submission order; when a name repeats, the first value wins.
#[derive(Debug, Clone, Default)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self(fields)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Field value, or an empty string when it was not submitted.
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        if !is_multipart(req.headers()) {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Self(fields));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut fields = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            // File parts carry nothing these forms read
            if field.file_name().is_some() {
                continue;
            }
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            fields.push((name, value));
        }

        Ok(Self(fields))
    }
}

/// Whether the client asked for loader/action data instead of a page.
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}

/// Answer a read request with `data` as JSON or with the rendered page.
pub fn page<T, F>(headers: &HeaderMap, data: T, render: F) -> Result<Response>
where
    T: Serialize,
    F: FnOnce() -> std::result::Result<String, minijinja::Error>,
{
    if wants_json(headers) {
        return Ok(Json(data).into_response());
    }
    Ok(Html(render()?).into_response())
}

/// Answer a rejected submission with 400: the field map as JSON, or the form
/// re-rendered with its errors inline.
pub fn validation_failed<F>(headers: &HeaderMap, errors: FieldErrors, render: F) -> Result<Response>
where
    F: FnOnce(&FieldErrors) -> std::result::Result<String, minijinja::Error>,
{
    if wants_json(headers) {
        let body = Json(json!({ "errors": errors }));
        return Ok((StatusCode::BAD_REQUEST, body).into_response());
    }
    let html = render(&errors)?;
    Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
}
