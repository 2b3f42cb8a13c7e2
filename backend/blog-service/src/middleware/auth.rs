use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::api::form::wants_json;
use crate::error::AppError;
use crate::AppState;

/// Session claims issued by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub exp: usize,
    pub iat: usize,
}

/// The user acting on the current request.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
}

/// Session token from the configured cookie, falling back to a bearer header.
fn session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(cookie_name) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

pub fn verify_token(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Login URL carrying the full requested path; nested routers strip their
/// prefix from `parts.uri`, so the original URI wins when present.
fn login_location(login_url: &str, parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);
    let redirect_to = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!(
        "{}?redirectTo={}",
        login_url,
        urlencoding::encode(redirect_to)
    )
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = session_token(parts, &state.config.auth.cookie_name)
            .and_then(|token| verify_token(&token, &state.config.jwt.secret));

        match claims {
            Some(claims) => Ok(CurrentUser { id: claims.sub }),
            None if wants_json(&parts.headers) => Err(AppError::Unauthorized),
            None => {
                tracing::debug!(path = %parts.uri.path(), "No valid session, redirecting to login");
                Err(AppError::LoginRequired(login_location(
                    &state.config.auth.login_url,
                    parts,
                )))
            }
        }
    }
}
