//! Shared fixtures for the HTTP tests: an in-memory app, session tokens and
//! request builders.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{ACCEPT, CONTENT_TYPE, COOKIE, LOCATION},
        Request, StatusCode,
    },
    response::Response,
    Router,
};
use blog_service::middleware::Claims;
use blog_service::models::{NewPost, Post};
use blog_service::{app, AppState, Config};
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::in_memory(Config::in_memory(SECRET)).expect("app state");
        Self {
            router: app(state.clone()),
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn seed_post(&self, slug: &str, user_id: &str) -> Post {
        self.state
            .posts
            .create_post(NewPost {
                slug: slug.to_string(),
                title: format!("Post {}", slug),
                markdown: format!("# {}\n\nBody of {}.", slug, slug),
                user_id: user_id.to_string(),
            })
            .await
            .expect("seed post")
    }

    pub async fn post_slugs(&self) -> Vec<String> {
        self.state
            .posts
            .get_posts()
            .await
            .expect("list posts")
            .into_iter()
            .map(|p| p.slug)
            .collect()
    }
}

pub fn token(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode token")
}

fn with_session(builder: axum::http::request::Builder, user: Option<&str>) -> axum::http::request::Builder {
    match user {
        Some(user_id) => builder.header(COOKIE, format!("session={}", token(user_id))),
        None => builder,
    }
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// GET asking for loader data as JSON.
pub fn get_json(uri: &str, user: Option<&str>) -> Request<Body> {
    with_session(Request::builder().uri(uri), user)
        .header(ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap()
}

/// GET asking for the rendered page.
pub fn get_html(uri: &str, user: Option<&str>) -> Request<Body> {
    with_session(Request::builder().uri(uri), user)
        .header(ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap()
}

/// Urlencoded form POST; `json` selects the JSON error payload over the page.
pub fn post_form(uri: &str, user: Option<&str>, fields: &[(&str, &str)], json: bool) -> Request<Body> {
    let accept = if json { "application/json" } else { "text/html" };
    with_session(Request::builder().method("POST").uri(uri), user)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(ACCEPT, accept)
        .body(Body::from(encode_form(fields)))
        .unwrap()
}

pub fn post_multipart(uri: &str, user: Option<&str>, fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "TESTBOUNDARY";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            boundary, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", boundary));

    with_session(Request::builder().method("POST").uri(uri), user)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header(ACCEPT, "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
}

pub fn assert_redirect(response: &Response, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), to);
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
