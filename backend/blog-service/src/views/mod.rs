//! Server-rendered pages.
//!
//! Templates are compiled into the binary and registered once. Each page has
//! a method on [`Views`] taking the loader data, the errors of the last
//! action (if any) and the current [`Navigation`].

mod navigation;

use minijinja::{context, Environment, Value};
use pulldown_cmark::{html, Event, Options, Parser};
use serde::Serialize;

use crate::api::NEW_POST_ACTION;
use crate::models::{Note, NoteListItem, Post};
use crate::validation::FieldErrors;

pub use navigation::{FormStatus, Navigation, NavigationState, SubmitButton};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("posts/index.html", include_str!("../../templates/posts/index.html")),
    ("posts/detail.html", include_str!("../../templates/posts/detail.html")),
    ("posts/admin/layout.html", include_str!("../../templates/posts/admin/layout.html")),
    ("posts/admin/index.html", include_str!("../../templates/posts/admin/index.html")),
    ("posts/admin/new.html", include_str!("../../templates/posts/admin/new.html")),
    ("posts/admin/edit.html", include_str!("../../templates/posts/admin/edit.html")),
    ("notes/index.html", include_str!("../../templates/notes/index.html")),
    ("notes/new.html", include_str!("../../templates/notes/new.html")),
    ("notes/detail.html", include_str!("../../templates/notes/detail.html")),
];

/// Render CommonMark to HTML.
///
/// Raw HTML in the source is emitted as escaped text, never as markup.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Values typed into the post form, echoed back when validation fails.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostFormValues {
    pub title: String,
    pub slug: String,
    pub markdown: String,
}

impl From<&Post> for PostFormValues {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            markdown: post.markdown.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteFormValues {
    pub title: String,
    pub body: String,
}

/// Sidebar shared by every admin page.
#[derive(Debug, Serialize)]
struct AdminNav<'a> {
    posts: &'a [Post],
    optimistic_title: Option<&'a str>,
    new_post_action: &'static str,
}

impl<'a> AdminNav<'a> {
    fn new(posts: &'a [Post], navigation: &'a Navigation) -> Self {
        Self {
            posts,
            optimistic_title: navigation.optimistic_post_title(),
            new_post_action: NEW_POST_ACTION,
        }
    }
}

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_filter("markdown", |source: String| {
            Value::from_safe_string(render_markdown(&source))
        });
        // Slugs are free text; links must carry them as one encoded segment
        env.add_filter("path_segment", |segment: String| {
            urlencoding::encode(&segment).into_owned()
        });
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    pub fn posts_index(&self, posts: &[Post]) -> Result<String, minijinja::Error> {
        self.render("posts/index.html", context! { posts })
    }

    pub fn post_detail(&self, post: &Post) -> Result<String, minijinja::Error> {
        self.render("posts/detail.html", context! { post })
    }

    pub fn admin_index(
        &self,
        posts: &[Post],
        navigation: &Navigation,
    ) -> Result<String, minijinja::Error> {
        self.render(
            "posts/admin/index.html",
            context! { admin => AdminNav::new(posts, navigation) },
        )
    }

    pub fn admin_new_post(
        &self,
        posts: &[Post],
        values: &PostFormValues,
        errors: Option<&FieldErrors>,
        navigation: &Navigation,
    ) -> Result<String, minijinja::Error> {
        let status = FormStatus::resolve(navigation, "post", NEW_POST_ACTION, None, errors);
        let button = SubmitButton::new("Create Post", "Creating...", status, false);

        self.render(
            "posts/admin/new.html",
            context! {
                admin => AdminNav::new(posts, navigation),
                action => NEW_POST_ACTION,
                values,
                errors,
                status,
                button,
            },
        )
    }

    /// Edit page for the post stored under `slug_original`.
    pub fn admin_edit_post(
        &self,
        posts: &[Post],
        slug_original: &str,
        values: &PostFormValues,
        errors: Option<&FieldErrors>,
        navigation: &Navigation,
    ) -> Result<String, minijinja::Error> {
        let action = crate::api::admin_post_path(slug_original);
        let updating = FormStatus::resolve(navigation, "post", &action, Some("update"), errors);
        let deleting = FormStatus::resolve(navigation, "post", &action, Some("delete"), None);
        let busy = updating == FormStatus::Submitting || deleting == FormStatus::Submitting;

        self.render(
            "posts/admin/edit.html",
            context! {
                admin => AdminNav::new(posts, navigation),
                action,
                slug_original,
                values,
                errors,
                status => updating,
                update_button => SubmitButton::new("Update Post", "Saving...", updating, busy),
                delete_button => SubmitButton::new("Delete Post", "Deleting...", deleting, busy),
            },
        )
    }

    pub fn notes_index(&self, notes: &[NoteListItem]) -> Result<String, minijinja::Error> {
        self.render("notes/index.html", context! { notes })
    }

    pub fn new_note(
        &self,
        values: &NoteFormValues,
        errors: Option<&FieldErrors>,
        navigation: &Navigation,
    ) -> Result<String, minijinja::Error> {
        let action = crate::api::NEW_NOTE_ACTION;
        let status = FormStatus::resolve(navigation, "post", action, None, errors);

        self.render(
            "notes/new.html",
            context! {
                action,
                values,
                errors,
                status,
                button => SubmitButton::new("Save", "Saving...", status, false),
            },
        )
    }

    pub fn note_detail(&self, note: &Note) -> Result<String, minijinja::Error> {
        self.render("notes/detail.html", context! { note })
    }
}
