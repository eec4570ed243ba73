//! # Views
//!
//! Askama page templates and the display models they render. Everything here
//! is plain data built from `domains` types; no HTTP types leak in.

use askama::Template;
use domains::{Dashboard, InteractionKind, PostDetail, PostDraft, PostView, RequestContext, UserId};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Header state shared by every page.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub username: Option<String>,
}

impl Nav {
    pub fn for_ctx(ctx: &RequestContext) -> Self {
        Self { username: ctx.viewer.as_ref().map(|v| v.username.clone()) }
    }
}

/// One post or comment as it appears on a page.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub id: String,
    pub parent_id: Option<String>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub paragraphs: Vec<String>,
    pub author: String,
    pub created_at: String,
    pub edited: bool,
    pub likes: i64,
    pub dislikes: i64,
    pub liked: bool,
    pub disliked: bool,
    pub can_interact: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl PostCard {
    /// A top-level post: only its author may edit or delete it.
    pub fn post(view: &PostView, viewer: Option<UserId>) -> Self {
        let owned = viewer.is_some_and(|v| view.post.is_authored_by(v));
        Self { can_edit: owned, can_delete: owned, ..Self::base(view, viewer) }
    }

    /// A comment under a post written by `parent_author`. Either author may delete it.
    pub fn comment(view: &PostView, viewer: Option<UserId>, parent_author: Option<UserId>) -> Self {
        let can_delete = viewer.is_some_and(|v| {
            view.post.is_authored_by(v) || parent_author == Some(v)
        });
        Self { can_delete, ..Self::base(view, viewer) }
    }

    fn base(view: &PostView, viewer: Option<UserId>) -> Self {
        let post = &view.post;
        Self {
            id: post.id.to_string(),
            parent_id: post.parent_id.map(|p| p.to_string()),
            title: post.title.clone(),
            abstract_text: post.abstract_text.clone(),
            paragraphs: paragraphs(&post.text),
            author: view.author_name.clone().unwrap_or_else(|| "anonymous".into()),
            created_at: post.created_at.format(DATE_FORMAT).to_string(),
            edited: post.updated_at > post.created_at,
            likes: view.tally.likes,
            dislikes: view.tally.dislikes,
            liked: view.viewer_interaction == Some(InteractionKind::Like),
            disliked: view.viewer_interaction == Some(InteractionKind::Dislike),
            can_interact: viewer.is_some(),
            can_edit: false,
            can_delete: false,
        }
    }
}

/// Splits body text on blank lines, dropping empty paragraphs.
fn paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Template)]
#[template(path = "post_list.html")]
pub struct PostListPage {
    pub nav: Nav,
    pub posts: Vec<PostCard>,
}

impl PostListPage {
    pub fn new(ctx: &RequestContext, views: &[PostView]) -> Self {
        let viewer = ctx.viewer_id();
        Self {
            nav: Nav::for_ctx(ctx),
            posts: views.iter().map(|v| PostCard::post(v, viewer)).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "post_form.html")]
pub struct PostFormPage {
    pub nav: Nav,
    pub heading: &'static str,
    pub action: String,
    pub title: String,
    pub abstract_text: String,
    pub text: String,
    pub error: Option<String>,
}

impl PostFormPage {
    pub fn create(ctx: &RequestContext, draft: PostDraft) -> Self {
        Self::with_draft(ctx, "New post", "/posts/new".into(), draft)
    }

    pub fn edit(ctx: &RequestContext, id: impl std::fmt::Display, draft: PostDraft) -> Self {
        Self::with_draft(ctx, "Edit post", format!("/posts/{id}/edit"), draft)
    }

    fn with_draft(ctx: &RequestContext, heading: &'static str, action: String, draft: PostDraft) -> Self {
        Self {
            nav: Nav::for_ctx(ctx),
            heading,
            action,
            title: draft.title,
            abstract_text: draft.abstract_text.unwrap_or_default(),
            text: draft.text,
            error: None,
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

#[derive(Template)]
#[template(path = "post_detail.html")]
pub struct PostDetailPage {
    pub nav: Nav,
    pub post: PostCard,
    pub comments: Vec<PostCard>,
    pub comment_text: String,
    pub error: Option<String>,
}

impl PostDetailPage {
    pub fn new(ctx: &RequestContext, detail: &PostDetail) -> Self {
        let viewer = ctx.viewer_id();
        let parent_author = detail.post.post.author_id;
        Self {
            nav: Nav::for_ctx(ctx),
            post: PostCard::post(&detail.post, viewer),
            comments: detail
                .comments
                .iter()
                .map(|c| PostCard::comment(c, viewer, parent_author))
                .collect(),
            comment_text: String::new(),
            error: None,
        }
    }

    /// Re-renders the page with the rejected comment kept in the form.
    pub fn with_rejected_comment(mut self, text: String, message: impl Into<String>) -> Self {
        self.comment_text = text;
        self.error = Some(message.into());
        self
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub nav: Nav,
    pub posts: Vec<PostCard>,
    pub comments: Vec<PostCard>,
}

impl DashboardPage {
    pub fn new(ctx: &RequestContext, dashboard: &Dashboard) -> Self {
        let viewer = ctx.viewer_id();
        Self {
            nav: Nav::for_ctx(ctx),
            posts: dashboard.posts.iter().map(|v| PostCard::post(v, viewer)).collect(),
            // Own comments are always deletable by their author
            comments: dashboard
                .comments
                .iter()
                .map(|v| PostCard::comment(v, viewer, None))
                .collect(),
        }
    }
}

/// Which credential form to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Template)]
#[template(path = "auth.html")]
pub struct AuthPage {
    pub nav: Nav,
    pub heading: &'static str,
    pub action: &'static str,
    pub alternate_href: &'static str,
    pub alternate_label: &'static str,
    pub username: String,
    pub error: Option<String>,
}

impl AuthPage {
    pub fn new(ctx: &RequestContext, mode: AuthMode) -> Self {
        let (heading, action, alternate_href, alternate_label) = match mode {
            AuthMode::Login => ("Sign in", "/auth/login", "/auth/register", "Create an account"),
            AuthMode::Register => ("Create an account", "/auth/register", "/auth/login", "Sign in instead"),
        };
        Self {
            nav: Nav::for_ctx(ctx),
            heading,
            action,
            alternate_href,
            alternate_label,
            username: String::new(),
            error: None,
        }
    }

    pub fn with_error(mut self, username: &str, message: impl Into<String>) -> Self {
        self.username = username.to_string();
        self.error = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domains::{CommentDraft, Post, PostId, Tally, Viewer};

    fn ctx_for(id: UserId) -> RequestContext {
        RequestContext::authenticated(Viewer { id, username: "ada".into() })
    }

    fn view(post: Post, author: Option<&str>) -> PostView {
        PostView {
            post,
            author_name: author.map(str::to_string),
            tally: Tally { likes: 3, dislikes: 1 },
            viewer_interaction: Some(InteractionKind::Like),
        }
    }

    fn draft(title: &str, text: &str) -> PostDraft {
        PostDraft { title: title.into(), abstract_text: None, text: text.into() }
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        assert_eq!(paragraphs("one\n\n\n\ntwo\nstill two\n\n  "), vec!["one", "two\nstill two"]);
    }

    #[test]
    fn only_the_author_can_edit_a_post() {
        let author = UserId::new();
        let v = view(Post::top_level(author, draft("t", "x")), Some("ada"));

        let mine = PostCard::post(&v, Some(author));
        assert!(mine.can_edit && mine.can_delete && mine.liked && !mine.disliked);

        let theirs = PostCard::post(&v, Some(UserId::new()));
        assert!(!theirs.can_edit && !theirs.can_delete && theirs.can_interact);

        let anon = PostCard::post(&v, None);
        assert!(!anon.can_interact);
    }

    #[test]
    fn parent_author_can_delete_anonymous_comment() {
        let parent_author = UserId::new();
        let comment = Post::comment(PostId::new(), None, CommentDraft { text: "hi".into() });
        let v = view(comment, None);

        let card = PostCard::comment(&v, Some(parent_author), Some(parent_author));
        assert!(card.can_delete);
        assert!(!card.can_edit);
        assert_eq!(card.author, "anonymous");

        assert!(!PostCard::comment(&v, Some(UserId::new()), Some(parent_author)).can_delete);
    }

    #[test]
    fn edited_flag_follows_updated_at() {
        let mut post = Post::top_level(UserId::new(), draft("t", "x"));
        post.updated_at = post.created_at + Duration::seconds(5);
        assert!(PostCard::post(&view(post, None), None).edited);
    }

    #[test]
    fn list_page_escapes_and_renders_titles() {
        let id = UserId::new();
        let v = view(Post::top_level(id, draft("<b>bold</b>", "body")), Some("ada"));
        let html = PostListPage::new(&ctx_for(id), &[v]).render().unwrap();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("ada"));
    }

    #[test]
    fn form_page_shows_error_and_keeps_input() {
        let ctx = ctx_for(UserId::new());
        let html = PostFormPage::edit(&ctx, PostId::new(), draft("kept", "  "))
            .with_error("text must not be blank")
            .render()
            .unwrap();
        assert!(html.contains("text must not be blank"));
        assert!(html.contains("value=\"kept\""));
    }

    #[test]
    fn auth_page_links_to_the_other_form() {
        let html = AuthPage::new(&RequestContext::anonymous(), AuthMode::Login).render().unwrap();
        assert!(html.contains("action=\"/auth/login\""));
        assert!(html.contains("href=\"/auth/register\""));
    }
}
