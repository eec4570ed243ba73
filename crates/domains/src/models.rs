//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Blog.
//! We use UUID v7 for time-ordered, globally unique identification.
//!
//! A comment is not a separate entity: it is a [`Post`] whose `parent_id` is set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::DomainError;

/// Longest title accepted by [`PostDraft::validate`].
pub const MAX_TITLE_CHARS: usize = 255;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Identity of a registered account.
    UserId
);
id_type!(
    /// Identity of a post or comment.
    PostId
);

/// A registered account. Owned by the accounts use case; everything else only references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// PHC-formatted password hash, never the password itself
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A post or, when `parent_id` is set, a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    /// Null for anonymous comments and after the author's account is removed
    pub author_id: Option<UserId>,
    pub parent_id: Option<PostId>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_comment(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author_id == Some(user)
    }

    /// Builds a fresh top-level post from a validated draft.
    pub fn top_level(author: UserId, draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: PostId::new(),
            author_id: Some(author),
            parent_id: None,
            title: Some(draft.title),
            abstract_text: draft.abstract_text,
            text: draft.text,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds a comment under `parent`. `author` is `None` for anonymous requests.
    pub fn comment(parent: PostId, author: Option<UserId>, draft: CommentDraft) -> Self {
        let now = Utc::now();
        Self {
            id: PostId::new(),
            author_id: author,
            parent_id: Some(parent),
            title: None,
            abstract_text: None,
            text: draft.text,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the editable fields and bumps `updated_at`.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = Some(draft.title);
        self.abstract_text = draft.abstract_text;
        self.text = draft.text;
        self.updated_at = Utc::now();
    }
}

/// The two symbols of the interaction automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Like,
    Dislike,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(DomainError::Validation(format!(
                "unknown interaction type '{other}'"
            ))),
        }
    }
}

/// One user's recorded opinion on one post. Unique per (post, user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub post_id: PostId,
    pub user_id: UserId,
    pub kind: InteractionKind,
    pub created_at: DateTime<Utc>,
}

/// Aggregated like/dislike counts for one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub likes: i64,
    pub dislikes: i64,
}

impl Tally {
    pub fn record(&mut self, kind: InteractionKind) {
        match kind {
            InteractionKind::Like => self.likes += 1,
            InteractionKind::Dislike => self.dislikes += 1,
        }
    }
}

/// User-supplied fields for creating or editing a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub abstract_text: Option<String>,
    pub text: String,
}

impl PostDraft {
    /// Trims the inputs, turns a blank abstract into `None` and checks the limits.
    pub fn validate(self) -> Result<Self, DomainError> {
        let title = self.title.trim().to_string();
        let text = self.text.trim().to_string();
        let abstract_text = self
            .abstract_text
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        if title.is_empty() {
            return Err(DomainError::Validation("title must not be blank".into()));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(DomainError::Validation(format!(
                "title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }
        if text.is_empty() {
            return Err(DomainError::Validation("text must not be blank".into()));
        }
        Ok(Self { title, abstract_text, text })
    }
}

/// User-supplied fields for a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDraft {
    pub text: String,
}

impl CommentDraft {
    pub fn validate(self) -> Result<Self, DomainError> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(DomainError::Validation("comment must not be blank".into()));
        }
        Ok(Self { text })
    }
}

/// A post enriched for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub post: Post,
    pub author_name: Option<String>,
    pub tally: Tally,
    /// The viewer's own interaction; always `None` for anonymous viewers
    pub viewer_interaction: Option<InteractionKind>,
}

/// A post with its direct comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetail {
    pub post: PostView,
    pub comments: Vec<PostView>,
}

/// Everything the signed-in viewer has written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub posts: Vec<PostView>,
    pub comments: Vec<PostView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, abstract_text: Option<&str>, text: &str) -> PostDraft {
        PostDraft {
            title: title.into(),
            abstract_text: abstract_text.map(Into::into),
            text: text.into(),
        }
    }

    #[test]
    fn test_draft_trims_and_drops_blank_abstract() {
        let d = draft("  Hello ", Some("   "), " body ").validate().unwrap();
        assert_eq!(d.title, "Hello");
        assert_eq!(d.abstract_text, None);
        assert_eq!(d.text, "body");
    }

    #[test]
    fn test_draft_rejects_blank_text_and_long_title() {
        assert!(matches!(
            draft("t", None, "  ").validate(),
            Err(DomainError::Validation(_))
        ));
        let long = "x".repeat(MAX_TITLE_CHARS + 1);
        assert!(matches!(
            draft(&long, None, "body").validate(),
            Err(DomainError::Validation(_))
        ));
        let exact = "é".repeat(MAX_TITLE_CHARS);
        assert!(draft(&exact, None, "body").validate().is_ok());
    }

    #[test]
    fn test_anonymous_comment_has_no_author() {
        let parent = PostId::new();
        let c = Post::comment(parent, None, CommentDraft { text: "hi".into() });
        assert!(c.is_comment());
        assert_eq!(c.parent_id, Some(parent));
        assert_eq!(c.author_id, None);
    }

    #[test]
    fn test_interaction_kind_parses_and_serializes() {
        assert_eq!("like".parse::<InteractionKind>().unwrap(), InteractionKind::Like);
        assert!("love".parse::<InteractionKind>().is_err());
        let json = serde_json::to_string(&InteractionKind::Dislike).unwrap();
        assert_eq!(json, "\"dislike\"");
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User {
            id: UserId::new(),
            username: "ana".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
    }
}
