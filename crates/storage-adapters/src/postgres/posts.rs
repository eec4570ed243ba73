use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use domains::{Post, PostFilter, PostId, PostRepository, PostScope, Result, UserId};

use super::errors::{internal, on_insert};

const POST_COLUMNS: &str =
    "SELECT id, author_id, parent_id, title, abstract_text, body, created_at, updated_at FROM posts";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    author_id: Option<Uuid>,
    parent_id: Option<Uuid>,
    title: Option<String>,
    abstract_text: Option<String>,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: PostId(row.id),
            author_id: row.author_id.map(UserId),
            parent_id: row.parent_id.map(PostId),
            title: row.title,
            abstract_text: row.abstract_text,
            text: row.body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Appends ` AND <predicate>` for every filter in the scope.
fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &PostScope) {
    for filter in scope.filters() {
        qb.push(" AND ");
        match *filter {
            PostFilter::AuthoredBy(user) => {
                qb.push("author_id = ").push_bind(user.0);
            }
            PostFilter::TopLevel => {
                qb.push("parent_id IS NULL");
            }
            PostFilter::Replies => {
                qb.push("parent_id IS NOT NULL");
            }
            PostFilter::ChildOf(parent) => {
                qb.push("parent_id = ").push_bind(parent.0);
            }
        }
    }
}

pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn insert(&self, post: &Post) -> Result<()> {
        let mut references = Vec::with_capacity(2);
        if let Some(parent) = post.parent_id {
            references.push(("posts_parent_id_fkey", "post", parent.to_string()));
        }
        if let Some(author) = post.author_id {
            references.push(("posts_author_id_fkey", "user", author.to_string()));
        }
        sqlx::query(
            "INSERT INTO posts (id, author_id, parent_id, title, abstract_text, body, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(post.id.0)
        .bind(post.author_id.map(|a| a.0))
        .bind(post.parent_id.map(|p| p.0))
        .bind(&post.title)
        .bind(&post.abstract_text)
        .bind(&post.text)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| on_insert(e, "post", references))?;
        Ok(())
    }

    async fn find(&self, id: PostId, scope: &PostScope) -> Result<Option<Post>> {
        let mut qb = QueryBuilder::new(POST_COLUMNS);
        qb.push(" WHERE id = ").push_bind(id.0);
        push_scope(&mut qb, scope);

        let row = qb
            .build_query_as::<PostRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(Post::from))
    }

    async fn list(&self, scope: &PostScope) -> Result<Vec<Post>> {
        let mut qb = QueryBuilder::new(POST_COLUMNS);
        qb.push(" WHERE TRUE");
        push_scope(&mut qb, scope);
        qb.push(" ORDER BY created_at ASC, id ASC");

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn update(&self, post: &Post, scope: &PostScope) -> Result<bool> {
        let mut qb = QueryBuilder::new("UPDATE posts SET title = ");
        qb.push_bind(post.title.clone())
            .push(", abstract_text = ")
            .push_bind(post.abstract_text.clone())
            .push(", body = ")
            .push_bind(post.text.clone())
            .push(", updated_at = ")
            .push_bind(post.updated_at)
            .push(" WHERE id = ")
            .push_bind(post.id.0);
        push_scope(&mut qb, scope);

        let done = qb.build().execute(&self.pool).await.map_err(internal)?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete(&self, id: PostId, scope: &PostScope) -> Result<bool> {
        let mut qb = QueryBuilder::new("DELETE FROM posts WHERE id = ");
        qb.push_bind(id.0);
        push_scope(&mut qb, scope);

        let done = qb.build().execute(&self.pool).await.map_err(internal)?;
        Ok(done.rows_affected() > 0)
    }
}
