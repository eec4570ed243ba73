use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use domains::{
    DomainError, Interaction, InteractionKind, InteractionRepository, PostId, Result, Tally, UserId,
};

use super::errors::{internal, on_insert, StorageError};

fn parse_kind(raw: &str) -> Result<InteractionKind> {
    raw.parse()
        .map_err(|_| DomainError::from(StorageError::CorruptInteraction(raw.to_string())))
}

fn uuids(posts: &[PostId]) -> Vec<Uuid> {
    posts.iter().map(|p| p.0).collect()
}

pub struct PgInteractionRepository {
    pool: PgPool,
}

impl PgInteractionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionRepository for PgInteractionRepository {
    async fn find(&self, post: PostId, user: UserId) -> Result<Option<InteractionKind>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM interactions WHERE post_id = $1 AND user_id = $2")
                .bind(post.0)
                .bind(user.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(internal)?;
        value.as_deref().map(parse_kind).transpose()
    }

    async fn insert(&self, interaction: &Interaction) -> Result<()> {
        sqlx::query(
            "INSERT INTO interactions (post_id, user_id, value, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(interaction.post_id.0)
        .bind(interaction.user_id.0)
        .bind(interaction.kind.as_str())
        .bind(interaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            on_insert(
                e,
                "interaction",
                vec![
                    ("interactions_post_id_fkey", "post", interaction.post_id.to_string()),
                    ("interactions_user_id_fkey", "user", interaction.user_id.to_string()),
                ],
            )
        })?;
        Ok(())
    }

    async fn overwrite(
        &self,
        post: PostId,
        user: UserId,
        from: InteractionKind,
        to: InteractionKind,
    ) -> Result<bool> {
        let done = sqlx::query(
            "UPDATE interactions SET value = $3 WHERE post_id = $1 AND user_id = $2 AND value = $4",
        )
        .bind(post.0)
        .bind(user.0)
        .bind(to.as_str())
        .bind(from.as_str())
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(done.rows_affected() == 1)
    }

    async fn delete(&self, post: PostId, user: UserId, kind: InteractionKind) -> Result<bool> {
        let done = sqlx::query(
            "DELETE FROM interactions WHERE post_id = $1 AND user_id = $2 AND value = $3",
        )
        .bind(post.0)
        .bind(user.0)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(done.rows_affected() == 1)
    }

    async fn tallies(&self, posts: &[PostId]) -> Result<HashMap<PostId, Tally>> {
        if posts.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, i64, i64)> = sqlx::query_as(
            "SELECT post_id, \
                    COUNT(*) FILTER (WHERE value = 'like'), \
                    COUNT(*) FILTER (WHERE value = 'dislike') \
             FROM interactions WHERE post_id = ANY($1) GROUP BY post_id",
        )
        .bind(uuids(posts))
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;

        Ok(rows
            .into_iter()
            .map(|(post, likes, dislikes)| (PostId(post), Tally { likes, dislikes }))
            .collect())
    }

    async fn kinds_for_user(
        &self,
        posts: &[PostId],
        user: UserId,
    ) -> Result<HashMap<PostId, InteractionKind>> {
        if posts.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, String)> = sqlx::query_as(
            "SELECT post_id, value FROM interactions WHERE user_id = $1 AND post_id = ANY($2)",
        )
        .bind(user.0)
        .bind(uuids(posts))
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;

        rows.into_iter()
            .map(|(post, value)| Ok((PostId(post), parse_kind(&value)?)))
            .collect()
    }
}
