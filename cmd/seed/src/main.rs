//! Seeds a development database with demo accounts, posts, comments and votes.
//!
//! Safe to run twice: existing demo accounts are signed into instead of recreated,
//! and posts are only written for accounts that have none yet.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::{Argon2Hasher, JwtSessions};
use configs::AppConfig;
use domains::{CommentDraft, DomainError, InteractionKind, PostDraft, RequestContext};
use secrecy::ExposeSecret;
use services::{AccountService, CommentService, InteractionService, PostService};
use storage_adapters::postgres::{self, PgInteractionRepository, PgPostRepository, PgUserRepository};
use tracing::info;

const DEMO_PASSWORD: &str = "rusty-blog-demo";

const ACCOUNTS: [&str; 3] = ["ada", "grace", "linus"];

const POSTS: [(&str, &str, Option<&str>, &str); 3] = [
    (
        "ada",
        "Notes on the analytical engine",
        Some("What a machine that weaves algebra could do."),
        "The engine might act upon other things besides number.\n\nSupposing the relations of pitched sounds were expressible, it could compose music.",
    ),
    (
        "grace",
        "A bug in the relay",
        None,
        "We found a moth stuck in relay 70 of panel F.\n\nFirst actual case of a bug being found.",
    ),
    (
        "linus",
        "Just a hobby",
        Some("Won't be big and professional."),
        "I'm doing a free operating system.\n\nIt probably never will support anything other than AT-harddisks.",
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let config = AppConfig::load().context("loading configuration")?;

    let pool = postgres::connect(config.database.url.expose_secret(), 2)
        .await
        .context("connecting to PostgreSQL")?;
    postgres::migrate(&pool).await.context("running migrations")?;

    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let posts = Arc::new(PgPostRepository::new(pool.clone()));
    let interactions = Arc::new(PgInteractionRepository::new(pool));

    let accounts = AccountService::new(
        users.clone(),
        Arc::new(Argon2Hasher::default()),
        Arc::new(JwtSessions::new(&config.auth.jwt_secret, config.auth.token_ttl_secs)),
    );
    let post_service = PostService::new(posts.clone(), interactions.clone(), users);
    let comments = CommentService::new(posts.clone());
    let votes = InteractionService::new(posts, interactions);

    let mut contexts = Vec::new();
    for name in ACCOUNTS {
        let session = match accounts.register(name, DEMO_PASSWORD).await {
            Ok(session) => {
                info!(username = name, "created demo account");
                session
            }
            Err(DomainError::Conflict(_)) => {
                info!(username = name, "demo account exists");
                accounts
                    .login(name, DEMO_PASSWORD)
                    .await
                    .with_context(|| format!("signing in as {name}"))?
            }
            Err(e) => return Err(e).context(format!("registering {name}")),
        };
        contexts.push(RequestContext::authenticated(session.viewer));
    }

    for (author, title, abstract_text, text) in POSTS {
        let Some(ctx) = contexts.iter().find(|c| c.viewer.as_ref().is_some_and(|v| v.username == author)) else {
            continue;
        };
        if !post_service.dashboard(ctx).await?.posts.is_empty() {
            info!(username = author, "already has posts; skipping");
            continue;
        }

        let draft = PostDraft {
            title: title.into(),
            abstract_text: abstract_text.map(str::to_string),
            text: text.into(),
        };
        let post = post_service.create(ctx, draft).await?;

        // everybody else reacts: one comment and one vote each
        for (i, other) in contexts.iter().filter(|c| c.viewer_id() != ctx.viewer_id()).enumerate() {
            let kind = if i % 2 == 0 { InteractionKind::Like } else { InteractionKind::Dislike };
            votes.toggle(other, post.id, kind).await?;
            comments
                .create(other, post.id, CommentDraft { text: format!("Seen, and I {kind} it.") })
                .await?;
        }
        comments
            .create(&RequestContext::anonymous(), post.id, CommentDraft { text: "First!".into() })
            .await?;
        info!(post_id = %post.id, title, "seeded post");
    }

    info!(password = DEMO_PASSWORD, "seed complete; every demo account shares this password");
    Ok(())
}
