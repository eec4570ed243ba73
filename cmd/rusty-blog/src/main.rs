//! # Rusty-Blog Binary
//!
//! Assembles the application from configuration and compile-time features,
//! then serves it until Ctrl-C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState, SessionCookie};
use auth_adapters::{Argon2Hasher, JwtSessions};
use configs::{AppConfig, LogConfig};
use domains::{InteractionRepository, PostRepository, UserRepository};
use tracing::info;
use tracing_subscriber::EnvFilter;

type Stores = (
    Arc<dyn UserRepository>,
    Arc<dyn PostRepository>,
    Arc<dyn InteractionRepository>,
);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.log);

    let (users, posts, interactions) = storage(&config).await?;
    let state = AppState::new(
        users,
        posts,
        interactions,
        Arc::new(Argon2Hasher::default()),
        Arc::new(JwtSessions::new(&config.auth.jwt_secret, config.auth.token_ttl_secs)),
        SessionCookie {
            secure: config.auth.cookie_secure,
            max_age_secs: config.auth.token_ttl_secs,
        },
    );
    let app = router(state, &config.server.static_dir);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "rusty-blog listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down cleanly");
    Ok(())
}

/// `RUST_LOG` wins over `log.level` when set.
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(feature = "db-postgres")]
async fn storage(config: &AppConfig) -> anyhow::Result<Stores> {
    use secrecy::ExposeSecret;
    use storage_adapters::postgres::{self, PgInteractionRepository, PgPostRepository, PgUserRepository};

    let pool = postgres::connect(config.database.url.expose_secret(), config.database.max_connections)
        .await
        .context("connecting to PostgreSQL")?;
    if config.database.run_migrations {
        postgres::migrate(&pool).await.context("running migrations")?;
        info!("migrations applied");
    }

    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let posts: Arc<dyn PostRepository> = Arc::new(PgPostRepository::new(pool.clone()));
    let interactions: Arc<dyn InteractionRepository> = Arc::new(PgInteractionRepository::new(pool));
    Ok((users, posts, interactions))
}

#[cfg(not(feature = "db-postgres"))]
async fn storage(_config: &AppConfig) -> anyhow::Result<Stores> {
    tracing::warn!("built without db-postgres; data lives in memory and is lost on exit");
    let store = Arc::new(storage_adapters::MemoryStore::new());
    let users: Arc<dyn UserRepository> = store.clone();
    let posts: Arc<dyn PostRepository> = store.clone();
    let interactions: Arc<dyn InteractionRepository> = store;
    Ok((users, posts, interactions))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
