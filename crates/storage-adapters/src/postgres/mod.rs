//! # PostgreSQL adapters
//!
//! sqlx implementations of the persistence ports. Referential actions in the
//! schema (`ON DELETE CASCADE` / `SET NULL`) carry the cascades; the primary
//! key on `interactions (post_id, user_id)` enforces one opinion per pair.

mod errors;
mod interactions;
mod posts;
mod users;

pub use interactions::PgInteractionRepository;
pub use posts::PgPostRepository;
pub use users::PgUserRepository;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Schema migrations shipped with this crate.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens a connection pool.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await
}

/// Brings the schema up to date.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
