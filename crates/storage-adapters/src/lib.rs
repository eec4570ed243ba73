//! # storage-adapters
//!
//! Implementations of the persistence ports in `domains`:
//!
//! - [`memory`]: process-local store used by tests and `--in-memory` runs.
//! - `postgres` (feature `db-postgres`): sqlx repositories and schema migrations.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryStore;
