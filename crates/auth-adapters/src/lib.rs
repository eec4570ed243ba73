//! # auth-adapters
//!
//! Credential and session implementations of the auth ports in `domains`.
//!
//! - [`Argon2Hasher`]: Argon2id password hashing (always compiled).
//! - `JwtSessions` (feature `auth-jwt`): HS256 session tokens.

mod argon;
#[cfg(feature = "auth-jwt")]
mod jwt;

pub use argon::Argon2Hasher;
#[cfg(feature = "auth-jwt")]
pub use jwt::JwtSessions;
