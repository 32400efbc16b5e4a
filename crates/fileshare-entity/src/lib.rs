//! # fileshare-entity
//!
//! Domain entity models for FileShare. Each entity maps one-to-one to a
//! database table and derives `sqlx::FromRow` for direct query binding.

pub mod shared_file;
pub mod user;

pub use shared_file::{CreateSharedFile, SharedFile, SharedFilePatch};
pub use user::{CreateUser, User};
