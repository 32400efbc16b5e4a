//! Shared file entity.

pub mod model;

pub use model::{CreateSharedFile, SharedFile, SharedFilePatch};
