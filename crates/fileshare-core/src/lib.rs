//! # fileshare-core
//!
//! Core crate for FileShare. Contains configuration schemas, the
//! `OwnerId` identity type, and the unified error system.
//!
//! This crate has **no** internal dependencies on other FileShare crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
