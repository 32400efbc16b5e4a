//! # fileshare-storage
//!
//! Local filesystem blob storage. Bytes are addressed by their generated
//! storage key; nothing in this crate ever sees a user-supplied path.

pub mod local;

pub use local::{BlobStream, LocalBlobStore};
