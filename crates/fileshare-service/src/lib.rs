//! # fileshare-service
//!
//! Business logic services for FileShare. Orchestrates repositories and
//! blob storage behind the shareable-object lifecycle: identifier
//! issuance, access policy evaluation, atomic download accounting,
//! policy updates, and ownership transfer.

pub mod share;
pub mod user;

pub use share::{AccessDecision, ShareService, TokenGenerator};
pub use user::UserService;
