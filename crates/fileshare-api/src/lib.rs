//! # fileshare-api
//!
//! HTTP API layer for the FileShare object-store service using Axum:
//! application state, route definitions, request/response DTOs, and the
//! mapping from domain errors to HTTP responses.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
