//! # fileshare-web
//!
//! Browser-facing FileShare service. Proxies uploads and downloads to
//! the object-store service, rewrites the download response's filename
//! header with a dual ASCII + RFC 5987 representation, and reconciles
//! anonymous session identity with accounts on login via the ownership
//! transfer endpoint.
//!
//! Policy decisions are never made here; the object store's responses
//! are mapped through unchanged.

pub mod auth_flow;
pub mod client;
pub mod disposition;
pub mod error;
pub mod handlers;
pub mod router;
pub mod session;
pub mod state;

pub use client::FileServiceClient;
pub use router::build_router;
pub use state::WebState;
