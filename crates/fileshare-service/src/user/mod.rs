//! Account management: registration, login, identity lookup.

pub mod service;

pub use service::UserService;
