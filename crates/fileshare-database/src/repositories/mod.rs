//! Concrete repository implementations.

pub mod shared_file;
pub mod user;

pub use shared_file::SharedFileRepository;
pub use user::UserRepository;
