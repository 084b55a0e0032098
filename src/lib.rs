pub mod config;
pub mod error;
pub mod form;
pub mod processor;
pub mod render;
pub mod sanitize;
pub mod schema;
pub mod server;
pub mod smtp;
pub mod validate;

pub use error::BriefmailError;
pub type Result<T> = std::result::Result<T, BriefmailError>;

/// Build version, from `git describe` when available.
pub const VERSION: &str = env!("GIT_VERSION");
