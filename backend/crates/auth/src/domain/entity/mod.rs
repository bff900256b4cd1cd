//! Domain Entities

pub mod access_log;
pub mod user;

pub use access_log::AccessLogEntry;
pub use user::User;
