//! Value Objects

pub mod access_log_id;
pub mod email;
pub mod user_id;

pub use access_log_id::AccessLogId;
pub use email::Email;
pub use user_id::UserId;
