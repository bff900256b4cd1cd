use kernel::id::Id;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessLogMarker;

/// Unique id for an access-log entry, generated by this crate so a
/// retried write stays idempotent.
pub type AccessLogId = Id<AccessLogMarker>;
