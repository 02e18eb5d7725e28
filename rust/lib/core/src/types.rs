/// Default page size when `limit` is absent.
pub const DEFAULT_LIMIT: i64 = 10;

/// Hard ceiling for `limit`; larger requests are silently clamped.
pub const MAX_LIMIT: i64 = 100;

/// Placeholder tenant used when no `orgId` is supplied.
pub const DEFAULT_ORG_ID: i64 = 1;

/// Resolve a requested page size: default 10, clamped to [1, 100].
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Resolve a requested offset: default 0, never negative.
pub fn offset_or_default(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
