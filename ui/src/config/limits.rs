/// Shortest per-request timeout accepted for workspace API calls
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Longest per-request timeout accepted for workspace API calls (5 minutes)
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Per-request timeout used when none is configured
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
