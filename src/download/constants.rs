//! Constants for the download module (timeouts).

/// Default HTTP connect timeout (30 seconds). Only connecting is bounded;
/// reads are unbounded unless a request timeout is configured.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Upper bound accepted for an explicit whole-request timeout (1 hour).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;
