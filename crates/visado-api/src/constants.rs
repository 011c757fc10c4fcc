//! API-wide constants.

/// Current API version segment.
pub const API_VERSION: &str = "v0";

/// Prefix for all versioned routes.
pub const API_PREFIX: &str = "/api/v0";
