//! Access-code lifecycle rules.
//!
//! A code is `Active` until it is redeemed (`Used`) or its `expires_at` passes
//! (`Expired`). Expiry is derived from the clock and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters in a generated access code.
pub const CODE_LEN: usize = 8;

/// Alphabet for generated access codes (uppercase alphanumeric).
pub const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Expiry applied when the admin does not specify one.
pub const DEFAULT_EXPIRY_HOURS: u32 = 12;

/// Longest expiry an admin may request (30 days).
pub const MAX_EXPIRY_HOURS: u32 = 720;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    Active,
    Used,
    Expired,
}

impl CodeStatus {
    /// Derive the status at `now`. A used code stays `Used` after its expiry.
    pub fn at(used: bool, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if used {
            Self::Used
        } else if expires_at <= now {
            Self::Expired
        } else {
            Self::Active
        }
    }
}

/// Canonical form of user-typed input: surrounding whitespace removed, uppercased.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// `true` if `hours` is an expiry an admin may request.
pub fn is_valid_expiry_hours(hours: u32) -> bool {
    (1..=MAX_EXPIRY_HOURS).contains(&hours)
}
