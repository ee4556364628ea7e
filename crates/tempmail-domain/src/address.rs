//! Temporary address naming.

/// Length of the random local part (before `@`).
pub const LOCAL_PART_LEN: usize = 10;

/// Alphabet for the local part (lowercase alphanumeric).
pub const LOCAL_PART_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Canonical form used for storage and lookup.
pub fn normalize_address(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

/// Join a local part and domain into a full address.
pub fn compose_address(local_part: &str, domain: &str) -> String {
    format!("{local_part}@{}", domain.trim_start_matches('@'))
}
