//! Token helpers for router and use-case tests.

use std::time::{SystemTime, UNIX_EPOCH};

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use uuid::Uuid;

use tempmail_auth_types::token::{Role, issue_token};

/// Signing key shared by test state and minted tokens.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Mint a token for `subject` in `role`, expiring `ttl_secs` from now (negative: already expired).
pub fn mint_token(subject: &str, role: Role, ttl_secs: i64) -> String {
    let exp = now_secs().saturating_add_signed(ttl_secs);
    issue_token(subject, role, exp, TEST_JWT_SECRET).unwrap()
}

/// User-session token naming `session_id`, valid for an hour.
pub fn session_token(session_id: Uuid) -> String {
    mint_token(&session_id.to_string(), Role::User, 3600)
}

/// Admin token for `username`, valid for an hour.
pub fn admin_token(username: &str) -> String {
    mint_token(username, Role::Admin, 3600)
}

/// `Authorization: Bearer <token>` header map.
pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}
