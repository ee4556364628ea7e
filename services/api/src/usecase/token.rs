use chrono::{DateTime, Duration, Utc};

use tempmail_auth_types::token::{AuthError, Role, TokenInfo, issue_token, validate_token};

use crate::domain::types::{ADMIN_TOKEN_TTL_SECS, Session};
use crate::error::ApiError;

fn exp_secs(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp()).unwrap_or(0)
}

/// Sign a user-session token that expires with the session.
pub fn issue_session_token(session: &Session, secret: &str) -> Result<String, ApiError> {
    issue_token(
        &session.id.to_string(),
        Role::User,
        exp_secs(session.expires_at),
        secret,
    )
    .map_err(|e| ApiError::Internal(e.into()))
}

/// Sign an admin token valid for [`ADMIN_TOKEN_TTL_SECS`].
pub fn issue_admin_token(
    username: &str,
    secret: &str,
) -> Result<(String, DateTime<Utc>), ApiError> {
    let expires_at = Utc::now() + Duration::seconds(ADMIN_TOKEN_TTL_SECS);
    let token = issue_token(username, Role::Admin, exp_secs(expires_at), secret)
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok((token, expires_at))
}

/// Validate a token and require the given namespace.
///
/// A token from the other namespace maps to `wrong_role`, so each caller picks
/// whether that is `InvalidToken` (user routes) or `Forbidden` (admin routes).
/// Expiry is `SessionExpired` only for user tokens; an expired admin token is
/// `InvalidToken`.
pub fn validate_role(
    token: &str,
    secret: &str,
    expected: Role,
    wrong_role: ApiError,
) -> Result<TokenInfo, ApiError> {
    let info = validate_token(token, secret).map_err(|e| match e {
        AuthError::Expired if expected == Role::User => ApiError::SessionExpired,
        _ => ApiError::InvalidToken,
    })?;
    if info.role != expected {
        return Err(wrong_role);
    }
    Ok(info)
}
