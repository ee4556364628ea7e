use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use tempmail_auth_types::token::Role;

use crate::domain::repository::AdminDirectory;
use crate::error::ApiError;
use crate::usecase::token::{issue_admin_token, validate_role};

/// Admin identity established from a valid admin token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
}

/// Require an admin token. A valid user-session token is `Forbidden`.
pub fn authorize_admin(token: &str, secret: &str) -> Result<AdminIdentity, ApiError> {
    let info = validate_role(token, secret, Role::Admin, ApiError::Forbidden)?;
    Ok(AdminIdentity {
        username: info.subject,
    })
}

// ── AdminLogin ───────────────────────────────────────────────────────────────

pub struct AdminLoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct AdminLoginOutput {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

pub struct AdminLoginUseCase<D: AdminDirectory> {
    pub admins: D,
    pub jwt_secret: String,
}

impl<D: AdminDirectory> AdminLoginUseCase<D> {
    pub async fn execute(&self, input: AdminLoginInput) -> Result<AdminLoginOutput, ApiError> {
        let Some(account) = self.admins.find(&input.username).await? else {
            warn!(username = %input.username, "admin login rejected");
            return Err(ApiError::InvalidCredentials);
        };

        // bcrypt is CPU-bound.
        let hash = account.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(input.password, &hash))
            .await
            .context("join bcrypt verify")?
            .context("bcrypt verify")?;
        if !verified {
            warn!(username = %account.username, "admin login rejected");
            return Err(ApiError::InvalidCredentials);
        }

        let (token, expires_at) = issue_admin_token(&account.username, &self.jwt_secret)?;
        info!(username = %account.username, "admin logged in");
        Ok(AdminLoginOutput {
            token,
            username: account.username,
            expires_at,
        })
    }
}
