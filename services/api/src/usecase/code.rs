use anyhow::anyhow;
use chrono::{Duration, Utc};
use tracing::info;

use tempmail_domain::access_code::{
    CODE_CHARSET, CODE_LEN, DEFAULT_EXPIRY_HOURS, is_valid_expiry_hours,
};
use tempmail_domain::id::CodeId;

use crate::domain::repository::AccessCodeRepository;
use crate::domain::types::{AccessCode, MAX_GENERATE_ATTEMPTS};
use crate::error::ApiError;
use crate::usecase::random_string;

// ── CreateCode ───────────────────────────────────────────────────────────────

pub struct CreateCodeInput {
    /// Defaults to [`DEFAULT_EXPIRY_HOURS`].
    pub expiry_hours: Option<u32>,
    /// Username of the issuing admin.
    pub created_by: String,
}

pub struct CreateCodeUseCase<C: AccessCodeRepository> {
    pub codes: C,
}

impl<C: AccessCodeRepository> CreateCodeUseCase<C> {
    pub async fn execute(&self, input: CreateCodeInput) -> Result<AccessCode, ApiError> {
        let expiry_hours = input.expiry_hours.unwrap_or(DEFAULT_EXPIRY_HOURS);
        if !is_valid_expiry_hours(expiry_hours) {
            return Err(ApiError::InvalidExpiry);
        }

        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let now = Utc::now();
            let code = AccessCode {
                id: CodeId::new(),
                code: random_string(CODE_CHARSET, CODE_LEN),
                duration_hours: expiry_hours,
                expires_at: now + Duration::hours(i64::from(expiry_hours)),
                used_at: None,
                session_id: None,
                created_by: input.created_by.clone(),
                created_at: now,
            };
            if self.codes.create(&code).await? {
                info!(code_id = %code.id, expiry_hours, created_by = %code.created_by, "access code created");
                return Ok(code);
            }
        }

        Err(ApiError::Internal(anyhow!(
            "no unique access code after {MAX_GENERATE_ATTEMPTS} attempts"
        )))
    }
}

// ── ListCodes ────────────────────────────────────────────────────────────────

pub struct ListCodesUseCase<C: AccessCodeRepository> {
    pub codes: C,
}

impl<C: AccessCodeRepository> ListCodesUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<AccessCode>, ApiError> {
        self.codes.list().await
    }
}

// ── RevokeCode ───────────────────────────────────────────────────────────────

pub struct RevokeCodeUseCase<C: AccessCodeRepository> {
    pub codes: C,
}

impl<C: AccessCodeRepository> RevokeCodeUseCase<C> {
    pub async fn execute(&self, id: CodeId) -> Result<(), ApiError> {
        let deleted = self.codes.delete(id).await?;
        if !deleted {
            return Err(ApiError::CodeNotFound);
        }
        info!(code_id = %id, "access code revoked");
        Ok(())
    }
}
