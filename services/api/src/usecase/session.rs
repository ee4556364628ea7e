use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use tempmail_auth_types::token::Role;
use tempmail_domain::access_code::{CodeStatus, normalize_code};
use tempmail_domain::id::SessionId;

use crate::domain::repository::{AccessCodeRepository, SessionRepository};
use crate::domain::types::{
    AccessCode, AuthenticatedSession, MAX_GENERATE_ATTEMPTS, MAX_SESSION_IPS, RedeemOutcome,
    Session, TempAddress,
};
use crate::error::ApiError;
use crate::usecase::mailbox::new_address;
use crate::usecase::token::{issue_session_token, validate_role};

fn status_error(code: &AccessCode, now: DateTime<Utc>) -> Option<ApiError> {
    match code.status(now) {
        CodeStatus::Active => None,
        CodeStatus::Used => Some(ApiError::CodeAlreadyUsed),
        CodeStatus::Expired => Some(ApiError::CodeExpired),
    }
}

// ── VerifyCode ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub token: String,
    pub session: Session,
    pub address: TempAddress,
}

/// Redeem an access code: one session and one initial address, exactly once per code.
pub struct VerifyCodeUseCase<C: AccessCodeRepository> {
    pub codes: C,
    pub jwt_secret: String,
    pub mail_domain: String,
}

impl<C: AccessCodeRepository> VerifyCodeUseCase<C> {
    pub async fn execute(&self, input: &str) -> Result<VerifyCodeOutput, ApiError> {
        let normalized = normalize_code(input);
        let code = self
            .codes
            .find_by_code(&normalized)
            .await?
            .ok_or(ApiError::CodeNotFound)?;

        let now = Utc::now();
        if let Some(err) = status_error(&code, now) {
            return Err(err);
        }

        let session = Session {
            id: SessionId::new(),
            code_id: code.id,
            expires_at: now + code.session_duration(),
            created_at: now,
        };

        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let address = new_address(session.id, session.expires_at, &self.mail_domain, now);
            match self.codes.redeem(code.id, &session, &address).await? {
                RedeemOutcome::Redeemed => {
                    let token = issue_session_token(&session, &self.jwt_secret)?;
                    info!(code_id = %code.id, session_id = %session.id, "access code redeemed");
                    return Ok(VerifyCodeOutput {
                        token,
                        session,
                        address,
                    });
                }
                RedeemOutcome::AddressTaken => continue,
                RedeemOutcome::Lost => return Err(self.classify_lost(&normalized).await?),
            }
        }

        Err(ApiError::Internal(anyhow!(
            "no unique initial address after {MAX_GENERATE_ATTEMPTS} attempts"
        )))
    }

    /// Explain why the compare-and-set matched nothing.
    async fn classify_lost(&self, normalized: &str) -> Result<ApiError, ApiError> {
        let Some(code) = self.codes.find_by_code(normalized).await? else {
            return Ok(ApiError::CodeNotFound);
        };
        Ok(status_error(&code, Utc::now()).unwrap_or(ApiError::CodeAlreadyUsed))
    }
}

// ── AuthenticateSession ──────────────────────────────────────────────────────

pub struct AuthenticateSessionUseCase<S: SessionRepository> {
    pub sessions: S,
    pub jwt_secret: String,
}

impl<S: SessionRepository> AuthenticateSessionUseCase<S> {
    /// `client_ip` is `None` when the caller's address could not be determined;
    /// binding is skipped in that case.
    pub async fn execute(
        &self,
        token: &str,
        client_ip: Option<&str>,
    ) -> Result<AuthenticatedSession, ApiError> {
        let info = validate_role(token, &self.jwt_secret, Role::User, ApiError::InvalidToken)?;
        let session_id: SessionId = info.subject.parse().map_err(|_| ApiError::InvalidToken)?;

        let session = self
            .sessions
            .find(session_id)
            .await?
            .ok_or(ApiError::InvalidToken)?;
        if session.is_expired(Utc::now()) {
            return Err(ApiError::SessionExpired);
        }

        if let Some(ip) = client_ip {
            let bound = self
                .sessions
                .bind_ip(session.id, ip, MAX_SESSION_IPS)
                .await?;
            if !bound {
                warn!(session_id = %session.id, "session rejected on additional device");
                return Err(ApiError::TooManyDevices);
            }
        }

        Ok(AuthenticatedSession {
            session_id: session.id,
            expires_at: session.expires_at,
        })
    }
}
