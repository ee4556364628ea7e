use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tempmail_core::serde::{option_to_rfc3339_ms, to_rfc3339_ms};
use tempmail_domain::access_code::CodeStatus;
use tempmail_domain::id::{CodeId, SessionId};

use crate::domain::types::{AccessCode, Stats};
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, CurrentAdmin};
use crate::state::AppState;
use crate::usecase::admin::{AdminLoginInput, AdminLoginUseCase};
use crate::usecase::code::{
    CreateCodeInput, CreateCodeUseCase, ListCodesUseCase, RevokeCodeUseCase,
};
use crate::usecase::stats::GetStatsUseCase;

#[derive(Serialize)]
pub struct AccessCodeResponse {
    pub id: CodeId,
    pub code: String,
    pub duration_hours: u32,
    pub status: CodeStatus,
    pub used: bool,
    #[serde(serialize_with = "option_to_rfc3339_ms")]
    pub used_at: Option<DateTime<Utc>>,
    pub session_id: Option<SessionId>,
    pub created_by: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

impl AccessCodeResponse {
    fn at(code: AccessCode, now: DateTime<Utc>) -> Self {
        Self {
            status: code.status(now),
            used: code.is_used(),
            id: code.id,
            code: code.code,
            duration_hours: code.duration_hours,
            used_at: code.used_at,
            session_id: code.session_id,
            created_by: code.created_by,
            created_at: code.created_at,
            expires_at: code.expires_at,
        }
    }
}

// ── POST /api/admin/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub username: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

pub async fn admin_login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let usecase = AdminLoginUseCase {
        admins: state.admins.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let output = usecase
        .execute(AdminLoginInput {
            username: body.username,
            password: body.password,
        })
        .await?;
    Ok(Json(AdminLoginResponse {
        token: output.token,
        username: output.username,
        expires_at: output.expires_at,
    }))
}

// ── POST /api/admin/generate-code ─────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct GenerateCodeRequest {
    /// Any JSON number; negative, fractional or oversized values are `InvalidExpiry`.
    pub expiry_hours: Option<serde_json::Number>,
}

fn expiry_hours(value: Option<serde_json::Number>) -> Result<Option<u32>, ApiError> {
    value
        .map(|n| {
            n.as_u64()
                .and_then(|hours| u32::try_from(hours).ok())
                .ok_or(ApiError::InvalidExpiry)
        })
        .transpose()
}

pub async fn generate_code(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    body: Option<ApiJson<GenerateCodeRequest>>,
) -> Result<(StatusCode, Json<AccessCodeResponse>), ApiError> {
    let body = body.map(|ApiJson(body)| body).unwrap_or_default();
    let expiry_hours = expiry_hours(body.expiry_hours)?;
    let usecase = CreateCodeUseCase {
        codes: state.access_code_repo(),
    };
    let code = usecase
        .execute(CreateCodeInput {
            expiry_hours,
            created_by: admin.username,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AccessCodeResponse::at(code, Utc::now())),
    ))
}

// ── GET /api/admin/codes ──────────────────────────────────────────────────────

pub async fn list_codes(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> Result<Json<Vec<AccessCodeResponse>>, ApiError> {
    let usecase = ListCodesUseCase {
        codes: state.access_code_repo(),
    };
    let now = Utc::now();
    let codes = usecase.execute().await?;
    Ok(Json(
        codes
            .into_iter()
            .map(|code| AccessCodeResponse::at(code, now))
            .collect(),
    ))
}

// ── DELETE /api/admin/codes/{id} ──────────────────────────────────────────────

pub async fn revoke_code(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: CodeId = id.parse().map_err(|_| ApiError::CodeNotFound)?;
    let usecase = RevokeCodeUseCase {
        codes: state.access_code_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /api/admin/stats ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    pub total_codes: u64,
    pub active_codes: u64,
    pub used_codes: u64,
    pub expired_codes: u64,
    pub total_emails: u64,
    pub total_messages: u64,
}

impl From<Stats> for StatsResponse {
    fn from(s: Stats) -> Self {
        Self {
            total_codes: s.total_codes,
            active_codes: s.active_codes,
            used_codes: s.used_codes,
            expired_codes: s.expired_codes,
            total_emails: s.total_emails,
            total_messages: s.total_messages,
        }
    }
}

pub async fn get_stats(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> Result<Json<StatsResponse>, ApiError> {
    let usecase = GetStatsUseCase {
        stats: state.stats_repo(),
    };
    let stats = usecase.execute().await?;
    Ok(Json(stats.into()))
}
