use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tempmail_core::serde::to_rfc3339_ms;

use crate::error::ApiError;
use crate::handlers::extract::ApiJson;
use crate::state::AppState;
use crate::usecase::session::VerifyCodeUseCase;

// ── POST /api/verify-code ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub code: String,
}

#[derive(Serialize)]
pub struct VerifyCodeResponse {
    pub token: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    pub email_address: String,
}

pub async fn verify_code(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerifyCodeRequest>,
) -> Result<(StatusCode, Json<VerifyCodeResponse>), ApiError> {
    let usecase = VerifyCodeUseCase {
        codes: state.access_code_repo(),
        jwt_secret: state.jwt_secret.clone(),
        mail_domain: state.mail_domain.clone(),
    };
    let output = usecase.execute(&body.code).await?;
    Ok((
        StatusCode::CREATED,
        Json(VerifyCodeResponse {
            token: output.token,
            expires_at: output.session.expires_at,
            email_address: output.address.email_address,
        }),
    ))
}
