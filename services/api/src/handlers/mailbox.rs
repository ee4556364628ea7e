use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

use tempmail_core::serde::to_rfc3339_ms;
use tempmail_domain::id::{AddressId, SessionId};

use crate::domain::types::TempAddress;
use crate::error::ApiError;
use crate::handlers::extract::CurrentSession;
use crate::state::AppState;
use crate::usecase::mailbox::{GenerateAddressUseCase, ListAddressesUseCase};

#[derive(Serialize)]
pub struct AddressResponse {
    pub id: AddressId,
    pub email_address: String,
    pub session_id: SessionId,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

impl From<TempAddress> for AddressResponse {
    fn from(a: TempAddress) -> Self {
        Self {
            id: a.id,
            email_address: a.email_address,
            session_id: a.session_id,
            created_at: a.created_at,
            expires_at: a.expires_at,
        }
    }
}

// ── POST /api/email/generate ──────────────────────────────────────────────────

pub async fn generate_address(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<(StatusCode, Json<AddressResponse>), ApiError> {
    let usecase = GenerateAddressUseCase {
        addresses: state.address_repo(),
        mail_domain: state.mail_domain.clone(),
    };
    let address = usecase.execute(session).await?;
    Ok((StatusCode::CREATED, Json(address.into())))
}

// ── GET /api/emails ───────────────────────────────────────────────────────────

pub async fn list_addresses(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Vec<AddressResponse>>, ApiError> {
    let usecase = ListAddressesUseCase {
        addresses: state.address_repo(),
    };
    let addresses = usecase.execute(session).await?;
    Ok(Json(addresses.into_iter().map(Into::into).collect()))
}
