use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tempmail_core::serde::to_rfc3339_ms;
use tempmail_domain::id::MessageId;

use crate::domain::types::Message;
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, CurrentSession};
use crate::state::AppState;
use crate::usecase::message::{
    DeleteMessageUseCase, GetMessageUseCase, IngestMessageInput, IngestMessageUseCase,
    ListMessagesUseCase,
};

#[derive(Serialize)]
pub struct MessageResponse {
    pub id: MessageId,
    pub to_email: String,
    pub from_email: String,
    pub subject: String,
    pub body: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub received_at: DateTime<Utc>,
    pub is_read: bool,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            to_email: m.to_email,
            from_email: m.from_email,
            subject: m.subject,
            body: m.body,
            received_at: m.received_at,
            is_read: m.is_read,
        }
    }
}

/// A malformed id cannot name any message.
fn parse_message_id(raw: &str) -> Result<MessageId, ApiError> {
    raw.parse().map_err(|_| ApiError::MessageNotFound)
}

// ── GET /api/messages ─────────────────────────────────────────────────────────

pub async fn list_messages(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let usecase = ListMessagesUseCase {
        messages: state.message_repo(),
    };
    let messages = usecase.execute(session).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

// ── GET /api/messages/{id} ────────────────────────────────────────────────────

pub async fn get_message(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = GetMessageUseCase {
        messages: state.message_repo(),
        addresses: state.address_repo(),
    };
    let message = usecase.execute(parse_message_id(&id)?, session).await?;
    Ok(Json(message.into()))
}

// ── DELETE /api/messages/{id} ─────────────────────────────────────────────────

pub async fn delete_message(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteMessageUseCase {
        messages: state.message_repo(),
        addresses: state.address_repo(),
    };
    usecase.execute(parse_message_id(&id)?, session).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/mock-email ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IngestMessageRequest {
    pub to_email: String,
    pub from_email: String,
    pub subject: String,
    pub body: String,
}

pub async fn ingest_message(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<IngestMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let usecase = IngestMessageUseCase {
        messages: state.message_repo(),
        addresses: state.address_repo(),
    };
    let message = usecase
        .execute(IngestMessageInput {
            to_email: body.to_email,
            from_email: body.from_email,
            subject: body.subject,
            body: body.body,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}
