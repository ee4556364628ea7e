use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// TempMail API error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("access code not found")]
    CodeNotFound,
    #[error("access code already used")]
    CodeAlreadyUsed,
    #[error("access code expired")]
    CodeExpired,
    #[error("invalid expiry hours")]
    InvalidExpiry,
    #[error("invalid request body: {0}")]
    InvalidRequest(String),
    #[error("invalid token")]
    InvalidToken,
    #[error("session expired")]
    SessionExpired,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("forbidden")]
    Forbidden,
    #[error("session in use on too many devices")]
    TooManyDevices,
    #[error("message not found")]
    MessageNotFound,
    #[error("address not found")]
    AddressNotFound,
    #[error("address expired")]
    AddressExpired,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CodeNotFound => "CODE_NOT_FOUND",
            Self::CodeAlreadyUsed => "CODE_ALREADY_USED",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::InvalidExpiry => "INVALID_EXPIRY",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::TooManyDevices => "TOO_MANY_DEVICES",
            Self::MessageNotFound => "MESSAGE_NOT_FOUND",
            Self::AddressNotFound => "ADDRESS_NOT_FOUND",
            Self::AddressExpired => "ADDRESS_EXPIRED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::CodeNotFound | Self::MessageNotFound | Self::AddressNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::CodeAlreadyUsed => StatusCode::CONFLICT,
            Self::CodeExpired | Self::AddressExpired => StatusCode::GONE,
            Self::InvalidExpiry | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidToken | Self::SessionExpired | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden | Self::TooManyDevices => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Only 500s; TraceLayer already records method, uri and status.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
