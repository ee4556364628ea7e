//! Request extractors: caller authentication and JSON bodies with `{kind, message}` rejections.

use std::net::{IpAddr, SocketAddr};

use axum::Json;
use axum::extract::{ConnectInfo, FromRequest, FromRequestParts, OptionalFromRequest, Request};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use tempmail_auth_types::bearer::bearer_token;

use crate::domain::types::AuthenticatedSession;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::admin::{AdminIdentity, authorize_admin};
use crate::usecase::session::AuthenticateSessionUseCase;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Client IP for session binding: the first `x-forwarded-for` hop when trusted,
/// else the socket peer. `None` if neither yields an address.
pub fn client_ip(parts: &Parts, trust_forwarded_for: bool) -> Option<IpAddr> {
    if trust_forwarded_for {
        if let Some(ip) = forwarded_for(&parts.headers) {
            return Some(ip);
        }
    }
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Valid, unexpired user session bound to the caller's IP.
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession(pub AuthenticatedSession);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    // Extract synchronously, then return a 'static future that owns everything it needs.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(&parts.headers);
        let ip = client_ip(parts, state.trust_forwarded_for).map(|ip| ip.to_string());
        let usecase = AuthenticateSessionUseCase {
            sessions: state.session_repo(),
            jwt_secret: state.jwt_secret.clone(),
        };

        async move {
            let token = token.ok_or(ApiError::InvalidToken)?;
            let session = usecase.execute(&token, ip.as_deref()).await?;
            Ok(Self(session))
        }
    }
}

/// Caller holding a valid admin token.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub AdminIdentity);

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = bearer_token(&parts.headers)
            .ok_or(ApiError::InvalidToken)
            .and_then(|token| authorize_admin(&token, &state.jwt_secret))
            .map(Self);
        async move { result }
    }
}

/// `Json` whose rejection is an [`ApiError::InvalidRequest`].
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// A request without a JSON content type yields `None`.
impl<T, S> OptionalFromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let body = <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
        Ok(body.map(|Json(value)| Self(value)))
    }
}
