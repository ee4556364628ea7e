//! `Authorization: Bearer <token>` parsing.

use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::HeaderMap;

/// Return the bearer token carried in `headers`, if any.
///
/// `None` when the header is absent, uses another scheme, or is not valid
/// header text. Token contents are not inspected here.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_owned())
        .filter(|token| !token.is_empty())
}
