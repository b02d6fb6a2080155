// Request-scoped session extraction
use crate::application::royalty_repository::Session;
use crate::presentation::error::ApiError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

const SESSION_COOKIE: &str = "authToken";

/// Reads the `authToken` cookie, falling back to a bearer Authorization header
pub fn session_from_headers(headers: &HeaderMap) -> Option<Session> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| urlencoding::decode(value).ok().map(|v| v.into_owned()));

    let token = from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|v| v.trim().to_string())
    })?;

    (!token.is_empty()).then(|| Session::new(token))
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from_headers(&parts.headers).ok_or(ApiError::Unauthorized)
    }
}
