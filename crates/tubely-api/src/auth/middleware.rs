use crate::auth::models::AuthenticatedUser;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tubely_core::auth::validate_jwt;
use tubely_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn get_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let missing = || AppError::Unauthorized("Couldn't find JWT".to_string());

    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(missing)?;

    match value.trim().split_once(' ') {
        Some(("Bearer", token)) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(missing()),
    }
}

pub async fn auth_middleware(
    State(auth): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, HttpAppError> {
    let token = get_bearer_token(request.headers())?;
    let user_id = validate_jwt(token, &auth.jwt_secret).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        HttpAppError::from(e)
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(get_bearer_token(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        match get_bearer_token(&HeaderMap::new()) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Couldn't find JWT"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn wrong_scheme_or_empty_token_is_rejected() {
        assert!(get_bearer_token(&headers_with("Basic dXNlcjpwYXNz")).is_err());
        assert!(get_bearer_token(&headers_with("Bearer")).is_err());
        assert!(get_bearer_token(&headers_with("Bearer   ")).is_err());
        assert!(get_bearer_token(&headers_with("bearer abc")).is_err());
    }
}
