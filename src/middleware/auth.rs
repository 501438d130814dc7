//! Bearer token authentication extractor
//!
//! `CurrentUser` validates the Authorization header, verifies the access
//! token and resolves the account it names. Handlers that take it as an
//! argument are protected; the extractor rejects with 401 before the
//! handler body runs.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};

use crate::domain::User;
use crate::state::HasServices;

/// The authenticated account behind the request's bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication errors
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No usable Authorization header present
    MissingToken,
    /// Token validation failed or the account it names is gone
    InvalidCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let detail = match self {
            AuthError::MissingToken => "Not authenticated",
            AuthError::InvalidCredentials => "Could not validate credentials",
        };

        let body = serde_json::json!({ "detail": detail });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Extract the Bearer token from the Authorization header
fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MissingToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: HasServices + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        let claims = state
            .jwt_manager()
            .verify_access_token(token)
            .map_err(|_| AuthError::InvalidCredentials)?;

        // A token can outlive its account; treat that as invalid credentials
        // rather than a 404.
        let user = state
            .user_service()
            .get_by_username(&claims.sub)
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer test-token-123".parse().unwrap());

        let token = extract_bearer_token(&headers).unwrap();
        assert_eq!(token, "test-token-123");
    }

    #[test]
    fn test_extract_bearer_token_missing() {
        let headers = axum::http::HeaderMap::new();
        let result = extract_bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        let result = extract_bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_auth_error_responses() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
