//! Authentication API handlers

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::service::auth::TokenResponse;
use crate::state::HasServices;
use axum::{extract::State, response::IntoResponse, Form, Json};
use serde::Deserialize;

/// OAuth2-style password grant form body
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Exchange username and password for a bearer access token
pub async fn token<S: HasServices>(
    State(state): State<S>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse> {
    let token: TokenResponse = state
        .auth_service()
        .login(&form.username, &form.password)
        .await?;
    Ok(Json(token))
}

/// Issue a fresh token for the authenticated caller
pub async fn refresh_token<S: HasServices>(
    State(state): State<S>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse> {
    let token = state.auth_service().refresh(&user)?;
    Ok(Json(token))
}
