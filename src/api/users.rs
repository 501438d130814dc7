//! User account API handlers

use crate::api::{MessageResponse, PaginationQuery};
use crate::domain::{CreateUserInput, UserPublic};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<UserPublic>,
}

/// Register a new account. Open, no token required.
pub async fn create<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<CreateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state.user_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(UserPublic::from(user))))
}

pub async fn list<S: HasServices>(
    State(state): State<S>,
    CurrentUser(_user): CurrentUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let users = state
        .user_service()
        .list(pagination.offset, pagination.limit)
        .await?;
    Ok(Json(UserList {
        users: users.into_iter().map(UserPublic::from).collect(),
    }))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let user = state.user_service().get(id).await?;
    Ok(Json(UserPublic::from(user)))
}

/// Replace the account's username, email and password
pub async fn update<S: HasServices>(
    State(state): State<S>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<CreateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state.user_service().update(&current, id, input).await?;
    Ok(Json(UserPublic::from(user)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.user_service().delete(&current, id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}
