//! Author API handlers

use crate::api::MessageResponse;
use crate::domain::{AuthorPublic, CreateAuthorInput, UpdateAuthorInput};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AuthorList {
    pub authors: Vec<AuthorPublic>,
}

/// Filter and pagination query for listing authors
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorListQuery {
    pub name: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn create<S: HasServices>(
    State(state): State<S>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateAuthorInput>,
) -> Result<impl IntoResponse> {
    let author = state.author_service().create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(AuthorPublic::from(author))))
}

pub async fn list<S: HasServices>(
    State(state): State<S>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<AuthorListQuery>,
) -> Result<impl IntoResponse> {
    let authors = state
        .author_service()
        .list(&user, query.name, query.offset, query.limit)
        .await?;
    Ok(Json(AuthorList {
        authors: authors.into_iter().map(AuthorPublic::from).collect(),
    }))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let author = state.author_service().get(id).await?;
    Ok(Json(AuthorPublic::from(author)))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateAuthorInput>,
) -> Result<impl IntoResponse> {
    let author = state.author_service().update(&user, id, patch).await?;
    Ok(Json(AuthorPublic::from(author)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.author_service().delete(&user, id).await?;
    Ok(Json(MessageResponse::new("Author deleted")))
}
