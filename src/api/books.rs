//! Book API handlers

use crate::api::MessageResponse;
use crate::domain::{BookPublic, CreateBookInput, UpdateBookInput};
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
pub struct BookList {
    pub books: Vec<BookPublic>,
}

/// Filter and pagination query for listing books
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookListQuery {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn create<S: HasServices>(
    State(state): State<S>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateBookInput>,
) -> Result<impl IntoResponse> {
    let book = state.book_service().create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(BookPublic::from(book))))
}

pub async fn list<S: HasServices>(
    State(state): State<S>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<BookListQuery>,
) -> Result<impl IntoResponse> {
    let books = state
        .book_service()
        .list(&user, query.title, query.year, query.offset, query.limit)
        .await?;
    Ok(Json(BookList {
        books: books.into_iter().map(BookPublic::from).collect(),
    }))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let book = state.book_service().get(id).await?;
    Ok(Json(BookPublic::from(book)))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateBookInput>,
) -> Result<impl IntoResponse> {
    let book = state.book_service().update(&user, id, patch).await?;
    Ok(Json(BookPublic::from(book)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.book_service().delete(&user, id).await?;
    Ok(Json(MessageResponse::new("Book deleted")))
}
