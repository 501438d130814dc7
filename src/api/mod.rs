//! REST API handlers and shared response types

pub mod auth;
pub mod authors;
pub mod books;
pub mod users;

use axum::Json;
use serde::{Deserialize, Serialize};

/// Message response (for delete confirmations and the greeting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Offset/limit pagination query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Landing greeting
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "Olá mundo! Bem vindos ao Meu Acervo Digital de Romances",
    ))
}
