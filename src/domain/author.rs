//! Author domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Author entity. `name` is stored in normalized form (see
/// [`crate::domain::normalize`]); `created_by_user` is cleared by the store
/// when the creating account is removed.
#[derive(Debug, Clone, FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub created_by_user: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author shape exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorPublic {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Author> for AuthorPublic {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            created_at: author.created_at,
            updated_at: author.updated_at,
        }
    }
}

/// Input for creating an author
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAuthorInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Partial update for an author. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAuthorInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_public_excludes_creator() {
        let author = Author {
            id: 7,
            name: "clarice lispector".to_string(),
            created_by_user: Some(3),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&AuthorPublic::from(author)).unwrap();
        assert!(json.contains("\"name\":\"clarice lispector\""));
        assert!(!json.contains("created_by_user"));
    }

    #[test]
    fn test_update_author_input_absent_name() {
        let patch: UpdateAuthorInput = serde_json::from_str("{}").unwrap();
        assert!(patch.name.is_none());
    }
}
