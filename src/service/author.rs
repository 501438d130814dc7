//! Author catalog logic: normalization, de-duplication and edit policy

use crate::config::AuthorEditPolicy;
use crate::domain::{normalize, Author, CreateAuthorInput, UpdateAuthorInput, User};
use crate::error::{AppError, Result};
use crate::repository::author::DUPLICATE_NAME;
use crate::repository::{AuthorQuery, AuthorRepository};
use std::sync::Arc;
use validator::Validate;

pub struct AuthorService<R: AuthorRepository> {
    repo: Arc<R>,
    policy: AuthorEditPolicy,
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repo: Arc<R>, policy: AuthorEditPolicy) -> Self {
        Self { repo, policy }
    }

    pub async fn create(&self, user: &User, input: CreateAuthorInput) -> Result<Author> {
        input.validate()?;
        let name = normalized_name(&input.name)?;

        // Advisory pre-check; the unique constraint on authors.name is the
        // authoritative guard against racing creates.
        if self.repo.find_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_NAME.to_string()));
        }

        self.repo.create(&name, user.id).await
    }

    pub async fn get(&self, id: i64) -> Result<Author> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// List the caller's authors, optionally filtered by a substring of the
    /// normalized name.
    pub async fn list(
        &self,
        user: &User,
        name: Option<String>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Author>> {
        self.repo
            .list(&AuthorQuery {
                created_by: user.id,
                name: name.map(|n| normalize(&n)),
                offset,
                limit,
            })
            .await
    }

    pub async fn update(&self, user: &User, id: i64, patch: UpdateAuthorInput) -> Result<Author> {
        patch.validate()?;
        let author = self.get(id).await?;
        let author = self.authorize_edit(user, author).await?;

        let Some(name) = patch.name else {
            return Ok(author);
        };
        let name = normalized_name(&name)?;

        if let Some(other) = self.repo.find_by_name(&name).await? {
            if other.id != id {
                return Err(AppError::Conflict(DUPLICATE_NAME.to_string()));
            }
        }

        self.repo.update_name(id, &name).await
    }

    pub async fn delete(&self, user: &User, id: i64) -> Result<()> {
        let author = self.get(id).await?;
        self.authorize_edit(user, author).await?;
        self.repo.delete(id).await
    }

    /// Enforce the configured edit policy. Under `CreatorOnly`, an orphaned
    /// author (creator reference cleared after account removal) transitions
    /// to the caller via an atomic conditional update before the ownership
    /// check; losing that race falls through to the check against the
    /// winner.
    async fn authorize_edit(&self, user: &User, author: Author) -> Result<Author> {
        match self.policy {
            AuthorEditPolicy::AnyUser => Ok(author),
            AuthorEditPolicy::CreatorOnly => match author.created_by_user {
                Some(creator) if creator == user.id => Ok(author),
                Some(_) => Err(AppError::Forbidden("Not enough permissions".to_string())),
                None => {
                    self.repo.claim(author.id, user.id).await?;
                    let refreshed = self
                        .repo
                        .find_by_id(author.id)
                        .await?
                        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
                    if refreshed.created_by_user == Some(user.id) {
                        Ok(refreshed)
                    } else {
                        Err(AppError::Forbidden("Not enough permissions".to_string()))
                    }
                }
            },
        }
    }
}

fn normalized_name(raw: &str) -> Result<String> {
    let name = normalize(raw);
    if name.is_empty() {
        return Err(AppError::Validation(
            "Author name must contain at least one word character".to_string(),
        ));
    }
    Ok(name)
}
