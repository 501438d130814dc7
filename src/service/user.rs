//! User account business logic

use crate::domain::{CreateUserInput, User};
use crate::error::{AppError, Result};
use crate::repository::UserRepository;
use crate::service::auth::hash_password;
use std::sync::Arc;
use validator::Validate;

pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateUserInput) -> Result<User> {
        input.validate()?;

        if self.repo.find_by_username(&input.username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        self.repo.create(&input, &password_hash).await
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn list(&self, offset: Option<i64>, limit: Option<i64>) -> Result<Vec<User>> {
        self.repo.list(offset, limit).await
    }

    /// Replace an account's username, email and password. Only the account
    /// owner may do this.
    pub async fn update(&self, current: &User, id: i64, input: CreateUserInput) -> Result<User> {
        if id != current.id {
            return Err(AppError::Forbidden("Not enough permissions".to_string()));
        }
        input.validate()?;

        if let Some(other) = self.repo.find_by_username(&input.username).await? {
            if other.id != id {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
        }
        if let Some(other) = self.repo.find_by_email(&input.email).await? {
            if other.id != id {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let password_hash = hash_password(&input.password)?;
        self.repo.update(id, &input, &password_hash).await
    }

    /// Delete an account. Only the account owner may do this; the store
    /// clears owner references on the user's authors and books.
    pub async fn delete(&self, current: &User, id: i64) -> Result<()> {
        if id != current.id {
            return Err(AppError::Forbidden("Not enough permissions".to_string()));
        }
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::user::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn stored_user(id: i64, username: &str, email: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$irrelevant".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn input(username: &str, email: &str) -> CreateUserInput {
        CreateUserInput {
            username: username.to_string(),
            email: email.to_string(),
            password: "senha".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|input, hash| input.username == "alice" && hash.starts_with("$argon2"))
            .returning(|input, _| Ok(stored_user(1, &input.username, &input.email)));

        let service = UserService::new(Arc::new(repo));
        let user = service
            .create(input("alice", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Ok(Some(stored_user(1, "alice", "old@example.com"))));

        let service = UserService::new(Arc::new(repo));
        let err = service
            .create(input("alice", "new@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Username already exists"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored_user(1, "other", "alice@example.com"))));

        let service = UserService::new(Arc::new(repo));
        let err = service
            .create(input("alice", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Email already exists"));
    }

    #[tokio::test]
    async fn test_create_user_invalid_email() {
        let repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(repo));
        let err = service.create(input("alice", "not-an-email")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_other_account_forbidden() {
        let repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(repo));

        let current = stored_user(1, "alice", "alice@example.com");
        let err = service
            .update(&current, 2, input("bob", "bob@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg == "Not enough permissions"));
    }

    #[tokio::test]
    async fn test_update_own_account_keeps_same_username() {
        let mut repo = MockUserRepository::new();
        // The username resolves to the caller; that is not a conflict.
        repo.expect_find_by_username()
            .returning(|_| Ok(Some(stored_user(1, "alice", "alice@example.com"))));
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_update()
            .with(eq(1), mockall::predicate::always(), mockall::predicate::always())
            .returning(|id, input, _| Ok(stored_user(id, &input.username, &input.email)));

        let service = UserService::new(Arc::new(repo));
        let current = stored_user(1, "alice", "alice@example.com");
        let user = service
            .update(&current, 1, input("alice", "new@example.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_update_to_taken_username_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Ok(Some(stored_user(2, "bob", "bob@example.com"))));

        let service = UserService::new(Arc::new(repo));
        let current = stored_user(1, "alice", "alice@example.com");
        let err = service
            .update(&current, 1, input("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Username already exists"));
    }

    #[tokio::test]
    async fn test_delete_other_account_forbidden() {
        let repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(repo));

        let current = stored_user(1, "alice", "alice@example.com");
        let err = service.delete(&current, 2).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_delete_own_account() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().with(eq(1)).returning(|_| Ok(()));

        let service = UserService::new(Arc::new(repo));
        let current = stored_user(1, "alice", "alice@example.com");
        assert!(service.delete(&current, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repo));
        let err = service.get(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "User not found"));
    }
}
