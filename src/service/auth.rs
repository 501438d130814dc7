//! Authentication: password hashing and credential verification

use crate::domain::User;
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::UserRepository;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Incorrect username or password";

/// Hash a password with argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Bearer token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

pub struct AuthService<R: UserRepository> {
    repo: Arc<R>,
    jwt_manager: JwtManager,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, jwt_manager: JwtManager) -> Self {
        Self { repo, jwt_manager }
    }

    /// Verify credentials and issue an access token. Unknown username and
    /// wrong password report the same message.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::BadRequest(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
        }

        self.issue(&user.username)
    }

    /// Issue a fresh token for an already-authenticated user
    pub fn refresh(&self, user: &User) -> Result<TokenResponse> {
        self.issue(&user.username)
    }

    fn issue(&self, username: &str) -> Result<TokenResponse> {
        Ok(TokenResponse {
            access_token: self.jwt_manager.create_access_token(username)?,
            token_type: "bearer".to_string(),
        })
    }
}
