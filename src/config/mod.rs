//! Configuration management for MADR Core

use anyhow::{bail, Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Who may edit or delete an Author record
    pub author_edit_policy: AuthorEditPolicy,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_token_ttl_secs: i64,
}

/// Policy governing Author update/delete authorization.
///
/// `CreatorOnly` restricts mutation to the user recorded in
/// `created_by_user` (orphaned records are claimed by the first editor).
/// `AnyUser` lets any authenticated user edit or delete any Author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorEditPolicy {
    CreatorOnly,
    AnyUser,
}

impl AuthorEditPolicy {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "creator-only" => Ok(AuthorEditPolicy::CreatorOnly),
            "any-user" => Ok(AuthorEditPolicy::AnyUser),
            other => bail!(
                "Invalid AUTHOR_EDIT_POLICY '{}': expected 'creator-only' or 'any-user'",
                other
            ),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let access_token_expire_minutes: i64 = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("Invalid ACCESS_TOKEN_EXPIRE_MINUTES")?;

        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("Invalid DATABASE_MAX_CONNECTIONS")?,
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()
                    .context("Invalid DATABASE_MIN_CONNECTIONS")?,
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "madr-core".to_string()),
                access_token_ttl_secs: access_token_expire_minutes * 60,
            },
            author_edit_policy: AuthorEditPolicy::parse(
                &env::var("AUTHOR_EDIT_POLICY").unwrap_or_else(|_| "creator-only".to_string()),
            )?,
        })
    }

    /// HTTP listen address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
