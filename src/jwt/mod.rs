//! JWT token handling

use crate::config::JwtConfig;
use crate::error::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Access token claims. The subject is the user's username; resolution to a
/// stored account happens at extraction time, after signature and expiry
/// checks pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (username)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create a Validation with a strict leeway (5 seconds) instead of the
    /// default 60 seconds, so tokens expire promptly while still tolerating
    /// minor clock skew.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 5;
        v.set_issuer(&[&self.config.issuer]);
        v
    }

    /// Create a signed, time-limited access token for a username
    pub fn create_access_token(&self, username: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_ttl_secs);

        let claims = AccessClaims {
            sub: username.to_string(),
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(Algorithm::HS256);
        Ok(encode(&header, &claims, &self.encoding_key)?)
    }

    /// Verify signature, expiry and issuer; return the decoded claims
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.strict_validation())?;
        Ok(token_data.claims)
    }

    /// Get token expiration TTL in seconds
    pub fn access_token_ttl(&self) -> i64 {
        self.config.access_token_ttl_secs
    }
}
