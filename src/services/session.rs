//! HS256 session tokens.
//!
//! The signing secret is read once from [`SecurityConfig`] and held by a
//! [`SessionSigner`] that is handed to whoever needs it; there is no global.

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SecurityConfig;

/// Claims embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_email: String,
    pub id: i32,
    /// Absolute expiry, seconds since the epoch
    pub exp: i64,
}

#[derive(Clone)]
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl_seconds: i64,
}

impl SessionSigner {
    pub fn new(secret: &str, default_ttl_seconds: i64) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("Session signing secret must not be empty");
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl_seconds,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self> {
        Self::new(&security.secret_key, security.token_ttl_seconds)
    }

    #[must_use]
    pub const fn default_ttl_seconds(&self) -> i64 {
        self.default_ttl_seconds
    }

    /// Sign a token for `email`/`id` that expires `expires_in` seconds from now.
    ///
    /// Fails if the resulting expiry does not fit in an `i64` timestamp.
    pub fn sign(&self, email: &str, id: i32, expires_in: i64) -> Result<String> {
        let exp = Utc::now()
            .timestamp()
            .checked_add(expires_in)
            .ok_or_else(|| anyhow::anyhow!("Token lifetime out of range: {expires_in}s"))?;

        let claims = SessionClaims {
            user_email: email.to_string(),
            id,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify signature and expiry. Every failure mode yields `None`.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        match decode::<SessionClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("Session token rejected: {e}");
                None
            }
        }
    }
}
