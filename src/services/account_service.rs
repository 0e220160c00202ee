//! Domain service for user accounts.
//!
//! Handles registration, credential checks, session tokens, scan quota
//! accounting and account removal.

use thiserror::Error;

use crate::models::{Report, User};

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::EmailTaken`] if the email is already in use;
    /// the existing account is left untouched.
    async fn register(&self, name: &str, email: &str, password: &str)
    -> Result<User, AccountError>;

    /// Looks a user up by email or id.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Validation`] if neither selector is given.
    async fn fetch(&self, email: Option<&str>, id: Option<i32>)
    -> Result<Option<User>, AccountError>;

    async fn exists(&self, email: &str) -> Result<bool, AccountError>;

    /// Checks a candidate password against the user's stored hash.
    async fn check_password(&self, user: &User, candidate: &str) -> Result<bool, AccountError>;

    /// Verifies credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for an unknown email or a
    /// wrong password.
    async fn login(&self, email: &str, password: &str) -> Result<String, AccountError>;

    /// Issues a session token and remembers it on the user row.
    /// `expires_in` defaults to the configured lifetime.
    ///
    /// Returns [`AccountError::Validation`] for a non-positive or out of
    /// range lifetime; the stored token is left untouched in that case.
    async fn issue_token(&self, user: &User, expires_in: Option<i64>)
    -> Result<String, AccountError>;

    /// Resolves a session token to its user.
    ///
    /// Bad signatures, expired or malformed tokens and unknown subjects all
    /// return `Ok(None)`.
    async fn authenticate(&self, token: &str) -> Result<Option<User>, AccountError>;

    /// Forgets the remembered session token.
    async fn logout(&self, user: &User) -> Result<(), AccountError>;

    /// Deletes the user and every report it owns.
    async fn delete_user(&self, user: &User) -> Result<(), AccountError>;

    /// Creates a report for `user` and spends one scan of quota.
    ///
    /// The quota is not checked; callers enforce exhaustion beforehand.
    async fn start_new_report(
        &self,
        user: &User,
        url: &str,
        alias: Option<&str>,
    ) -> Result<Report, AccountError>;

    /// Decrements the quota by one and returns the new value.
    async fn reduce_scan_quota(&self, user: &User) -> Result<i32, AccountError>;

    /// Grants or revokes the admin flag.
    async fn set_admin(&self, user: &User, is_admin: bool) -> Result<(), AccountError>;
}
