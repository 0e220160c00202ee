//! `SeaORM` implementation of the `AccountService` trait.

use crate::config::{AccountsConfig, SecurityConfig};
use crate::db::Store;
use crate::models::{Report, User};
use crate::services::account_service::{AccountError, AccountService};
use crate::services::session::SessionSigner;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use tokio::task;
use tracing::{debug, info};

pub struct SeaOrmAccountService {
    store: Store,
    signer: SessionSigner,
    security: SecurityConfig,
    accounts: AccountsConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(
        store: Store,
        signer: SessionSigner,
        security: SecurityConfig,
        accounts: AccountsConfig,
    ) -> Self {
        Self {
            store,
            signer,
            security,
            accounts,
        }
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        if email.trim().is_empty() {
            return Err(AccountError::Validation("Email is required".to_string()));
        }

        self.store
            .create_user(name, email, password, &self.security, &self.accounts)
            .await?
            .ok_or_else(|| AccountError::EmailTaken(email.to_string()))
    }

    async fn fetch(
        &self,
        email: Option<&str>,
        id: Option<i32>,
    ) -> Result<Option<User>, AccountError> {
        if email.is_none_or(str::is_empty) && id.is_none() {
            return Err(AccountError::Validation(
                "Required params: email or id".to_string(),
            ));
        }

        Ok(self.store.fetch_user(email, id).await?)
    }

    async fn exists(&self, email: &str) -> Result<bool, AccountError> {
        Ok(self.store.user_exists(email).await?)
    }

    async fn check_password(&self, user: &User, candidate: &str) -> Result<bool, AccountError> {
        let user = user.clone();
        let candidate = candidate.to_string();

        // PBKDF2 is CPU bound, keep it off the async workers
        let is_valid = task::spawn_blocking(move || user.check_password(&candidate))
            .await
            .context("Password verification task panicked")?;

        Ok(is_valid)
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, AccountError> {
        let Some(user) = self.store.get_user_by_email(email).await? else {
            return Err(AccountError::InvalidCredentials);
        };

        if !self.check_password(&user, password).await? {
            return Err(AccountError::InvalidCredentials);
        }

        self.issue_token(&user, None).await
    }

    async fn issue_token(
        &self,
        user: &User,
        expires_in: Option<i64>,
    ) -> Result<String, AccountError> {
        let expires_in = expires_in.unwrap_or_else(|| self.signer.default_ttl_seconds());
        if expires_in <= 0 || Utc::now().timestamp().checked_add(expires_in).is_none() {
            return Err(AccountError::Validation(format!(
                "Token lifetime out of range: {expires_in}s"
            )));
        }

        let token = self.signer.sign(&user.email, user.id, expires_in)?;

        // Single slot: older tokens are not revoked, only no longer remembered
        self.store
            .set_user_token(user.id, Some(token.clone()))
            .await?;

        debug!(user_id = user.id, expires_in, "Issued session token");
        Ok(token)
    }

    async fn authenticate(&self, token: &str) -> Result<Option<User>, AccountError> {
        let Some(claims) = self.signer.verify(token) else {
            return Ok(None);
        };

        let user = self.store.get_user_by_email(&claims.user_email).await?;
        if user.is_none() {
            debug!(email = %claims.user_email, "Session token subject no longer exists");
        }

        Ok(user)
    }

    async fn logout(&self, user: &User) -> Result<(), AccountError> {
        self.store.set_user_token(user.id, None).await?;
        Ok(())
    }

    async fn delete_user(&self, user: &User) -> Result<(), AccountError> {
        if !self.store.delete_user(user.id).await? {
            return Err(AccountError::UserNotFound);
        }

        info!(user_id = user.id, "Account removed");
        Ok(())
    }

    async fn start_new_report(
        &self,
        user: &User,
        url: &str,
        alias: Option<&str>,
    ) -> Result<Report, AccountError> {
        Ok(self.store.start_new_report(user.id, url, alias).await?)
    }

    async fn reduce_scan_quota(&self, user: &User) -> Result<i32, AccountError> {
        Ok(self.store.reduce_scan_quota(user.id).await?)
    }

    async fn set_admin(&self, user: &User, is_admin: bool) -> Result<(), AccountError> {
        self.store.set_user_admin(user.id, is_admin).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_conversions_work() {
        let db_err = sea_orm::DbErr::Custom("test".to_string());
        let err: AccountError = db_err.into();
        assert!(matches!(err, AccountError::Database(_)));

        let err: AccountError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AccountError::Internal(_)));
    }
}
