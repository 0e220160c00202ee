use anyhow::{Context, Result};
use pbkdf2::{
    Algorithm, Params, Pbkdf2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use tokio::task;
use tracing::{debug, info, warn};

use crate::config::{AccountsConfig, SecurityConfig};
use crate::constants::passwords::SALT_LEN;
use crate::entities::{reports, users};
use crate::models::User;

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            scan_quota: model.scan_quota,
            is_admin: model.is_admin,
            token: model.token,
            password_hash: model.password,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Register a user.
    ///
    /// Returns `Ok(None)` without touching the store when `email` is already
    /// registered.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
        security: &SecurityConfig,
        accounts: &AccountsConfig,
    ) -> Result<Option<User>> {
        if self.exists(email).await? {
            debug!(email, "Registration skipped, email already in use");
            return Ok(None);
        }

        let password = password.to_string();
        let rounds = security.pbkdf2_rounds;
        let password_hash = task::spawn_blocking(move || hash_password(&password, rounds))
            .await
            .context("Password hashing task panicked")??;

        let active = users::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            scan_quota: Set(accounts.default_scan_quota),
            is_admin: Set(false),
            password: Set(password_hash),
            token: Set(None),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        info!(user_id = model.id, email, "Registered user");
        Ok(Some(User::from(model)))
    }

    /// Look a user up by email or by id. Email wins when both are given.
    pub async fn fetch(&self, email: Option<&str>, id: Option<i32>) -> Result<Option<User>> {
        match (email.filter(|e| !e.is_empty()), id) {
            (Some(email), _) => self.get_by_email(email).await,
            (None, Some(id)) => self.get_by_id(id).await,
            (None, None) => anyhow::bail!("Required params: email or id"),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn exists(&self, email: &str) -> Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("Failed to count users by email")?;

        Ok(count > 0)
    }

    /// Replace the remembered session token. `None` clears it.
    pub async fn set_token(&self, id: i32, token: Option<String>) -> Result<()> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for token update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.token = Set(token);
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn set_admin(&self, id: i32, is_admin: bool) -> Result<()> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for admin update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.is_admin = Set(is_admin);
        active.update(&self.conn).await?;

        info!(user_id = id, is_admin, "Updated admin flag");
        Ok(())
    }

    /// Decrement the scan quota by one and return the new value. No floor.
    pub async fn reduce_scan_quota(&self, id: i32) -> Result<i32> {
        let res = users::Entity::update_many()
            .col_expr(
                users::Column::ScanQuota,
                Expr::col(users::Column::ScanQuota).sub(1),
            )
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to reduce scan quota")?;

        if res.rows_affected == 0 {
            anyhow::bail!("User not found: {id}");
        }

        let quota = self
            .get_by_id(id)
            .await?
            .map(|u| u.scan_quota)
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        if quota < 0 {
            warn!(user_id = id, quota, "Scan quota is negative");
        }

        Ok(quota)
    }

    /// Delete a user together with every report it owns.
    /// Returns `false` if no such user existed.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let removed_reports = reports::Entity::delete_many()
            .filter(reports::Column::Userid.eq(id))
            .exec(&txn)
            .await
            .context("Failed to delete reports for user")?;

        let removed = users::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("Failed to delete user")?;

        txn.commit().await?;

        if removed.rows_affected > 0 {
            info!(
                user_id = id,
                reports = removed_reports.rows_affected,
                "Deleted user"
            );
        }

        Ok(removed.rows_affected > 0)
    }
}

/// Hash a password with PBKDF2-HMAC-SHA256 and an 8 byte random salt.
/// The result is a PHC string that records its own round count.
pub fn hash_password(password: &str, rounds: u32) -> Result<String> {
    use rand::Rng;

    let salt_bytes: [u8; SALT_LEN] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| anyhow::anyhow!("Failed to encode salt: {e}"))?;

    let params = Params {
        rounds,
        output_length: 32,
    };

    let hash = Pbkdf2
        .hash_password_customized(
            password.as_bytes(),
            Some(Algorithm::Pbkdf2Sha256.ident()),
            None,
            params,
            &salt,
        )
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check `candidate` against a stored PHC hash. A malformed hash never matches.
#[must_use]
pub fn verify_password(password_hash: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Pbkdf2
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
