use crate::config::{AccountsConfig, SecurityConfig};
use crate::models::{Checkpoint, Report, User};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::report::ReportScores;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file: {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn report_repo(&self) -> repositories::report::ReportRepository {
        repositories::report::ReportRepository::new(self.conn.clone())
    }

    fn checkpoint_repo(&self) -> repositories::checkpoint::CheckpointRepository {
        repositories::checkpoint::CheckpointRepository::new(self.conn.clone())
    }

    // ========== User Repository Methods ==========

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        security: &SecurityConfig,
        accounts: &AccountsConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .create(name, email, password, security, accounts)
            .await
    }

    pub async fn fetch_user(&self, email: Option<&str>, id: Option<i32>) -> Result<Option<User>> {
        self.user_repo().fetch(email, id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn user_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().exists(email).await
    }

    pub async fn set_user_token(&self, user_id: i32, token: Option<String>) -> Result<()> {
        self.user_repo().set_token(user_id, token).await
    }

    pub async fn set_user_admin(&self, user_id: i32, is_admin: bool) -> Result<()> {
        self.user_repo().set_admin(user_id, is_admin).await
    }

    pub async fn reduce_scan_quota(&self, user_id: i32) -> Result<i32> {
        self.user_repo().reduce_scan_quota(user_id).await
    }

    pub async fn delete_user(&self, user_id: i32) -> Result<bool> {
        self.user_repo().delete(user_id).await
    }

    /// Create a report owned by `user_id`, then take one scan off its quota.
    /// The quota is not checked first.
    pub async fn start_new_report(
        &self,
        user_id: i32,
        url: &str,
        alias: Option<&str>,
    ) -> Result<Report> {
        let report = self.report_repo().create(url, user_id, alias).await?;
        self.user_repo().reduce_scan_quota(user_id).await?;
        Ok(report)
    }

    // ========== Report Repository Methods ==========

    pub async fn create_report(
        &self,
        url: &str,
        user_id: i32,
        alias: Option<&str>,
    ) -> Result<Report> {
        self.report_repo().create(url, user_id, alias).await
    }

    pub async fn fetch_report(&self, hashid: &str) -> Result<Option<Report>> {
        self.report_repo().fetch(hashid).await
    }

    pub async fn list_reports_for_user(&self, user_id: i32) -> Result<Vec<Report>> {
        self.report_repo().list_for_user(user_id).await
    }

    pub async fn update_report_results(
        &self,
        report_id: i32,
        results: &str,
        scores: ReportScores,
    ) -> Result<Option<Report>> {
        self.report_repo()
            .update_results(report_id, results, scores)
            .await
    }

    // ========== Checkpoint Repository Methods ==========

    pub async fn create_checkpoint(&self, checkpoint: &Checkpoint) -> Result<()> {
        self.checkpoint_repo().create(checkpoint).await
    }

    pub async fn get_checkpoint(&self, id: i32) -> Result<Option<Checkpoint>> {
        self.checkpoint_repo().get(id).await
    }

    pub async fn get_all_checkpoints(&self) -> Result<Vec<Checkpoint>> {
        self.checkpoint_repo().get_all().await
    }

    /// Bulk-load checkpoints from a JSON array file
    pub async fn seed_checkpoints(&self, path: &Path) -> Result<usize> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read checkpoint file: {}", path.display()))?;

        let batch: Vec<Checkpoint> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse checkpoint file: {}", path.display()))?;

        self.checkpoint_repo().create_many(&batch).await
    }
}
