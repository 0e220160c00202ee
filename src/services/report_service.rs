//! Domain service for scan reports.

use thiserror::Error;

use crate::db::ReportScores;
use crate::models::Report;

/// Errors specific to report operations.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report not found: {0}")]
    NotFound(String),

    #[error("Stored results are not valid JSON: {0}")]
    InvalidResults(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReportError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReportError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for reports.
#[async_trait::async_trait]
pub trait ReportService: Send + Sync {
    /// Creates a report with a fresh hashid. Does not touch the owner's quota.
    async fn create(
        &self,
        url: &str,
        user_id: i32,
        alias: Option<&str>,
    ) -> Result<Report, ReportError>;

    /// Looks a report up by its external hashid.
    async fn fetch(&self, hashid: &str) -> Result<Option<Report>, ReportError>;

    /// Reports owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Report>, ReportError>;

    /// Records the scan engine's output. Each call overwrites the last.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NotFound`] if the report has been deleted.
    async fn update_results(
        &self,
        report: &Report,
        results: &str,
        scores: ReportScores,
    ) -> Result<Report, ReportError>;

    /// Parses the stored results; `Ok(None)` while none are recorded.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidResults`] when the normalized payload is
    /// not JSON.
    fn json_results(&self, report: &Report) -> Result<Option<serde_json::Value>, ReportError> {
        Ok(report.json_results()?)
    }
}
