//! `SeaORM` implementation of the `ReportService` trait.

use crate::db::{ReportScores, Store};
use crate::models::Report;
use crate::services::report_service::{ReportError, ReportService};
use async_trait::async_trait;

pub struct SeaOrmReportService {
    store: Store,
}

impl SeaOrmReportService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReportService for SeaOrmReportService {
    async fn create(
        &self,
        url: &str,
        user_id: i32,
        alias: Option<&str>,
    ) -> Result<Report, ReportError> {
        Ok(self.store.create_report(url, user_id, alias).await?)
    }

    async fn fetch(&self, hashid: &str) -> Result<Option<Report>, ReportError> {
        Ok(self.store.fetch_report(hashid).await?)
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Report>, ReportError> {
        Ok(self.store.list_reports_for_user(user_id).await?)
    }

    async fn update_results(
        &self,
        report: &Report,
        results: &str,
        scores: ReportScores,
    ) -> Result<Report, ReportError> {
        self.store
            .update_report_results(report.id, results, scores)
            .await?
            .ok_or_else(|| ReportError::NotFound(report.hashid.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_failures_convert() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ReportError = parse_err.into();
        assert!(matches!(err, ReportError::InvalidResults(_)));
    }
}
