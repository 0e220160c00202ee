use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::constants::reports::HASHID_SALT_MAX;
use crate::entities::reports;
use crate::models::Report;

impl From<reports::Model> for Report {
    fn from(model: reports::Model) -> Self {
        Self {
            id: model.id,
            hashid: model.hashid,
            url: model.url,
            timestamp: model.timestamp,
            alias: model.alias,
            results: model.results,
            seo: model.seo,
            accessibility: model.accessibility,
            usability: model.usability,
            user_id: model.userid,
        }
    }
}

/// Scores recorded alongside a results payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportScores {
    pub seo: f64,
    pub accessibility: f64,
    pub usability: f64,
}

pub struct ReportRepository {
    conn: DatabaseConnection,
}

impl ReportRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, url: &str, user_id: i32, alias: Option<&str>) -> Result<Report> {
        let now = Utc::now();
        let hashid = new_hashid(url, now);

        let active = reports::ActiveModel {
            url: Set(url.to_string()),
            timestamp: Set(format_timestamp(now)),
            alias: Set(alias.map(str::to_string)),
            results: Set(None),
            hashid: Set(hashid.clone()),
            seo: Set(None),
            accessibility: Set(None),
            usability: Set(None),
            userid: Set(user_id),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert report")?;

        info!(user_id, %hashid, url, "Created report");
        Ok(Report::from(model))
    }

    /// Look up by the external hash identifier
    pub async fn fetch(&self, hashid: &str) -> Result<Option<Report>> {
        let report = reports::Entity::find()
            .filter(reports::Column::Hashid.eq(hashid))
            .one(&self.conn)
            .await
            .context("Failed to query report by hashid")?;

        if report.is_none() {
            debug!(hashid, "Report not found");
        }

        Ok(report.map(Report::from))
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Report>> {
        let rows = reports::Entity::find()
            .filter(reports::Column::Userid.eq(user_id))
            .order_by_desc(reports::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list reports for user")?;

        Ok(rows.into_iter().map(Report::from).collect())
    }

    /// Overwrite results and scores. Repeated calls replace earlier values.
    /// Returns `None` when no report has this id.
    pub async fn update_results(
        &self,
        id: i32,
        results: &str,
        scores: ReportScores,
    ) -> Result<Option<Report>> {
        let active = reports::ActiveModel {
            id: Set(id),
            results: Set(Some(results.to_string())),
            seo: Set(Some(scores.seo)),
            accessibility: Set(Some(scores.accessibility)),
            usability: Set(Some(scores.usability)),
            ..Default::default()
        };

        let model = match active.update(&self.conn).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => {
                debug!(report_id = id, "No report to record results on");
                return Ok(None);
            }
            Err(e) => return Err(anyhow::Error::new(e).context("Failed to record report results")),
        };

        info!(hashid = %model.hashid, "Recorded report results");
        Ok(Some(Report::from(model)))
    }
}

fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Fresh hashid for `url` created at `instant`, salted with a random integer
/// in `0..=1000`.
#[must_use]
pub fn new_hashid(url: &str, instant: DateTime<Utc>) -> String {
    use rand::Rng;

    let salt = rand::rng().random_range(0..=HASHID_SALT_MAX);
    compute_hashid(url, instant, salt)
}

/// SHA-256 over `"{url}-{instant}-{salt}"`, hex encoded (64 chars).
#[must_use]
pub fn compute_hashid(url: &str, instant: DateTime<Utc>, salt: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{url}-{}-{salt}", format_timestamp(instant)).as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn hashid_is_64_lowercase_hex() {
        let hashid = new_hashid("https://example.com", Utc::now());
        assert_eq!(hashid.len(), 64);
        assert!(
            hashid
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn hashid_is_deterministic_for_fixed_inputs() {
        let instant = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let a = compute_hashid("https://example.com", instant, 42);
        let b = compute_hashid("https://example.com", instant, 42);
        let c = compute_hashid("https://example.com", instant, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn hashids_unique_across_rapid_creation() {
        let hashids: HashSet<String> = (0..10_000)
            .map(|_| new_hashid("https://example.com", Utc::now()))
            .collect();
        assert_eq!(hashids.len(), 10_000);
    }
}
