//! Report command handlers

use crate::db::ReportScores;
use crate::models::Report;
use crate::state::SharedState;

fn score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

fn print_summary(report: &Report) {
    let label = report.alias.as_deref().unwrap_or(&report.url);
    let status = if report.is_complete() { "✓" } else { "…" };
    println!("{status} {label}");
    println!(
        "  {} | {} | seo {} / a11y {} / usability {}",
        report.hashid,
        report.timestamp,
        score(report.seo),
        score(report.accessibility),
        score(report.usability)
    );
}

pub async fn cmd_report_start(
    state: &SharedState,
    email: &str,
    url: &str,
    alias: Option<&str>,
) -> anyhow::Result<()> {
    let Some(user) = state.accounts.fetch(Some(email), None).await? else {
        println!("No user with email {email}.");
        return Ok(());
    };

    if !user.has_scan_quota() {
        println!("{user} has no scans left (quota: {}).", user.scan_quota);
        return Ok(());
    }

    let report = state.accounts.start_new_report(&user, url, alias).await?;
    println!("✓ Started report {}", report.hashid);

    if let Some(user) = state.accounts.fetch(None, Some(user.id)).await? {
        println!("  Remaining quota: {}", user.scan_quota);
    }

    Ok(())
}

pub async fn cmd_report_show(state: &SharedState, hashid: &str) -> anyhow::Result<()> {
    let Some(report) = state.reports.fetch(hashid).await? else {
        println!("Report {hashid} not found.");
        return Ok(());
    };

    print_summary(&report);

    match state.reports.json_results(&report) {
        Ok(Some(results)) => println!("{}", serde_json::to_string_pretty(&results)?),
        Ok(None) => println!("  No results recorded yet."),
        Err(e) => println!("  ⚠ {e}"),
    }

    Ok(())
}

pub async fn cmd_report_list(state: &SharedState, email: &str) -> anyhow::Result<()> {
    let Some(user) = state.accounts.fetch(Some(email), None).await? else {
        println!("No user with email {email}.");
        return Ok(());
    };

    let reports = state.reports.list_for_user(user.id).await?;
    if reports.is_empty() {
        println!("{user} has no reports.");
        return Ok(());
    }

    println!("Reports for {user} ({} total)", reports.len());
    println!("{:-<70}", "");
    for report in &reports {
        print_summary(report);
    }

    Ok(())
}

pub async fn cmd_report_record(
    state: &SharedState,
    hashid: &str,
    results: &str,
    scores: ReportScores,
) -> anyhow::Result<()> {
    let Some(report) = state.reports.fetch(hashid).await? else {
        println!("Report {hashid} not found.");
        return Ok(());
    };

    let report = state.reports.update_results(&report, results, scores).await?;
    println!("✓ Recorded results for {}", report.hashid);

    Ok(())
}
