//! Snapshot loading: dashboard endpoint or saved JSON file
//!
//! The endpoint is a spreadsheet-backed script that returns one JSON snapshot
//! per year/month/category filter. Each call returns a fresh snapshot.

use anyhow::{Context, Result, anyhow};
use expense_dashboard::{DashboardSnapshot, ExpenseCategory, MonthSelector};
use reqwest::Url;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::Config;
use crate::constants;

/// Filter sent to the endpoint
#[derive(Debug, Clone)]
pub struct SnapshotQuery {
    pub year: i32,
    pub month: MonthSelector,
    /// The endpoint filters on one category at most
    pub category: Option<ExpenseCategory>,
}

/// Build the request URL with year/month/category query parameters
pub fn build_url(endpoint: &str, query: &SnapshotQuery) -> Result<Url> {
    let mut params = vec![
        ("year", query.year.to_string()),
        ("month", query.month.to_string()),
    ];
    if let Some(category) = &query.category {
        params.push(("category", category.key().to_string()));
    }

    Url::parse_with_params(endpoint, &params)
        .with_context(|| format!("Invalid endpoint URL: {}", endpoint))
}

/// Fetch a snapshot from the endpoint with retry logic
pub async fn fetch_snapshot(config: &Config, query: &SnapshotQuery) -> Result<DashboardSnapshot> {
    let endpoint = config.endpoint.as_deref().ok_or_else(|| {
        anyhow!("No snapshot source: pass --input <file> or set [source] endpoint in config.toml")
    })?;
    let url = build_url(endpoint, query)?;

    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .context("Failed to build HTTP client")?;

    info!(year = query.year, month = %query.month, "querying dashboard endpoint");

    // Retry with exponential backoff (longer delays for rate limiting)
    let max_retries = constants::FETCH_MAX_RETRIES;
    let mut last_error = None;
    let mut was_rate_limited = false;

    for attempt in 0..max_retries {
        if attempt > 0 {
            let delay = retry_delay(attempt, was_rate_limited);
            warn!(
                attempt,
                max_retries = max_retries - 1,
                ?delay,
                rate_limited = was_rate_limited,
                "retrying dashboard fetch"
            );
            sleep(delay).await;
        }

        match client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    let body = response.text().await.context("Failed to read response body")?;
                    return DashboardSnapshot::from_json(&body)
                        .context("Dashboard endpoint returned an invalid snapshot");
                } else if status.as_u16() == 429 {
                    was_rate_limited = true;
                    last_error = Some(anyhow!("Rate limited (429)"));
                } else {
                    was_rate_limited = false;
                    last_error = Some(anyhow!("Dashboard endpoint returned status: {}", status));
                }
            }
            Err(e) => {
                was_rate_limited = false;
                last_error = Some(anyhow!("Request failed: {}", e));
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow!("Failed after {} retries", max_retries)))
}

/// Backoff before retry `attempt` (1-based)
fn retry_delay(attempt: u32, rate_limited: bool) -> Duration {
    let base = if rate_limited {
        constants::RATE_LIMIT_BASE_DELAY_SECS
    } else {
        constants::RETRY_BASE_DELAY_SECS
    };
    Duration::from_secs(base * 2u64.pow(attempt.saturating_sub(1)))
}

/// Load a snapshot saved from the endpoint
pub fn load_snapshot_file(path: &Path) -> Result<DashboardSnapshot> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    let snapshot = DashboardSnapshot::from_json(&body)
        .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?;
    info!(path = %path.display(), "loaded snapshot file");
    Ok(snapshot)
}
