//! Centralized constants for the expense report CLI
//!
//! Deployment-specific settings (endpoint, currency, targets) live in
//! config.toml.

// =============================================================================
// Configuration
// =============================================================================

/// Default config file path
pub const CONFIG_FILE: &str = "config.toml";

/// HTTP timeout when the config does not set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Fetch retries
// =============================================================================

/// Attempts before giving up on the endpoint
pub const FETCH_MAX_RETRIES: u32 = 4;

/// Backoff base for ordinary failures (seconds, doubled per attempt)
pub const RETRY_BASE_DELAY_SECS: u64 = 2;

/// Backoff base after HTTP 429 (seconds, doubled per attempt)
pub const RATE_LIMIT_BASE_DELAY_SECS: u64 = 30;

// =============================================================================
// File Names
// =============================================================================

/// Monthly sales vs expenses CSV filename
pub const SUMMARY_FILENAME: &str = "summary.csv";

/// Profit & loss statement CSV filename
pub const PNL_FILENAME: &str = "profit_and_loss.csv";

/// Category summary CSV filename
pub const CATEGORY_SUMMARY_FILENAME: &str = "category_summary.csv";

/// Percent-of-sales CSV filename
pub const PERCENT_OF_SALES_FILENAME: &str = "percent_of_sales.csv";
