//! Error type for the aggregation engine
//!
//! Missing months, missing categories and zero sales are not errors: they
//! default to zero. Only malformed input ends up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid dashboard snapshot JSON: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),

    #[error("unknown month '{0}' (expected a month name such as \"january\" or \"jan\")")]
    UnknownMonth(String),

    #[error("unknown month selector '{0}' (expected \"all\" or a month name)")]
    UnknownSelector(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
