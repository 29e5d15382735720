//! API query and error types.
//!
//! Response bodies reuse the `Serialize` report types directly; only the
//! query and error shapes live here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Optional date range for the daily series endpoint, inclusive on both ends.
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    /// Start date (`YYYY-MM-DD`).
    pub from: Option<NaiveDate>,
    /// End date (`YYYY-MM-DD`).
    pub to: Option<NaiveDate>,
}

/// Error response body for 4xx results.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
