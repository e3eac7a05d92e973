use chrono::NaiveDate;
use serde::Serialize;

use shared::{ActivitySummary, ContributionRecord, DigestStats};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub reauth_required: bool,
}

/// Digest for one calendar day, plus the window-wide extras shown
/// next to it.
#[derive(Debug, Serialize)]
pub struct DigestResponse {
    pub day: NaiveDate,
    pub summary: ActivitySummary,
    pub top_contributor: Option<ContributionRecord>,
    pub stats: DigestStats,
}
