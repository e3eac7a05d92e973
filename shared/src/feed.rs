use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::contribution::{compute_contributions, leaderboard, ContributionRecord, LOOKBACK_DAYS};
use crate::digest::{activity_summary, digest_stats, ActivitySummary, DigestStats};
use crate::event::{Account, Event};
use crate::github::{ApiError, GithubClient};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed load superseded by a newer refresh")]
    Superseded,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Everything a single page load produces. Contributions arrive
/// already in leaderboard order.
#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    pub following: Vec<Account>,
    pub timeline: Vec<Event>,
    pub contributions: Vec<ContributionRecord>,
    pub today: ActivitySummary,
    pub stats: DigestStats,
}

/// Orchestrates one full load: followed accounts, per-account event
/// fan-out, contribution analysis and digest projection.
///
/// Each load is tagged with a generation; starting a new load
/// supersedes every one still in flight, and a superseded load's
/// results are discarded instead of being handed to the caller. That
/// is the guard against a stale refresh overwriting a newer one.
#[derive(Debug, Default)]
pub struct FeedLoader {
    generation: AtomicU64,
}

impl FeedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    #[instrument(skip(self, client))]
    pub async fn load(&self, client: &GithubClient) -> Result<FeedSnapshot, FeedError> {
        let generation = self.begin();
        let snapshot = self.load_inner(client).await?;

        if !self.is_current(generation) {
            return Err(FeedError::Superseded);
        }
        Ok(snapshot)
    }

    async fn load_inner(&self, client: &GithubClient) -> Result<FeedSnapshot, FeedError> {
        // A failure here is fatal for the whole load; per-account
        // failures below are absorbed inside the fan-out.
        let following = client.get_following().await?;

        let now = Utc::now();
        let per_account = client.events_per_account(&following).await;

        let mut timeline = Vec::new();
        let mut records = Vec::with_capacity(per_account.len());
        for (account, events) in per_account {
            records.push(compute_contributions(account, &events, LOOKBACK_DAYS, now));
            timeline.extend(events);
        }
        timeline.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let today = activity_summary(&timeline, now.date_naive());
        let stats = digest_stats(following.len(), timeline.len(), LOOKBACK_DAYS);

        Ok(FeedSnapshot {
            following,
            timeline,
            contributions: leaderboard(records),
            today,
            stats,
        })
    }
}
