pub mod contribution;
pub mod digest;
pub mod event;
pub mod feed;
pub mod github;

pub use contribution::{
    compute_contributions, leaderboard, ContributionRecord, DailyContribution, LOOKBACK_DAYS,
};
pub use digest::{activity_summary, digest_stats, top_contributor, ActivitySummary, DigestStats};
pub use event::{Account, AccountKind, Commit, Event, EventKind};
pub use feed::{FeedError, FeedLoader, FeedSnapshot};
pub use github::{ApiError, GithubClient, Page};

pub type GithubHandle = String;
