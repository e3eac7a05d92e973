use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::GithubHandle;

/// A followed identity on GitHub. Snapshot taken once per load,
/// identity key is `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub login: GithubHandle,
    pub avatar_url: String,
    pub kind: AccountKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccountKind {
    Person,
    Organization,
}

impl AccountKind {
    pub fn from_api(kind: &str) -> Self {
        match kind {
            "Organization" => Self::Organization,
            _ => Self::Person,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Push,
    Watch,
    Create,
    Fork,
    Issue,
    PullRequest,
    Other,
}

impl EventKind {
    pub fn from_api(event_type: &str) -> Self {
        match event_type {
            "PushEvent" => Self::Push,
            "WatchEvent" => Self::Watch,
            "CreateEvent" => Self::Create,
            "ForkEvent" => Self::Fork,
            "IssueEvent" | "IssuesEvent" => Self::Issue,
            "PullRequestEvent" => Self::PullRequest,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
}

/// One public activity item attributed to an account. Immutable once
/// fetched; only ever filtered, sorted or aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: String,
    pub kind: EventKind,
    pub actor: Account,
    pub repo: String,
    /// Only populated for push events; the API omits the field otherwise.
    pub commits: Vec<Commit>,
    pub created_at: DateTime<Utc>,
}
