use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::event::{Account, AccountKind, Commit, Event, EventKind};

/// Account record as returned by `/user/following`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl From<RawUser> for Account {
    fn from(user: RawUser) -> Self {
        Self {
            kind: AccountKind::from_api(&user.kind),
            login: user.login,
            avatar_url: user.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawActor {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRepo {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommit {
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPayload {
    pub commits: Option<Vec<RawCommit>>,
}

/// Event record as returned by `/users/{login}/events` and
/// `/orgs/{login}/events`. Only `payload.commits` is treated as
/// optional; the rest of the shape is taken at face value.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub actor: RawActor,
    pub repo: RawRepo,
    #[serde(default)]
    pub payload: RawPayload,
    pub created_at: DateTime<Utc>,
}

impl From<RawEvent> for Event {
    fn from(event: RawEvent) -> Self {
        Self {
            kind: EventKind::from_api(&event.event_type),
            id: event.id,
            actor: Account {
                login: event.actor.login,
                avatar_url: event.actor.avatar_url,
                // The events API does not carry the actor's account type.
                kind: AccountKind::Person,
            },
            repo: event.repo.name,
            commits: event
                .payload
                .commits
                .unwrap_or_default()
                .into_iter()
                .map(|commit| Commit {
                    sha: commit.sha,
                    message: commit.message,
                })
                .collect(),
            created_at: event.created_at,
        }
    }
}
