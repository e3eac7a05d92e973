use std::time::Duration;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use tracing::{instrument, warn};

use crate::event::{Account, AccountKind, Event};

mod types;
pub use types::*;

const BASE_URL: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("gitfeed/", env!("CARGO_PKG_VERSION"));

/// The API caps `per_page` at 100.
pub const MAX_PER_PAGE: u8 = 100;

/// Hard stop for cursor walks. A following list larger than
/// `MAX_PAGES * MAX_PER_PAGE` entries is indistinguishable from a
/// remote that keeps advertising a `next` relation forever, and we
/// treat it as a protocol error rather than loop on it.
pub const MAX_PAGES: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("github rejected the credential (HTTP 401), re-authentication required")]
    Auth,
    #[error("github rate limit exhausted or insufficient scope (HTTP 403): {body}")]
    RateLimited { body: String },
    #[error("unexpected github response: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("pagination did not terminate within {0} pages")]
    PaginationOverflow(u32),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// A 401 means the held token is dead; nothing short of a new
    /// sign-in will recover, so callers must not retry.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::Auth)
    }
}

/// One page of a paginated listing. `has_next` is derived solely from
/// the presence of a `rel="next"` entry in the `Link` response header,
/// never from comparing item counts.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
    pub next_page: u32,
}

pub(crate) fn link_has_next(link_header: Option<&str>) -> bool {
    link_header.is_some_and(|header| {
        header
            .split(',')
            .any(|entry| entry.contains("rel=\"next\""))
    })
}

#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl GithubClient {
    /// The credential is threaded in explicitly; there is no ambient
    /// session state anywhere in the crate.
    pub fn new(token: String) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            token,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Points the client at a different API root. Used by tests to
    /// target a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header(reqwest::header::AUTHORIZATION, format!("token {}", self.token))
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .query(query)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            reqwest::StatusCode::UNAUTHORIZED => Err(ApiError::Auth),
            reqwest::StatusCode::FORBIDDEN => Err(ApiError::RateLimited {
                body: response.text().await.unwrap_or_default(),
            }),
            status => Err(ApiError::Upstream {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Ok(self.get(path, &[]).await?.json().await?)
    }

    /// Fetches one page of a paginated listing. Pages are 1-indexed,
    /// so `page` is clamped to 1 and `per_page` to the API maximum.
    #[instrument(skip(self))]
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Page<T>, ApiError> {
        let page = page.max(1);
        let per_page = per_page.min(MAX_PER_PAGE);
        let response = self
            .get(
                path,
                &[("page", page.to_string()), ("per_page", per_page.to_string())],
            )
            .await?;

        let has_next = link_has_next(
            response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|value| value.to_str().ok()),
        );

        Ok(Page {
            items: response.json().await?,
            has_next,
            next_page: page + 1,
        })
    }

    /// Walks the page cursor until the remote stops advertising a
    /// `next` relation, concatenating items in request order.
    #[instrument(skip(self))]
    pub async fn fetch_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            if page > MAX_PAGES {
                return Err(ApiError::PaginationOverflow(MAX_PAGES));
            }

            let mut fetched = self.fetch_page(path, page, MAX_PER_PAGE).await?;
            items.append(&mut fetched.items);

            if !fetched.has_next {
                return Ok(items);
            }
            page = fetched.next_page;
        }
    }

    /// Resolves the account behind the credential. Also serves as an
    /// up-front credential check before fanning out.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<Account, ApiError> {
        Ok(self.get_json::<RawUser>("/user").await?.into())
    }

    /// Full followed-account list, paginating until exhausted.
    #[instrument(skip(self))]
    pub async fn get_following(&self) -> Result<Vec<Account>, ApiError> {
        Ok(self
            .fetch_all::<RawUser>("/user/following")
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Recent public events for one account. Persons and organizations
    /// live under different endpoint namespaces.
    #[instrument(skip(self, account), fields(login = %account.login))]
    pub async fn get_user_events(&self, account: &Account) -> Result<Vec<Event>, ApiError> {
        let path = match account.kind {
            AccountKind::Person => format!("/users/{}/events", account.login),
            AccountKind::Organization => format!("/orgs/{}/events", account.login),
        };

        Ok(self
            .get_json::<Vec<RawEvent>>(&path)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Concurrent per-account event fetch. One account's failure is a
    /// partial failure: it is logged and yields an empty list for that
    /// account only, never aborting the batch.
    pub async fn events_per_account(&self, accounts: &[Account]) -> Vec<(Account, Vec<Event>)> {
        let fetches = accounts.iter().map(|account| async move {
            let events = match self.get_user_events(account).await {
                Ok(events) => events,
                Err(e) => {
                    warn!("skipping events for {}: {e:#}", account.login);
                    Vec::new()
                }
            };
            (account.clone(), events)
        });

        join_all(fetches).await
    }

    /// Merged timeline across all followed accounts, newest first.
    /// A plain full sort: per-account lists are bounded by the API's
    /// own event-history limit, so there is nothing to stream.
    pub async fn get_multiple_users_events(&self, accounts: &[Account]) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .events_per_account(accounts)
            .await
            .into_iter()
            .flat_map(|(_, events)| events)
            .collect();

        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::link_has_next;

    #[test]
    fn link_header_with_next_relation() {
        let header = "<https://api.github.com/user/following?page=2>; rel=\"next\", \
                      <https://api.github.com/user/following?page=9>; rel=\"last\"";
        assert!(link_has_next(Some(header)));
    }

    #[test]
    fn link_header_on_last_page() {
        let header = "<https://api.github.com/user/following?page=1>; rel=\"first\", \
                      <https://api.github.com/user/following?page=8>; rel=\"prev\"";
        assert!(!link_has_next(Some(header)));
    }

    #[test]
    fn missing_link_header_means_single_page() {
        assert!(!link_has_next(None));
    }
}
