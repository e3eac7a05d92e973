use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::json::Json;
use rocket::State;

use shared::{ApiError, FeedError, GithubClient};

use crate::Env;

pub mod digest;
pub mod feed;
pub mod streaks;
pub mod types;

use types::ErrorResponse;

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing entrypoints", |rocket| async {
        rocket.mount(
            "/api",
            rocket::routes![feed::get_feed, streaks::get_streaks, digest::get_digest],
        )
    })
}

/// The caller's GitHub credential, taken from the `Authorization`
/// header. Both `token <...>` and `Bearer <...>` spellings are
/// accepted; a missing header is a 401 before any upstream call.
pub struct BearerToken(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match request.headers().get_one("Authorization") {
            Some(value) => {
                let token = value
                    .strip_prefix("token ")
                    .or_else(|| value.strip_prefix("Bearer "))
                    .unwrap_or(value);
                Outcome::Success(Self(token.trim().to_string()))
            }
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

/// Builds a client for the caller's token and validates the
/// credential before any fan-out starts: a dead token fails right
/// here with a 401 and a re-auth signal instead of surfacing as a
/// pile of per-account fetch failures.
pub async fn authenticated_client(
    token: BearerToken,
    env: &State<Env>,
) -> Result<GithubClient, ApiFailure> {
    let client = GithubClient::new(token.0)?;
    let client = match env.github_base_url.as_deref() {
        Some(base) => client.with_base_url(base),
        None => client,
    };
    client.current_user().await?;
    Ok(client)
}

/// User-visible failure. Fatal upstream problems are logged here, at
/// the single place they cross into a response.
pub struct ApiFailure {
    status: Status,
    message: String,
    reauth_required: bool,
}

impl From<ApiError> for ApiFailure {
    fn from(e: ApiError) -> Self {
        tracing::error!("feed request failed: {e:#}");
        let reauth_required = e.requires_reauth();
        let status = match &e {
            ApiError::Auth => Status::Unauthorized,
            ApiError::RateLimited { .. } => Status::Forbidden,
            ApiError::Upstream { .. }
            | ApiError::PaginationOverflow(_)
            | ApiError::Transport(_) => Status::BadGateway,
        };
        Self {
            status,
            message: e.to_string(),
            reauth_required,
        }
    }
}

impl From<FeedError> for ApiFailure {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::Api(api) => api.into(),
            // Each request owns its loader, so a superseded load
            // cannot happen here; mapped anyway to keep the type total.
            FeedError::Superseded => Self {
                status: Status::ServiceUnavailable,
                message: e.to_string(),
                reauth_required: false,
            },
        }
    }
}

impl ApiFailure {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: Status::BadRequest,
            message: message.into(),
            reauth_required: false,
        }
    }
}

impl<'r> rocket::response::Responder<'r, 'static> for ApiFailure {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let body = Json(ErrorResponse {
            error: self.message,
            reauth_required: self.reauth_required,
        });
        rocket::response::status::Custom(self.status, body).respond_to(request)
    }
}
