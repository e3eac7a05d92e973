use rocket::serde::json::Json;
use rocket::State;

use shared::{FeedLoader, FeedSnapshot};

use super::{authenticated_client, ApiFailure, BearerToken};
use crate::Env;

/// The whole personalized view in one response: followed accounts,
/// merged timeline, streak leaderboard and today's digest. Computed
/// fresh from the GitHub API on every call.
#[get("/feed")]
pub async fn get_feed(
    token: BearerToken,
    env: &State<Env>,
) -> Result<Json<FeedSnapshot>, ApiFailure> {
    let client = authenticated_client(token, env).await?;
    let snapshot = FeedLoader::new().load(&client).await?;
    Ok(Json(snapshot))
}
