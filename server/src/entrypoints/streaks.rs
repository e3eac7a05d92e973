use rocket::serde::json::Json;
use rocket::State;

use shared::{ContributionRecord, FeedLoader};

use super::{authenticated_client, ApiFailure, BearerToken};
use crate::Env;

/// Streak leaderboard over the followed accounts, longest current
/// streak first.
#[get("/streaks")]
pub async fn get_streaks(
    token: BearerToken,
    env: &State<Env>,
) -> Result<Json<Vec<ContributionRecord>>, ApiFailure> {
    let client = authenticated_client(token, env).await?;
    let snapshot = FeedLoader::new().load(&client).await?;
    Ok(Json(snapshot.contributions))
}
