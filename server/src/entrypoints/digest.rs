use chrono::{NaiveDate, Utc};
use rocket::serde::json::Json;
use rocket::State;

use shared::{activity_summary, top_contributor, FeedLoader};

use super::types::DigestResponse;
use super::{authenticated_client, ApiFailure, BearerToken};
use crate::Env;

/// Daily digest. `day` defaults to today (UTC); any other day is
/// projected from the same freshly fetched timeline.
#[get("/digest?<day>")]
pub async fn get_digest(
    token: BearerToken,
    env: &State<Env>,
    day: Option<String>,
) -> Result<Json<DigestResponse>, ApiFailure> {
    let day = match day {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| ApiFailure::bad_request(format!("invalid day: {raw}")))?,
        None => Utc::now().date_naive(),
    };

    let client = authenticated_client(token, env).await?;
    let snapshot = FeedLoader::new().load(&client).await?;

    Ok(Json(DigestResponse {
        day,
        summary: activity_summary(&snapshot.timeline, day),
        top_contributor: top_contributor(&snapshot.contributions).cloned(),
        stats: snapshot.stats,
    }))
}
