#[macro_use]
extern crate rocket;

mod entrypoints;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Server-side configuration. The GitHub credential itself is never
/// configured here: it arrives with every request and dies with it.
#[derive(Debug, serde::Deserialize)]
pub struct Env {
    /// Override for the GitHub API root, e.g. a GitHub Enterprise
    /// instance. Defaults to api.github.com.
    pub github_base_url: Option<String>,
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().pretty());
    tracing::subscriber::set_global_default(subscriber)?;

    let env = envy::from_env::<Env>()?;

    rocket::build()
        .manage(env)
        .attach(entrypoints::stage())
        .launch()
        .await?;

    Ok(())
}
