/**
 * Tripmate Sync Entry Point
 *
 * Opens the local store, loads the trip snapshot (or the local blob in
 * local-only mode), drains any queued offline writes and prints a summary
 * of the trips the caller can see.
 */

use std::sync::Arc;
use tripmate::client::api::HttpBackend;
use tripmate::client::auth;
use tripmate::client::config::Config;
use tripmate::client::local_db::{LocalStorage, SqliteStorage};
use tripmate::client::store::TripStore;
use tripmate::client::sync::NetworkMonitor;
use tripmate::client::TripBackend;

/// Bearer token for the backend, skips the login call
const ENV_TOKEN: &str = "TRIPMATE_TOKEN";
/// Signed-in user when `TRIPMATE_TOKEN` is given
const ENV_USER_ID: &str = "TRIPMATE_USER_ID";
const ENV_EMAIL: &str = "TRIPMATE_EMAIL";
const ENV_PASSWORD: &str = "TRIPMATE_PASSWORD";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid configuration: {}", e);
            Config::default()
        }
    };

    let storage: Arc<dyn LocalStorage> = match config.db_path() {
        Some(path) => Arc::new(SqliteStorage::open(path).await?),
        None => Arc::new(SqliteStorage::open_default().await?),
    };

    if !config.is_api_backed() {
        tracing::info!("Running in local-only mode");
        let store = TripStore::local_only(storage).await?;
        print_summary(&store);
        return Ok(());
    }

    // A preset token skips the login call, and with it the user id
    let (token, user_id) = match std::env::var(ENV_TOKEN) {
        Ok(token) => (token, std::env::var(ENV_USER_ID).ok()),
        Err(_) => {
            let email = std::env::var(ENV_EMAIL)?;
            let password = std::env::var(ENV_PASSWORD)?;
            let response = auth::login(&config, email, password).await?;
            tracing::info!(user_id = %response.user.id, "Signed in");
            (response.token, Some(response.user.id))
        }
    };
    config.set_token(Some(token));

    let backend = Arc::new(HttpBackend::new(&config));
    let store = TripStore::with_backend(backend, storage, NetworkMonitor::default()).await?;
    store.set_current_user(user_id);
    store.load().await?;
    store.settle().await;

    let pending = store.pending_operations().await;
    if !pending.is_empty() {
        tracing::warn!("{} offline operations still queued", pending.len());
    }
    print_summary(&store);
    Ok(())
}

fn print_summary<B: TripBackend>(store: &TripStore<B>) {
    let trips = store.trips();
    if trips.is_empty() {
        println!("No trips yet.");
        return;
    }

    for trip in trips {
        let role = trip
            .role
            .map(|role| format!("{:?}", role).to_lowercase())
            .unwrap_or_else(|| "local".to_string());
        println!(
            "{} [{}] {} to {} ({} days)",
            trip.name,
            role,
            trip.start_date,
            trip.end_date,
            trip.day_count()
        );
        for day in trip.days() {
            let activities = store.activities_for_day(&trip.id, day.day_index);
            let stay = store
                .accommodation_for_day(&trip.id, day.day_index)
                .map(|stay| format!(", staying at {}", stay.name))
                .unwrap_or_default();
            println!("  {}: {} activities{}", day.date, activities.len(), stay);
        }
        let spent = store.expense_total(&trip.id);
        if spent > 0.0 {
            match trip.budget {
                Some(budget) => println!("  spent {:.2} of {:.2}", spent, budget),
                None => println!("  spent {:.2}", spent),
            }
        }
    }
}
