use macro_tracker::dates::local_date_key;
use macro_tracker::handlers::roll_over_if_needed;
use macro_tracker::models::DayState;
use macro_tracker::search::SearchConfig;
use macro_tracker::storage::{FileMedium, Store};
use macro_tracker::{AppState, router};
use std::{env, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_dir = resolve_data_dir();
    fs::create_dir_all(&data_dir).await?;

    let store = Store::new(Arc::new(FileMedium::new(&data_dir)));
    let today = local_date_key();
    let day = store
        .load_day(&today)
        .unwrap_or_else(|| DayState::new_default(&today));

    let search = SearchConfig::from_env();
    if search.is_none() {
        warn!("FATSECRET_CLIENT_ID/FATSECRET_CLIENT_SECRET not set; food search disabled");
    }

    let state = AppState::new(store, day, search);
    spawn_rollover_task(state.clone());

    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn resolve_data_dir() -> PathBuf {
    env::var("APP_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

/// Coarse once-a-minute poll for the local date changing; request handlers
/// also check, so a late tick only matters for an idle server.
fn spawn_rollover_task(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let mut day = state.day.lock().await;
            roll_over_if_needed(&state.store, &mut day);
        }
    });
}
