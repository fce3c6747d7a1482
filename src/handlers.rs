use crate::dates::local_date_key;
use crate::errors::AppError;
use crate::history::list_summaries;
use crate::models::{
    DayResponse, DaySummary, DayState, FoodEntry, GoalsRequest, LogEntryRequest, SearchFood,
};
use crate::numbers::sanitize_macro;
use crate::search::search_foods;
use crate::state::AppState;
use crate::storage::Store;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// Swap in the stored (or a fresh default) day when the calendar day has
/// rolled over since this state was loaded.
pub fn roll_over_if_needed(store: &Store, day: &mut DayState) {
    let key = local_date_key();
    if day.date_key != key {
        info!("date rolled over to {key}");
        *day = store
            .load_day(&key)
            .unwrap_or_else(|| DayState::new_default(&key));
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut day = state.day.lock().await;
    roll_over_if_needed(&state.store, &mut day);
    Html(render_index(&day.date_key))
}

pub async fn get_day(State(state): State<AppState>) -> Json<DayResponse> {
    let mut day = state.day.lock().await;
    roll_over_if_needed(&state.store, &mut day);
    Json(DayResponse::from_state(&day))
}

pub async fn put_goals(
    State(state): State<AppState>,
    Json(payload): Json<GoalsRequest>,
) -> Json<DayResponse> {
    let mut day = state.day.lock().await;
    roll_over_if_needed(&state.store, &mut day);

    // each field applies independently; invalid values keep the old goal
    let apply = |current: &mut f64, next: Option<f64>| {
        if let Some(v) = next {
            if v.is_finite() && v >= 0.0 {
                *current = v;
            }
        }
    };
    apply(&mut day.goals.calories, payload.calories);
    apply(&mut day.goals.protein, payload.protein);
    apply(&mut day.goals.carbs, payload.carbs);
    apply(&mut day.goals.fat, payload.fat);

    state.store.save_day(&day);
    Json(DayResponse::from_state(&day))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Json(payload): Json<LogEntryRequest>,
) -> Result<Json<DayResponse>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }

    let mut day = state.day.lock().await;
    roll_over_if_needed(&state.store, &mut day);
    day.entries.push(FoodEntry {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        protein: sanitize_macro(payload.protein),
        carbs: sanitize_macro(payload.carbs),
        fat: sanitize_macro(payload.fat),
        created_at: Utc::now().timestamp_millis(),
    });

    state.store.save_day(&day);
    Ok(Json(DayResponse::from_state(&day)))
}

pub async fn remove_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DayResponse> {
    let mut day = state.day.lock().await;
    roll_over_if_needed(&state.store, &mut day);
    // removing an unknown id is a no-op
    day.entries.retain(|e| e.id != id);

    state.store.save_day(&day);
    Json(DayResponse::from_state(&day))
}

pub async fn reset_day(State(state): State<AppState>) -> Json<DayResponse> {
    let mut day = state.day.lock().await;
    *day = DayState::new_default(local_date_key());
    state.store.save_day(&day);
    Json(DayResponse::from_state(&day))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(rename = "includeToday")]
    pub include_today: Option<bool>,
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<DaySummary>> {
    let days = state.store.all_days();
    let include_today = params.include_today.unwrap_or(false);
    Json(list_summaries(&days, include_today, &local_date_key()))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    /// Alias for `query`.
    pub q: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let raw = params.query.or(params.q).unwrap_or_default();
    let query = raw.trim();
    if query.chars().count() < 2 {
        return Ok(Json(Vec::<SearchFood>::new()).into_response());
    }

    let config = state.search.as_ref().ok_or_else(|| {
        AppError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Missing FATSECRET_CLIENT_ID or FATSECRET_CLIENT_SECRET",
        )
    })?;

    let foods = search_foods(&state.http, config, &state.token_cache, query).await?;
    let mut response = Json(foods).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}
