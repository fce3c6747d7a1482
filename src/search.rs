use crate::errors::AppError;
use crate::models::SearchFood;
use axum::http::StatusCode;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::{
    env,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::debug;

const TOKEN_URL: &str = "https://oauth.fatsecret.com/connect/token";
const SEARCH_URL: &str = "https://platform.fatsecret.com/rest/server.api";
/// Refresh the cached bearer token this long before it actually expires.
const TOKEN_EXPIRY_MARGIN: u64 = 60;

const DEFAULT_MAX_RESULTS: u32 = 12;

/// Credentials and limits for the upstream nutrition API. Constructed per
/// process from the environment; `None` when the secret pair is not set, in
/// which case every search request fails with a 500 (never a crash).
#[derive(Clone)]
pub struct SearchConfig {
    client_id: String,
    client_secret: String,
    pub max_results: u32,
}

impl SearchConfig {
    pub fn from_env() -> Option<Self> {
        let client_id = env::var("FATSECRET_CLIENT_ID").ok()?;
        let client_secret = env::var("FATSECRET_CLIENT_SECRET").ok()?;
        Some(Self {
            client_id,
            client_secret,
            max_results: max_results_from(env::var("FATSECRET_MAX_RESULTS").ok().as_deref()),
        })
    }
}

fn max_results_from(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .map(|v| v.clamp(1, 50))
        .unwrap_or(DEFAULT_MAX_RESULTS)
}

#[derive(Debug, Clone)]
pub struct CachedToken {
    token: String,
    expires_at: Instant,
}

pub type TokenCache = Arc<Mutex<Option<CachedToken>>>;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Client-credentials bearer token, cached until 60 seconds before expiry.
async fn access_token(
    client: &reqwest::Client,
    config: &SearchConfig,
    cache: &TokenCache,
) -> Result<String, AppError> {
    let mut cached = cache.lock().await;
    if let Some(token) = cached.as_ref() {
        if Instant::now() < token.expires_at {
            return Ok(token.token.clone());
        }
    }

    let response = client
        .post(TOKEN_URL)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[("grant_type", "client_credentials"), ("scope", "basic")])
        .send()
        .await
        .map_err(AppError::internal)?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(AppError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("token request failed ({status}): {text}"),
        ));
    }

    let token: TokenResponse = response.json().await.map_err(AppError::internal)?;
    debug!("fetched upstream token, expires in {}s", token.expires_in);

    let ttl = Duration::from_secs(token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN));
    *cached = Some(CachedToken {
        token: token.access_token.clone(),
        expires_at: Instant::now() + ttl,
    });
    Ok(token.access_token)
}

/// `foods.search` against the upstream API, normalized for the log-food
/// form. Upstream failures come back as a passthrough status and message.
pub async fn search_foods(
    client: &reqwest::Client,
    config: &SearchConfig,
    cache: &TokenCache,
    query: &str,
) -> Result<Vec<SearchFood>, AppError> {
    let token = access_token(client, config, cache).await?;

    let response = client
        .post(SEARCH_URL)
        .bearer_auth(token)
        .form(&[
            ("method", "foods.search"),
            ("search_expression", query),
            ("format", "json"),
            ("max_results", &config.max_results.to_string()),
            ("page_number", "0"),
        ])
        .send()
        .await
        .map_err(|err| AppError::new(StatusCode::BAD_GATEWAY, err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let message = if text.is_empty() {
            "food search failed".to_string()
        } else {
            text
        };
        return Err(AppError::new(status, message));
    }

    let data: Value = response
        .json()
        .await
        .map_err(|err| AppError::new(StatusCode::BAD_GATEWAY, err.to_string()))?;

    Ok(normalize_results(&data))
}

/// `foods.food` holds one object when there is a single hit, an array
/// otherwise. Hits without a name are dropped.
pub fn normalize_results(data: &Value) -> Vec<SearchFood> {
    let raw = &data["foods"]["food"];
    let foods: Vec<&Value> = match raw {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![raw],
        _ => Vec::new(),
    };
    foods.into_iter().filter_map(normalize_food).collect()
}

fn normalize_food(value: &Value) -> Option<SearchFood> {
    let id = match &value["food_id"] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let name = value["food_name"].as_str().unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    let brand = value["brand_name"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let parsed = parse_description(value["food_description"].as_str().unwrap_or_default());
    Some(SearchFood {
        id,
        name: name.to_string(),
        brand,
        serving: parsed.serving,
        protein: parsed.protein,
        carbs: parsed.carbs,
        fat: parsed.fat,
        calories: parsed.calories,
        base_weight_grams: parsed.base_weight_grams,
    })
}

#[derive(Debug, Default, PartialEq)]
pub struct ParsedDescription {
    pub calories: f64,
    pub fat: f64,
    pub carbs: f64,
    pub protein: f64,
    pub serving: Option<String>,
    pub base_weight_grams: Option<f64>,
}

static CALORIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Calories:\s*([\d.]+)\s*kcal").unwrap());
static FAT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Fat:\s*([\d.]+)\s*g").unwrap());
static CARBS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Carbs:\s*([\d.]+)\s*g").unwrap());
static PROTEIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Protein:\s*([\d.]+)\s*g").unwrap());
static WEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Per\s*([\d.]+)\s*(?:g|gram|grams)\b").unwrap());

/// The upstream's structured nutrient fields are unreliable, so macros come
/// out of the free-text description, e.g.
/// `Per 100g - Calories: 52kcal | Fat: 0.17g | Carbs: 13.81g | Protein: 0.26g`.
/// Unmatched fields default to zero.
pub fn parse_description(desc: &str) -> ParsedDescription {
    let grams = |re: &Regex| {
        re.captures(desc)
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    let serving = desc
        .split_once('-')
        .map(|(head, _)| head.trim().to_string())
        .filter(|s| !s.is_empty());
    let base_weight_grams = WEIGHT_RE
        .captures(desc)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|w| *w > 0.0);

    ParsedDescription {
        calories: grams(&CALORIES_RE),
        fat: grams(&FAT_RE),
        carbs: grams(&CARBS_RE),
        protein: grams(&PROTEIN_RE),
        serving,
        base_weight_grams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_per_gram_description() {
        let parsed = parse_description(
            "Per 100g - Calories: 52kcal | Fat: 0.17g | Carbs: 13.81g | Protein: 0.26g",
        );
        assert_eq!(parsed.calories, 52.0);
        assert_eq!(parsed.fat, 0.17);
        assert_eq!(parsed.carbs, 13.81);
        assert_eq!(parsed.protein, 0.26);
        assert_eq!(parsed.serving.as_deref(), Some("Per 100g"));
        assert_eq!(parsed.base_weight_grams, Some(100.0));
    }

    #[test]
    fn serving_without_gram_weight_has_no_base_weight() {
        let parsed = parse_description(
            "Per 1 cup - Calories: 130kcal | Fat: 4.00g | Carbs: 12.00g | Protein: 11.00g",
        );
        assert_eq!(parsed.serving.as_deref(), Some("Per 1 cup"));
        assert_eq!(parsed.base_weight_grams, None);
        assert_eq!(parsed.protein, 11.0);
    }

    #[test]
    fn unmatched_fields_default_to_zero() {
        let parsed = parse_description("just some text");
        assert_eq!(parsed.calories, 0.0);
        assert_eq!(parsed.fat, 0.0);
        assert_eq!(parsed.carbs, 0.0);
        assert_eq!(parsed.protein, 0.0);
        assert_eq!(parsed.serving, None);
        assert_eq!(parsed.base_weight_grams, None);
    }

    #[test]
    fn normalizes_array_and_single_object_results() {
        let many = json!({
            "foods": { "food": [
                {
                    "food_id": 12345,
                    "food_name": "Apple",
                    "food_description": "Per 100g - Calories: 52kcal | Fat: 0.17g | Carbs: 13.81g | Protein: 0.26g"
                },
                { "food_id": "67890", "food_name": "" }
            ] }
        });
        let foods = normalize_results(&many);
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].id, "12345");
        assert_eq!(foods[0].name, "Apple");
        assert_eq!(foods[0].base_weight_grams, Some(100.0));

        let single = json!({
            "foods": { "food": {
                "food_id": "1",
                "food_name": "Cheddar",
                "brand_name": "Acme",
                "food_description": "Per 28g - Calories: 113kcal | Fat: 9.28g | Carbs: 0.36g | Protein: 7.00g"
            } }
        });
        let foods = normalize_results(&single);
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].brand.as_deref(), Some("Acme"));
        assert_eq!(foods[0].fat, 9.28);
    }

    #[test]
    fn empty_or_missing_results_normalize_to_empty() {
        assert!(normalize_results(&json!({})).is_empty());
        assert!(normalize_results(&json!({ "foods": { "food": null } })).is_empty());
    }

    #[test]
    fn max_results_is_clamped() {
        assert_eq!(max_results_from(None), 12);
        assert_eq!(max_results_from(Some("20")), 20);
        assert_eq!(max_results_from(Some("0")), 1);
        assert_eq!(max_results_from(Some("999")), 50);
        assert_eq!(max_results_from(Some("garbage")), 12);
    }
}
