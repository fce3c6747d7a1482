use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Goals {
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    id: String,
    name: String,
    protein: f64,
    carbs: f64,
    fat: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Totals {
    protein: f64,
    carbs: f64,
    fat: f64,
    calories: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayResponse {
    date_key: String,
    goals: Goals,
    entries: Vec<Entry>,
    totals: Totals,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    date_key: String,
    calories: f64,
    entry_count: usize,
}

struct TestServer {
    base_url: String,
    data_dir: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("macro_tracker_http_{}_{}", std::process::id(), nanos));
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/day")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_dir = unique_data_dir();
    let child = Command::new(env!("CARGO_BIN_EXE_macro_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", &data_dir)
        .env("RUST_LOG", "info")
        .env_remove("FATSECRET_CLIENT_ID")
        .env_remove("FATSECRET_CLIENT_SECRET")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_dir,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn reset_day(client: &Client, base_url: &str) -> DayResponse {
    client
        .post(format!("{base_url}/api/day/reset"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_fresh_day_has_default_goals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let day = reset_day(&client, &server.base_url).await;
    assert_eq!(day.goals.calories, 2000.0);
    assert_eq!(day.goals.protein, 150.0);
    assert_eq!(day.goals.carbs, 250.0);
    assert_eq!(day.goals.fat, 70.0);
    assert!(day.entries.is_empty());
    assert_eq!(day.date_key.len(), 10);
}

#[tokio::test]
async fn http_logging_food_updates_totals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_day(&client, &server.base_url).await;

    let day: DayResponse = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({ "name": "Oats", "protein": 10, "carbs": 20, "fat": 5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(day.entries.len(), 1);
    assert_eq!(day.entries[0].name, "Oats");
    assert_eq!(day.totals.protein, 10.0);
    assert_eq!(day.totals.carbs, 20.0);
    assert_eq!(day.totals.fat, 5.0);
    assert_eq!(day.totals.calories, 165.0);
}

#[tokio::test]
async fn http_blank_entry_name_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({ "name": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn http_negative_macros_are_clamped_to_zero() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_day(&client, &server.base_url).await;

    let day: DayResponse = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({ "name": "Weird", "protein": -4, "carbs": 8 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(day.entries[0].protein, 0.0);
    assert_eq!(day.entries[0].carbs, 8.0);
    assert_eq!(day.entries[0].fat, 0.0);
}

#[tokio::test]
async fn http_goal_patch_applies_valid_fields_only() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_day(&client, &server.base_url).await;

    let day: DayResponse = client
        .put(format!("{}/api/goals", server.base_url))
        .json(&serde_json::json!({ "protein": 160, "fat": -10 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(day.goals.protein, 160.0);
    assert_eq!(day.goals.fat, 70.0);
    assert_eq!(day.goals.calories, 2000.0);
}

#[tokio::test]
async fn http_removing_entry_restores_totals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_day(&client, &server.base_url).await;

    let day: DayResponse = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({ "name": "Eggs", "protein": 12, "carbs": 1, "fat": 10 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = day.entries[0].id.clone();

    let day: DayResponse = client
        .delete(format!("{}/api/entries/{id}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(day.entries.is_empty());
    assert_eq!(day.totals.calories, 0.0);
}

#[tokio::test]
async fn http_history_excludes_today_by_default() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let today = reset_day(&client, &server.base_url).await;

    client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({ "name": "Rice", "protein": 3, "carbs": 40, "fat": 1 }))
        .send()
        .await
        .unwrap();

    let without: Vec<Summary> = client
        .get(format!("{}/api/history", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(without.iter().all(|s| s.date_key != today.date_key));

    let with: Vec<Summary> = client
        .get(format!("{}/api/history?includeToday=true", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entry = with
        .iter()
        .find(|s| s.date_key == today.date_key)
        .expect("today missing from history");
    assert_eq!(entry.entry_count, 1);
    assert_eq!(entry.calories, 3.0 * 4.0 + 40.0 * 4.0 + 1.0 * 9.0);
}

#[tokio::test]
async fn http_mutations_land_in_versioned_store_file() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let today = reset_day(&client, &server.base_url).await;

    client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({ "name": "Yogurt", "protein": 10, "carbs": 5, "fat": 2 }))
        .send()
        .await
        .unwrap();

    let raw = std::fs::read_to_string(server.data_dir.join("macroTracker.v2.json"))
        .expect("store file missing");
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["version"], serde_json::json!(2));
    let day = &parsed["days"][&today.date_key];
    assert_eq!(day["dateKey"], serde_json::json!(today.date_key.clone()));
    assert_eq!(day["entries"][0]["name"], serde_json::json!("Yogurt"));
}

#[tokio::test]
async fn http_short_search_query_returns_empty_list() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for url in [
        format!("{}/api/search?query=a", server.base_url),
        format!("{}/api/search?q=%20%20", server.base_url),
        format!("{}/api/search", server.base_url),
    ] {
        let response = client.get(url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, serde_json::json!([]));
    }
}

#[tokio::test]
async fn http_search_without_credentials_is_500_with_error_body() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/search?query=chicken", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("FATSECRET"));
}

#[tokio::test]
async fn http_search_rejects_non_get_methods() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/search?query=chicken", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
