use crate::models::DayState;
use crate::search::{SearchConfig, TokenCache};
use crate::storage::Store;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    /// The mutable current day; replaced when the calendar day rolls over.
    pub day: Arc<Mutex<DayState>>,
    pub http: reqwest::Client,
    pub search: Option<SearchConfig>,
    pub token_cache: TokenCache,
}

impl AppState {
    pub fn new(store: Store, day: DayState, search: Option<SearchConfig>) -> Self {
        Self {
            store,
            day: Arc::new(Mutex::new(day)),
            http: reqwest::Client::new(),
            search,
            token_cache: TokenCache::default(),
        }
    }
}
