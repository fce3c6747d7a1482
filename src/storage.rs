use crate::models::{DayState, FoodEntry, MacroGoals};
use crate::numbers::safe_number;
use serde_json::{Value, json};
use std::{collections::BTreeMap, io, path::PathBuf, sync::Arc};
use tracing::{error, warn};

/// Key for the versioned multi-day envelope: `{version: 2, days: {...}}`.
pub const STORE_KEY: &str = "macroTracker.v2";
/// Key for the pre-versioning format: a single bare day record.
pub const LEGACY_KEY: &str = "macroTracker.v1";

const STORE_VERSION: i64 = 2;

/// Flat key/value persistence contract. Production uses one JSON file per
/// key under a data directory; tests substitute an in-memory map.
pub trait StorageMedium: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageMedium for FileMedium {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                error!("failed to read {key}: {err}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::write(self.path_for(key), value)
    }
}

/// Accept goals only when all four fields coerce to finite numbers >= 0;
/// a single bad field rejects the whole object (caller falls back to the
/// defaults), unlike entries which are filtered one by one.
pub fn coerce_goals(value: &Value) -> Option<MacroGoals> {
    let obj = value.as_object()?;
    let field = |name: &str| safe_number(obj.get(name).unwrap_or(&Value::Null), f64::NAN);
    let calories = field("calories");
    let protein = field("protein");
    let carbs = field("carbs");
    let fat = field("fat");

    let all_valid = [calories, protein, carbs, fat]
        .iter()
        .all(|n| n.is_finite() && *n >= 0.0);
    if !all_valid {
        return None;
    }
    Some(MacroGoals {
        calories,
        protein,
        carbs,
        fat,
    })
}

pub fn coerce_entry(value: &Value) -> Option<FoodEntry> {
    let obj = value.as_object()?;
    let id = obj.get("id")?.as_str().filter(|s| !s.is_empty())?;
    let name = obj.get("name")?.as_str().filter(|s| !s.is_empty())?;

    let field = |name: &str| safe_number(obj.get(name).unwrap_or(&Value::Null), f64::NAN);
    let created_at = field("createdAt");
    let protein = field("protein");
    let carbs = field("carbs");
    let fat = field("fat");

    let all_valid = [created_at, protein, carbs, fat]
        .iter()
        .all(|n| n.is_finite() && *n >= 0.0);
    if !all_valid {
        return None;
    }
    Some(FoodEntry {
        id: id.to_string(),
        name: name.to_string(),
        protein,
        carbs,
        fat,
        created_at: created_at as i64,
    })
}

/// Coerce one stored day. Goals degrade to defaults when invalid; entries
/// are filtered individually; a missing or mismatching date key rejects the
/// whole record.
pub fn coerce_day_state(value: &Value, expected_date_key: Option<&str>) -> Option<DayState> {
    let obj = value.as_object()?;
    let date_key = obj.get("dateKey")?.as_str().filter(|s| !s.is_empty())?;
    if let Some(expected) = expected_date_key {
        if date_key != expected {
            return None;
        }
    }

    let goals = obj
        .get("goals")
        .and_then(coerce_goals)
        .unwrap_or_default();
    let entries = obj
        .get("entries")
        .and_then(Value::as_array)
        .map(|raw| raw.iter().filter_map(coerce_entry).collect())
        .unwrap_or_default();

    Some(DayState {
        date_key: date_key.to_string(),
        goals,
        entries,
    })
}

/// Versioned day store over a [`StorageMedium`].
///
/// Anything malformed on the way in degrades to "absent"; write failures
/// degrade to a logged no-op. Callers never see a storage error.
#[derive(Clone)]
pub struct Store {
    medium: Arc<dyn StorageMedium>,
}

impl Store {
    pub fn new(medium: Arc<dyn StorageMedium>) -> Self {
        Self { medium }
    }

    /// Current-version lookup, falling back to a one-time adoption of the
    /// legacy single-day record when its own date key matches `date_key`.
    /// Legacy records for any other day are never surfaced.
    pub fn load_day(&self, date_key: &str) -> Option<DayState> {
        let days = self.load_envelope();
        if let Some(day) = days.as_ref().and_then(|d| d.get(date_key)) {
            return Some(day.clone());
        }

        let legacy = self.load_legacy(date_key)?;
        let mut days = days.unwrap_or_default();
        days.insert(legacy.date_key.clone(), legacy.clone());
        self.save_envelope(&days);
        Some(legacy)
    }

    /// Whole-envelope read-modify-write; medium failures are swallowed so
    /// the in-memory session continues even when the write did not land.
    pub fn save_day(&self, state: &DayState) {
        let mut days = self.load_envelope().unwrap_or_default();
        days.insert(state.date_key.clone(), state.clone());
        self.save_envelope(&days);
    }

    pub fn all_days(&self) -> BTreeMap<String, DayState> {
        self.load_envelope().unwrap_or_default()
    }

    fn load_envelope(&self) -> Option<BTreeMap<String, DayState>> {
        let raw = self.medium.get(STORE_KEY)?;
        let parsed: Value = serde_json::from_str(&raw).ok()?;
        let obj = parsed.as_object()?;
        if obj.get("version").and_then(Value::as_i64) != Some(STORE_VERSION) {
            return None;
        }
        let raw_days = obj.get("days")?.as_object()?;

        let mut days = BTreeMap::new();
        for (key, value) in raw_days {
            if let Some(day) = coerce_day_state(value, Some(key)) {
                days.insert(key.clone(), day);
            }
        }
        Some(days)
    }

    fn save_envelope(&self, days: &BTreeMap<String, DayState>) {
        let envelope = json!({ "version": STORE_VERSION, "days": days });
        let payload = envelope.to_string();
        if let Err(err) = self.medium.set(STORE_KEY, &payload) {
            warn!("failed to persist day store: {err}");
        }
    }

    fn load_legacy(&self, expected_date_key: &str) -> Option<DayState> {
        let raw = self.medium.get(LEGACY_KEY)?;
        let parsed: Value = serde_json::from_str(&raw).ok()?;
        coerce_day_state(&parsed, Some(expected_date_key))
    }
}
