use serde::{Deserialize, Serialize};

/// kcal for a macro split: 4 per gram of protein and carbs, 9 per gram of fat.
pub fn calories(protein: f64, carbs: f64, fat: f64) -> f64 {
    protein * 4.0 + carbs * 4.0 + fat * 9.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Default for MacroGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 250.0,
            fat: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: String,
    pub name: String,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Milliseconds since the unix epoch.
    pub created_at: i64,
}

impl FoodEntry {
    pub fn calories(&self) -> f64 {
        calories(self.protein, self.carbs, self.fat)
    }
}

/// Goals plus logged entries for one calendar day. `date_key` is immutable
/// once the state exists; entries keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayState {
    pub date_key: String,
    pub goals: MacroGoals,
    pub entries: Vec<FoodEntry>,
}

impl DayState {
    pub fn new_default(date_key: impl Into<String>) -> Self {
        Self {
            date_key: date_key.into(),
            goals: MacroGoals::default(),
            entries: Vec::new(),
        }
    }

    pub fn totals(&self) -> MacroTotals {
        let protein: f64 = self.entries.iter().map(|e| e.protein).sum();
        let carbs: f64 = self.entries.iter().map(|e| e.carbs).sum();
        let fat: f64 = self.entries.iter().map(|e| e.fat).sum();
        MacroTotals {
            protein,
            carbs,
            fat,
            calories: calories(protein, carbs, fat),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroTotals {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date_key: String,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
    pub entry_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayResponse {
    pub date_key: String,
    pub goals: MacroGoals,
    /// Newest first.
    pub entries: Vec<FoodEntry>,
    pub totals: MacroTotals,
}

impl DayResponse {
    pub fn from_state(state: &DayState) -> Self {
        let mut entries = state.entries.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            date_key: state.date_key.clone(),
            goals: state.goals.clone(),
            totals: state.totals(),
            entries,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogEntryRequest {
    pub name: String,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

/// Partial goals update; fields that are missing, non-finite or negative
/// leave the current value untouched.
#[derive(Debug, Deserialize)]
pub struct GoalsRequest {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

/// One normalized search hit, shaped for the log-food form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFood {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving: Option<String>,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_weight_grams: Option<f64>,
}
