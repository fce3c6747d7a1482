use crate::models::{DayState, DaySummary};
use std::collections::BTreeMap;

/// One summary per stored day, newest first.
///
/// Ordering is descending string comparison on the date key, which is
/// correct only while keys stay zero-padded `YYYY-MM-DD`.
pub fn list_summaries(
    days: &BTreeMap<String, DayState>,
    include_today: bool,
    today_key: &str,
) -> Vec<DaySummary> {
    days.iter()
        .rev()
        .filter(|(key, _)| include_today || key.as_str() != today_key)
        .map(|(key, day)| {
            let totals = day.totals();
            DaySummary {
                date_key: key.clone(),
                protein: totals.protein,
                carbs: totals.carbs,
                fat: totals.fat,
                calories: totals.calories,
                entry_count: day.entries.len(),
            }
        })
        .collect()
}
