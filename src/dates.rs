use chrono::{Local, NaiveDate};

/// Today's local calendar day as a zero-padded `YYYY-MM-DD` key.
///
/// The fixed width matters: history ordering compares these keys as plain
/// strings, which is only correct while every key is zero-padded.
pub fn local_date_key() -> String {
    date_key(Local::now().date_naive())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
