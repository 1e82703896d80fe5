use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{DataFrame, Float64Chunked, PolarsError, TimeUnit};

/// Converts a raw Datetime column value to a `NaiveDateTime`, honoring the
/// column's time unit.
pub(crate) fn naive_datetime_from_timestamp(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    }
    .map(|dt| dt.naive_utc())
}

/// Converts a raw Date column value (days since 1970-01-01) to a `NaiveDate`.
pub(crate) fn date_from_days(days: i32) -> Option<NaiveDate> {
    // NaiveDate counts from 0001-01-01, polars from the Unix epoch.
    NaiveDate::from_num_days_from_ce_opt(days + 719_163)
}

pub(crate) fn f64_column<'a>(
    frame: &'a DataFrame,
    name: &str,
) -> Result<&'a Float64Chunked, PolarsError> {
    frame.column(name)?.f64()
}
