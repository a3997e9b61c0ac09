use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

pub fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field} {value:?}"))
}

/// `Ok(None)` when the field is absent, `Err` when present but malformed.
pub fn parse_optional_timestamp(
    value: Option<&str>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_timestamp(raw, field).map(Some),
        None => Ok(None),
    }
}

pub fn require_timestamp(value: Option<&str>, field: &str) -> Result<DateTime<Utc>> {
    parse_optional_timestamp(value, field)?.ok_or_else(|| anyhow!("{field} is missing"))
}

/// Milliseconds from `earlier` to `later`, floored at zero.
pub fn elapsed_ms(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_milliseconds().max(0)
}
