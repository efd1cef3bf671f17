//! Parsing of movement and period timestamps.

use chrono::{DateTime, NaiveDateTime, Utc};

use storehouse_core::{DomainError, DomainResult};

/// Wire format of timestamps accepted from collaborators, interpreted as UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_timestamp(value: &str) -> DomainResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            DomainError::validation(format!(
                "timestamp '{value}' does not match {TIMESTAMP_FORMAT}: {e}"
            ))
        })
}
