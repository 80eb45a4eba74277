use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// hh.ru publishes offsets without a colon (`+0300`), which RFC 3339 rejects.
const HH_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

pub fn from_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .map_err(|e| Error::InvalidRecord(format!("invalid timestamp {:?}: {}", s, e)))?
        .with_timezone(&Utc))
}

pub fn parse_published_at(s: &str) -> Result<DateTime<Utc>> {
    let trimmed = s.trim();
    match DateTime::parse_from_str(trimmed, HH_TIMESTAMP_FORMAT) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => from_rfc3339(trimmed),
    }
}
