use crate::api::error::RequestError;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Layout of the `*TimeUtc` fields in Meteo.lt responses.
const API_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses an API timestamp as UTC. RFC 3339 strings are accepted as well.
pub(crate) fn parse_utc_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, RequestError> {
    match NaiveDateTime::parse_from_str(value, API_TIME_FORMAT) {
        Ok(naive) => Ok(naive.and_utc()),
        Err(source) => DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| RequestError::InvalidTimestamp {
                field: field.to_string(),
                value: value.to_string(),
                source,
            }),
    }
}

/// Largest multiple of `step_ms` that is `<= ms`.
pub(crate) fn floor_to_step(ms: i64, step_ms: i64) -> i64 {
    ms.div_euclid(step_ms) * step_ms
}

/// Smallest multiple of `step_ms` that is `>= ms`.
pub(crate) fn ceil_to_step(ms: i64, step_ms: i64) -> i64 {
    let floor = floor_to_step(ms, step_ms);
    if floor == ms {
        floor
    } else {
        floor + step_ms
    }
}
