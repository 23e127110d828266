use crate::types::record::RecordKind;
use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("Resample interval must be positive, got {0}")]
    InvalidInterval(TimeDelta),

    #[error("Expected {expected} records, found a {found} record at {timestamp}")]
    UnexpectedKind {
        expected: RecordKind,
        found: RecordKind,
        timestamp: DateTime<Utc>,
    },

    #[error("Timestamps must be strictly increasing, {current} follows {previous}")]
    Unordered {
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}
