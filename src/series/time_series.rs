use crate::error::MeteoError;
use crate::frame::weather_frame::WeatherFrame;
use crate::series::error::SeriesError;
use crate::types::record::{RecordKind, WeatherRecord};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;

/// An ordered run of weather records with unique, strictly increasing timestamps.
///
/// Obtained from [`crate::merge`], [`crate::resample`] or [`TimeSeries::new`].
/// Convert it to a Polars-backed [`WeatherFrame`] with [`TimeSeries::to_frame`]
/// for tabular analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    records: Vec<WeatherRecord>,
}

impl TimeSeries {
    /// Wraps `records`, which must already be strictly increasing by timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Unordered`] at the first timestamp that does not
    /// come after its predecessor.
    pub fn new(records: Vec<WeatherRecord>) -> Result<Self, SeriesError> {
        if let Some(pair) = records
            .windows(2)
            .find(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(SeriesError::Unordered {
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }
        Ok(Self { records })
    }

    pub(crate) fn from_ordered(records: Vec<WeatherRecord>) -> Self {
        debug_assert!(records
            .windows(2)
            .all(|pair| pair[0].timestamp < pair[1].timestamp));
        Self { records }
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<WeatherRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The observation station this series describes, falling back to the
    /// forecast place when the series has no observations.
    pub fn station(&self) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.kind == RecordKind::Observation)
            .or_else(|| self.records.first())
            .map(|r| r.station.as_str())
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.records.first().map(|r| r.timestamp)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.records.last().map(|r| r.timestamp)
    }

    /// Every measurement name present in at least one record, sorted.
    pub fn measurement_names(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|r| r.measurements.keys().map(String::as_str))
            .collect()
    }

    /// `(timestamp, value)` pairs of one measurement, skipping records without it.
    pub fn values(&self, name: &str) -> Vec<(DateTime<Utc>, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.get(name).map(|value| (r.timestamp, value)))
            .collect()
    }

    /// Builds the tabular view of this series, with local times expressed in `time_zone`.
    pub fn to_frame(&self, time_zone: Tz) -> Result<WeatherFrame, MeteoError> {
        WeatherFrame::from_series(self, time_zone)
    }
}
