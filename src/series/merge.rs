use crate::series::error::SeriesError;
use crate::series::time_series::TimeSeries;
use crate::types::record::{RecordKind, WeatherRecord};
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::BTreeMap;

/// Combines observations and forecast records into a single ordered [`TimeSeries`].
///
/// Observed data overrides predictions: any forecast record at or before the
/// last observation timestamp is discarded, which includes every timestamp the
/// two inputs share. When one input repeats a timestamp, the record that comes
/// last in that input is kept.
///
/// # Errors
///
/// Returns [`SeriesError::UnexpectedKind`] if `observations` contains a forecast
/// record or `forecast` contains an observation.
///
/// # Examples
///
/// ```
/// use meteo_lt::{merge, RecordKind, WeatherRecord};
/// use chrono::{TimeZone, Utc};
///
/// let at = |h| Utc.with_ymd_and_hms(2024, 5, 1, h, 0, 0).unwrap();
/// let observed = vec![WeatherRecord::new(at(10), "vilniaus-ams", RecordKind::Observation, at(12))
///     .with_measurement("airTemperature", 5.0)];
/// let forecast = vec![
///     WeatherRecord::new(at(10), "vilnius", RecordKind::Forecast, at(12))
///         .with_measurement("airTemperature", 9.0),
///     WeatherRecord::new(at(11), "vilnius", RecordKind::Forecast, at(12))
///         .with_measurement("airTemperature", 6.0),
/// ];
///
/// let series = merge(observed, forecast).unwrap();
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.records()[0].get("airTemperature"), Some(5.0));
/// ```
pub fn merge(
    observations: Vec<WeatherRecord>,
    forecast: Vec<WeatherRecord>,
) -> Result<TimeSeries, SeriesError> {
    ensure_kind(&observations, RecordKind::Observation)?;
    ensure_kind(&forecast, RecordKind::Forecast)?;

    let last_observed = observations.iter().map(|r| r.timestamp).max();
    let mut by_time: BTreeMap<DateTime<Utc>, WeatherRecord> = BTreeMap::new();

    let mut superseded = 0usize;
    for record in forecast {
        if last_observed.is_some_and(|last| record.timestamp <= last) {
            superseded += 1;
            continue;
        }
        by_time.insert(record.timestamp, record);
    }
    for record in observations {
        by_time.insert(record.timestamp, record);
    }

    debug!(
        "Merged {} records, {} forecast records superseded by observations",
        by_time.len(),
        superseded
    );
    Ok(TimeSeries::from_ordered(by_time.into_values().collect()))
}

fn ensure_kind(records: &[WeatherRecord], expected: RecordKind) -> Result<(), SeriesError> {
    match records.iter().find(|r| r.kind != expected) {
        Some(record) => Err(SeriesError::UnexpectedKind {
            expected,
            found: record.kind,
            timestamp: record.timestamp,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::measurement::AIR_TEMPERATURE;
    use chrono::{TimeDelta, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn observed(hour: u32, temp: f64) -> WeatherRecord {
        WeatherRecord::new(at(hour), "vilniaus-ams", RecordKind::Observation, at(20))
            .with_measurement(AIR_TEMPERATURE, temp)
    }

    fn predicted(hour: u32, temp: f64) -> WeatherRecord {
        WeatherRecord::new(at(hour), "vilnius", RecordKind::Forecast, at(20))
            .with_measurement(AIR_TEMPERATURE, temp)
    }

    #[test]
    fn test_merge_orders_and_deduplicates() -> Result<(), SeriesError> {
        let series = merge(
            vec![observed(12, 8.0), observed(10, 6.0), observed(11, 7.0)],
            vec![predicted(14, 10.0), predicted(12, 99.0), predicted(13, 9.0)],
        )?;

        let times: Vec<_> = series.records().iter().map(|r| r.timestamp).collect();
        assert_eq!(times, vec![at(10), at(11), at(12), at(13), at(14)]);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        Ok(())
    }

    #[test]
    fn test_overlap_keeps_observation() -> Result<(), SeriesError> {
        let series = merge(vec![observed(12, 8.0)], vec![predicted(12, 99.0)])?;

        assert_eq!(series.len(), 1);
        let record = &series.records()[0];
        assert_eq!(record.kind, RecordKind::Observation);
        assert_eq!(record.get(AIR_TEMPERATURE), Some(8.0));
        Ok(())
    }

    #[test]
    fn test_forecast_inside_observed_window_is_dropped() -> Result<(), SeriesError> {
        let half_past = predicted(10, 50.0);
        let half_past = WeatherRecord {
            timestamp: half_past.timestamp + TimeDelta::minutes(30),
            ..half_past
        };
        let series = merge(vec![observed(10, 6.0), observed(11, 7.0)], vec![half_past])?;

        assert_eq!(series.len(), 2);
        assert!(series
            .records()
            .iter()
            .all(|r| r.kind == RecordKind::Observation));
        Ok(())
    }

    #[test]
    fn test_merge_without_observations() -> Result<(), SeriesError> {
        let series = merge(vec![], vec![predicted(13, 9.0), predicted(12, 8.0)])?;
        assert_eq!(series.start(), Some(at(12)));
        assert_eq!(series.end(), Some(at(13)));

        assert!(merge(vec![], vec![])?.is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicate_within_input_keeps_last() -> Result<(), SeriesError> {
        let series = merge(vec![observed(10, 1.0), observed(10, 2.0)], vec![])?;
        assert_eq!(series.len(), 1);
        assert_eq!(series.records()[0].get(AIR_TEMPERATURE), Some(2.0));
        Ok(())
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let err = merge(vec![predicted(10, 1.0)], vec![]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::UnexpectedKind {
                expected: RecordKind::Observation,
                found: RecordKind::Forecast,
                ..
            }
        ));

        assert!(merge(vec![], vec![observed(10, 1.0)]).is_err());
    }
}
