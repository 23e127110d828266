use crate::series::error::SeriesError;
use crate::series::time_series::TimeSeries;
use crate::types::record::WeatherRecord;
use crate::utils::{ceil_to_step, floor_to_step};
use chrono::TimeDelta;
use log::debug;
use std::collections::BTreeMap;

/// The grid spacing used when no interval is given: five minutes.
pub fn default_interval() -> TimeDelta {
    TimeDelta::minutes(5)
}

/// Re-expresses `series` on a regular grid of `interval`-spaced timestamps.
///
/// Grid points are the multiples of `interval` since the Unix epoch that fall
/// inside the series' range, so a five minute grid lands on :00, :05, :10 and
/// so on. Every grid point produces exactly one row.
///
/// Each measurement is linearly interpolated in time between the closest
/// records that carry it. Nothing is extrapolated: no rows are produced outside
/// the series' range, and a measurement is left out of a row when it has no
/// value on one side of that row. Station, kind, fetch time and condition are
/// taken from the last source record at or before the grid point. Rows that do
/// not coincide with a source record are marked `interpolated`.
///
/// # Errors
///
/// Returns [`SeriesError::InvalidInterval`] if `interval` is not positive.
///
/// # Examples
///
/// ```
/// use meteo_lt::{default_interval, resample, RecordKind, TimeSeries, WeatherRecord};
/// use chrono::{TimeZone, Utc};
///
/// let at = |m| Utc.with_ymd_and_hms(2024, 5, 1, 10, m, 0).unwrap();
/// let series = TimeSeries::new(vec![
///     WeatherRecord::new(at(0), "vilniaus-ams", RecordKind::Observation, at(30))
///         .with_measurement("airTemperature", 5.0),
///     WeatherRecord::new(at(10), "vilniaus-ams", RecordKind::Observation, at(30))
///         .with_measurement("airTemperature", 7.0),
/// ]).unwrap();
///
/// let resampled = resample(&series, default_interval()).unwrap();
/// assert_eq!(resampled.len(), 3);
/// assert_eq!(resampled.records()[1].get("airTemperature"), Some(6.0));
/// ```
pub fn resample(series: &TimeSeries, interval: TimeDelta) -> Result<TimeSeries, SeriesError> {
    let step_ms = interval.num_milliseconds();
    if step_ms <= 0 {
        return Err(SeriesError::InvalidInterval(interval));
    }

    let records = series.records();
    let Some(first) = records.first() else {
        return Ok(TimeSeries::default());
    };
    let times: Vec<i64> = records
        .iter()
        .map(|r| r.timestamp.timestamp_millis())
        .collect();
    let first_ms = times[0];
    let start = ceil_to_step(first_ms, step_ms);
    let end = floor_to_step(times[times.len() - 1], step_ms);
    if start > end {
        return Ok(TimeSeries::default());
    }

    let tracks: Vec<(&str, Vec<(i64, f64)>)> = series
        .measurement_names()
        .into_iter()
        .map(|name| {
            let points = records
                .iter()
                .zip(&times)
                .filter_map(|(r, &t)| r.get(name).map(|value| (t, value)))
                .collect();
            (name, points)
        })
        .collect();

    let rows = ((end - start) / step_ms + 1) as usize;
    let mut resampled = Vec::with_capacity(rows);
    let mut grid = start;
    while grid <= end {
        // grid >= first_ms, so at least one record sits at or before it
        let idx = times.partition_point(|&t| t <= grid).saturating_sub(1);
        let source = &records[idx];

        let mut measurements = BTreeMap::new();
        for (name, points) in &tracks {
            if let Some(value) = interpolate(points, grid) {
                measurements.insert((*name).to_string(), value);
            }
        }

        resampled.push(WeatherRecord {
            timestamp: first.timestamp + TimeDelta::milliseconds(grid - first_ms),
            station: source.station.clone(),
            station_name: source.station_name.clone(),
            coordinates: source.coordinates,
            kind: source.kind,
            fetched_at: source.fetched_at,
            measurements,
            condition: source.condition.clone(),
            interpolated: times[idx] != grid,
        });
        grid += step_ms;
    }

    debug!(
        "Resampled {} records onto {} grid points of {} ms",
        records.len(),
        resampled.len(),
        step_ms
    );
    Ok(TimeSeries::from_ordered(resampled))
}

/// Linear interpolation over `points` sorted by time. `None` outside their span.
fn interpolate(points: &[(i64, f64)], at: i64) -> Option<f64> {
    let idx = points.partition_point(|&(t, _)| t < at);
    match points.get(idx) {
        Some(&(t, value)) if t == at => Some(value),
        Some(&(t1, v1)) if idx > 0 => {
            let (t0, v0) = points[idx - 1];
            let fraction = (at - t0) as f64 / (t1 - t0) as f64;
            Some(v0 + (v1 - v0) * fraction)
        }
        _ => None,
    }
}
