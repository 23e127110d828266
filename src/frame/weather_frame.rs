//! Contains the `WeatherFrame` structure: a Polars view of a [`TimeSeries`] plus the
//! summary statistics computed over it (annual averages, day/night split and rainy
//! weekend counts).

use crate::error::MeteoError;
use crate::series::time_series::TimeSeries;
use crate::types::record::measurement::PRECIPITATION;
use crate::types::record::RecordKind;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use polars::prelude::{
    col, len, lit, when, Column, DataFrame, DataType, Expr, IntoLazy, LazyFrame, NamedFrom,
    Series, SortMultipleOptions, TimeUnit,
};
use std::ops::Range;

/// Column names of a [`WeatherFrame`] besides the measurement columns.
pub mod columns {
    /// Record time, naive UTC.
    pub const TIMESTAMP: &str = "timestamp";
    /// Record time as wall-clock time of the frame's time zone.
    pub const LOCAL_TIME: &str = "local_time";
    pub const STATION: &str = "station";
    pub const STATION_NAME: &str = "station_name";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    /// "observation" or "forecast".
    pub const KIND: &str = "kind";
    pub const FETCHED_AT: &str = "fetched_at";
    pub const CONDITION: &str = "condition";
    /// True for rows a resample placed between source records.
    pub const INTERPOLATED: &str = "interpolated";

    pub const YEAR: &str = "year";
    /// "day" or "night" in [`super::WeatherFrame::day_night_averages`].
    pub const PERIOD: &str = "period";
    pub const RAINY_WEEKENDS: &str = "rainy_weekends";
    pub(crate) const WEEK_START: &str = "week_start";
}

use columns::*;

/// Local hours counted as daytime when no other window is given.
pub fn default_day_hours() -> Range<u32> {
    6..18
}

/// A wrapper around a Polars `LazyFrame` holding one row per weather record.
///
/// The frame has the columns listed in [`columns`] followed by one nullable
/// `Float64` column per measurement name, sorted alphabetically. Datetime
/// columns are timezone-naive with millisecond precision: `timestamp` and
/// `fetched_at` hold UTC, `local_time` holds the wall-clock time of the zone
/// passed to [`TimeSeries::to_frame`]. All calendar statistics use `local_time`.
///
/// # Errors
///
/// Methods that collect (`collect`, `annual_averages`, ...) return
/// [`MeteoError::Polars`] when the query fails, for instance when a requested
/// measurement column does not exist.
#[derive(Clone)]
pub struct WeatherFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
}

impl WeatherFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    pub(crate) fn from_series(series: &TimeSeries, time_zone: Tz) -> Result<Self, MeteoError> {
        let records = series.records();
        let datetime = DataType::Datetime(TimeUnit::Milliseconds, None);

        let timestamps: Vec<i64> = records
            .iter()
            .map(|r| r.timestamp.timestamp_millis())
            .collect();
        let local_times: Vec<i64> = records
            .iter()
            .map(|r| {
                r.timestamp
                    .with_timezone(&time_zone)
                    .naive_local()
                    .and_utc()
                    .timestamp_millis()
            })
            .collect();
        let fetched: Vec<i64> = records
            .iter()
            .map(|r| r.fetched_at.timestamp_millis())
            .collect();
        let stations: Vec<&str> = records.iter().map(|r| r.station.as_str()).collect();
        let station_names: Vec<Option<&str>> =
            records.iter().map(|r| r.station_name.as_deref()).collect();
        let latitudes: Vec<Option<f64>> = records
            .iter()
            .map(|r| r.coordinates.map(|c| c.latitude))
            .collect();
        let longitudes: Vec<Option<f64>> = records
            .iter()
            .map(|r| r.coordinates.map(|c| c.longitude))
            .collect();
        let kinds: Vec<&str> = records.iter().map(|r| r.kind.as_str()).collect();
        let conditions: Vec<Option<&str>> =
            records.iter().map(|r| r.condition.as_deref()).collect();
        let interpolated: Vec<bool> = records.iter().map(|r| r.interpolated).collect();

        let mut frame_columns: Vec<Column> = vec![
            Series::new(TIMESTAMP.into(), timestamps)
                .cast(&datetime)?
                .into(),
            Series::new(LOCAL_TIME.into(), local_times)
                .cast(&datetime)?
                .into(),
            Series::new(STATION.into(), stations).into(),
            Series::new(STATION_NAME.into(), station_names).into(),
            Series::new(LATITUDE.into(), latitudes).into(),
            Series::new(LONGITUDE.into(), longitudes).into(),
            Series::new(KIND.into(), kinds).into(),
            Series::new(FETCHED_AT.into(), fetched).cast(&datetime)?.into(),
            Series::new(CONDITION.into(), conditions).into(),
            Series::new(INTERPOLATED.into(), interpolated).into(),
        ];
        for name in series.measurement_names() {
            let values: Vec<Option<f64>> = records.iter().map(|r| r.get(name)).collect();
            frame_columns.push(Series::new(name.into(), values).into());
        }

        Ok(Self::new(DataFrame::new(frame_columns)?.lazy()))
    }

    /// Applies an arbitrary Polars predicate, returning a new frame.
    pub fn filter(&self, predicate: Expr) -> WeatherFrame {
        WeatherFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps rows whose `timestamp` lies within `start..=end`.
    pub fn get_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> WeatherFrame {
        self.filter(
            col(TIMESTAMP)
                .gt_eq(lit(start.naive_utc()))
                .and(col(TIMESTAMP).lt_eq(lit(end.naive_utc()))),
        )
    }

    /// Keeps only observed or only forecast rows.
    pub fn only(&self, kind: RecordKind) -> WeatherFrame {
        self.filter(col(KIND).eq(lit(kind.as_str())))
    }

    pub fn collect(&self) -> Result<DataFrame, MeteoError> {
        Ok(self.frame.clone().collect()?)
    }

    /// Mean of each field per local calendar year.
    ///
    /// Returns a frame with a `year` column followed by one column per field,
    /// sorted by year.
    pub fn annual_averages(&self, fields: &[&str]) -> Result<DataFrame, MeteoError> {
        let means: Vec<Expr> = fields.iter().map(|field| col(*field).mean()).collect();
        let averages = self
            .frame
            .clone()
            .group_by([col(LOCAL_TIME).dt().year().alias(YEAR)])
            .agg(means)
            .sort_by_exprs([col(YEAR)], SortMultipleOptions::default())
            .collect()?;
        Ok(averages)
    }

    /// Mean of each field per year, split into daytime and nighttime rows.
    ///
    /// A row is `day` when its local hour is inside `day_hours` (see
    /// [`default_day_hours`]) and `night` otherwise. The result has `year`,
    /// `period` and one column per field, sorted by year then period.
    pub fn day_night_averages(
        &self,
        fields: &[&str],
        day_hours: Range<u32>,
    ) -> Result<DataFrame, MeteoError> {
        let hour = col(LOCAL_TIME).dt().hour();
        let is_day = hour
            .clone()
            .gt_eq(lit(day_hours.start as i32))
            .and(hour.lt(lit(day_hours.end as i32)));
        let period = when(is_day)
            .then(lit("day"))
            .otherwise(lit("night"))
            .alias(PERIOD);

        let means: Vec<Expr> = fields.iter().map(|field| col(*field).mean()).collect();
        let averages = self
            .frame
            .clone()
            .group_by([col(LOCAL_TIME).dt().year().alias(YEAR), period])
            .agg(means)
            .sort_by_exprs([col(YEAR), col(PERIOD)], SortMultipleOptions::default())
            .collect()?;
        Ok(averages)
    }

    /// Counts weekends per year whose total precipitation exceeds `min_precipitation`.
    ///
    /// A weekend is the Saturday and Sunday of one local calendar week. It is
    /// attributed to the year of its first row, so a weekend spanning New Year
    /// counts towards the year it started in. Years without a rainy weekend are
    /// absent from the result, which has `year` and `rainy_weekends` columns.
    ///
    /// Precipitation is an amount per source step, so only rows at source
    /// resolution are summed: `interpolated` rows of a resampled series are
    /// skipped. Source records that fell between grid points are no longer
    /// present after resampling; pass the merged series for exact totals.
    pub fn rainy_weekends(&self, min_precipitation: f64) -> Result<DataFrame, MeteoError> {
        let counts = self
            .frame
            .clone()
            .filter(
                col(LOCAL_TIME)
                    .dt()
                    .weekday()
                    .gt_eq(lit(6))
                    .and(col(INTERPOLATED).not()),
            )
            .group_by([col(LOCAL_TIME).dt().truncate(lit("1w")).alias(WEEK_START)])
            .agg([
                col(PRECIPITATION).sum(),
                col(LOCAL_TIME).dt().year().min().alias(YEAR),
            ])
            .filter(col(PRECIPITATION).gt(lit(min_precipitation)))
            .group_by([col(YEAR)])
            .agg([len().alias(RAINY_WEEKENDS)])
            .sort_by_exprs([col(YEAR)], SortMultipleOptions::default())
            .collect()?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::measurement::AIR_TEMPERATURE;
    use crate::series::resample::{default_interval, resample};
    use crate::types::record::WeatherRecord;
    use crate::types::station::Coordinates;
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Europe::Vilnius;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn observed(at: DateTime<Utc>) -> WeatherRecord {
        WeatherRecord::new(at, "vilniaus-ams", RecordKind::Observation, at)
    }

    fn ms_to_datetime(ms: i64) -> chrono::NaiveDateTime {
        DateTime::from_timestamp_millis(ms).unwrap().naive_utc()
    }

    #[test]
    fn test_frame_schema_and_local_time() -> TestResult {
        let series = TimeSeries::new(vec![
            observed(utc(2024, 5, 1, 9))
                .with_location("Vilniaus AMS", Coordinates::new(54.625992, 25.107064))
                .with_measurement(AIR_TEMPERATURE, 12.0)
                .with_condition("clear"),
            WeatherRecord::new(utc(2024, 5, 1, 10), "vilnius", RecordKind::Forecast, utc(2024, 5, 1, 8))
                .with_measurement(PRECIPITATION, 0.4),
        ])?;

        let df = series.to_frame(Vilnius)?.collect()?;

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            [
                TIMESTAMP,
                LOCAL_TIME,
                STATION,
                STATION_NAME,
                LATITUDE,
                LONGITUDE,
                KIND,
                FETCHED_AT,
                CONDITION,
                INTERPOLATED,
                AIR_TEMPERATURE,
                PRECIPITATION
            ]
        );
        assert!(matches!(
            df.column(TIMESTAMP)?.dtype(),
            DataType::Datetime(TimeUnit::Milliseconds, None)
        ));

        // Vilnius is UTC+3 in summer
        let local_ms = df.column(LOCAL_TIME)?.datetime()?.get(0).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(ms_to_datetime(local_ms), expected);

        assert_eq!(df.column(KIND)?.str()?.get(1), Some("forecast"));
        assert_eq!(df.column(CONDITION)?.str()?.get(1), None);
        assert_eq!(df.column(AIR_TEMPERATURE)?.f64()?.get(1), None);
        assert_eq!(df.column(PRECIPITATION)?.f64()?.get(1), Some(0.4));
        assert_eq!(df.column(STATION_NAME)?.str()?.get(0), Some("Vilniaus AMS"));
        assert_eq!(df.column(LATITUDE)?.f64()?.get(0), Some(54.625992));
        assert_eq!(df.column(LONGITUDE)?.f64()?.get(1), None);
        assert_eq!(df.column(INTERPOLATED)?.bool()?.get(0), Some(false));
        Ok(())
    }

    #[test]
    fn test_range_and_kind_filters() -> TestResult {
        let series = TimeSeries::new(vec![
            observed(utc(2024, 5, 1, 9)),
            observed(utc(2024, 5, 1, 10)),
            WeatherRecord::new(utc(2024, 5, 1, 11), "vilnius", RecordKind::Forecast, utc(2024, 5, 1, 8)),
        ])?;
        let frame = series.to_frame(Vilnius)?;

        let ranged = frame
            .get_range(utc(2024, 5, 1, 10), utc(2024, 5, 1, 11))
            .collect()?;
        assert_eq!(ranged.height(), 2);

        let forecast = frame.only(RecordKind::Forecast).collect()?;
        assert_eq!(forecast.height(), 1);
        Ok(())
    }

    #[test]
    fn test_annual_averages() -> TestResult {
        let series = TimeSeries::new(vec![
            observed(utc(2023, 6, 1, 12)).with_measurement(AIR_TEMPERATURE, 10.0),
            observed(utc(2023, 7, 1, 12)).with_measurement(AIR_TEMPERATURE, 20.0),
            observed(utc(2024, 1, 1, 12)).with_measurement(AIR_TEMPERATURE, -4.0),
        ])?;

        let df = series.to_frame(Vilnius)?.annual_averages(&[AIR_TEMPERATURE])?;

        assert_eq!(df.height(), 2);
        let years = df.column(YEAR)?.i32()?;
        assert_eq!(years.get(0), Some(2023));
        assert_eq!(years.get(1), Some(2024));
        let temps = df.column(AIR_TEMPERATURE)?.f64()?;
        assert_eq!(temps.get(0), Some(15.0));
        assert_eq!(temps.get(1), Some(-4.0));
        Ok(())
    }

    #[test]
    fn test_year_uses_local_time() -> TestResult {
        // 22:00 UTC on New Year's Eve is already the next year in Vilnius (UTC+2)
        let series = TimeSeries::new(vec![
            observed(utc(2023, 12, 31, 22)).with_measurement(AIR_TEMPERATURE, 1.0)
        ])?;

        let df = series.to_frame(Vilnius)?.annual_averages(&[AIR_TEMPERATURE])?;

        assert_eq!(df.column(YEAR)?.i32()?.get(0), Some(2024));
        Ok(())
    }

    #[test]
    fn test_day_night_split() -> TestResult {
        // Local times (UTC+3): 05:00, 06:00, 17:00, 18:00
        let series = TimeSeries::new(vec![
            observed(utc(2024, 5, 1, 2)).with_measurement(AIR_TEMPERATURE, 2.0),
            observed(utc(2024, 5, 1, 3)).with_measurement(AIR_TEMPERATURE, 10.0),
            observed(utc(2024, 5, 1, 14)).with_measurement(AIR_TEMPERATURE, 20.0),
            observed(utc(2024, 5, 1, 15)).with_measurement(AIR_TEMPERATURE, 4.0),
        ])?;

        let df = series
            .to_frame(Vilnius)?
            .day_night_averages(&[AIR_TEMPERATURE], default_day_hours())?;

        assert_eq!(df.height(), 2);
        let periods = df.column(PERIOD)?.str()?;
        assert_eq!(periods.get(0), Some("day"));
        assert_eq!(periods.get(1), Some("night"));
        let temps = df.column(AIR_TEMPERATURE)?.f64()?;
        assert_eq!(temps.get(0), Some(15.0));
        assert_eq!(temps.get(1), Some(3.0));
        Ok(())
    }

    #[test]
    fn test_rainy_weekends() -> TestResult {
        // 2024-05-04/05 and 2024-05-11/12 are weekends, 2024-05-08 is a Wednesday
        let series = TimeSeries::new(vec![
            observed(utc(2024, 5, 4, 9)).with_measurement(PRECIPITATION, 0.5),
            observed(utc(2024, 5, 5, 9)).with_measurement(PRECIPITATION, 0.0),
            observed(utc(2024, 5, 8, 9)).with_measurement(PRECIPITATION, 3.0),
            observed(utc(2024, 5, 11, 9)).with_measurement(PRECIPITATION, 0.0),
            observed(utc(2024, 5, 12, 9)).with_measurement(PRECIPITATION, 1.2),
            observed(utc(2024, 5, 18, 9)).with_measurement(PRECIPITATION, 0.0),
            observed(utc(2024, 5, 19, 9)),
        ])?;

        let df = series.to_frame(Vilnius)?.rainy_weekends(0.0)?;

        assert_eq!(df.height(), 1);
        assert_eq!(df.column(YEAR)?.i32()?.get(0), Some(2024));
        assert_eq!(df.column(RAINY_WEEKENDS)?.u32()?.get(0), Some(2));

        let stricter = series.to_frame(Vilnius)?.rainy_weekends(1.0)?;
        assert_eq!(stricter.column(RAINY_WEEKENDS)?.u32()?.get(0), Some(1));
        Ok(())
    }

    #[test]
    fn test_rainy_weekends_on_resampled_series() -> TestResult {
        // Saturday 2024-05-04, two hourly amounts of 0.1 mm
        let hourly = TimeSeries::new(vec![
            observed(utc(2024, 5, 4, 9)).with_measurement(PRECIPITATION, 0.1),
            observed(utc(2024, 5, 4, 10)).with_measurement(PRECIPITATION, 0.1),
        ])?;
        let resampled = resample(&hourly, default_interval())?;
        assert_eq!(resampled.len(), 13);

        let frame = resampled.to_frame(Vilnius)?;
        assert_eq!(frame.rainy_weekends(1.0)?.height(), 0);
        assert_eq!(hourly.to_frame(Vilnius)?.rainy_weekends(1.0)?.height(), 0);

        let wet = frame.rainy_weekends(0.15)?;
        assert_eq!(wet.column(RAINY_WEEKENDS)?.u32()?.get(0), Some(1));
        Ok(())
    }

    #[test]
    fn test_missing_measurement_column_errors() -> TestResult {
        let series = TimeSeries::new(vec![observed(utc(2024, 5, 1, 9))])?;
        let result = series.to_frame(Vilnius)?.annual_averages(&["snowDepth"]);
        assert!(matches!(result, Err(MeteoError::Polars(_))));
        Ok(())
    }
}
