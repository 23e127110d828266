//! The weather record shared by observations and forecasts, plus the small value
//! types used to address the API (observation dates and forecast types).

use crate::types::station::Coordinates;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Measurement names as they appear in Meteo.lt responses.
pub mod measurement {
    pub const AIR_TEMPERATURE: &str = "airTemperature";
    pub const FEELS_LIKE_TEMPERATURE: &str = "feelsLikeTemperature";
    pub const WIND_SPEED: &str = "windSpeed";
    pub const WIND_GUST: &str = "windGust";
    pub const WIND_DIRECTION: &str = "windDirection";
    pub const CLOUD_COVER: &str = "cloudCover";
    pub const SEA_LEVEL_PRESSURE: &str = "seaLevelPressure";
    pub const RELATIVE_HUMIDITY: &str = "relativeHumidity";
    /// Observed precipitation. Forecast `totalPrecipitation` is stored under this name too.
    pub const PRECIPITATION: &str = "precipitation";
}

/// Whether a record was measured or predicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Historical, measured data.
    Observation,
    /// Predicted future data.
    Forecast,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Observation => "observation",
            RecordKind::Forecast => "forecast",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped row of weather data with the metadata of the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Moment the values apply to.
    pub timestamp: DateTime<Utc>,
    /// Station code for observations, place code for forecasts.
    pub station: String,
    /// Human readable name of that station or place, when the response reported it.
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub kind: RecordKind,
    /// When the request that returned this record was issued.
    pub fetched_at: DateTime<Utc>,
    /// Numeric values keyed by their API field name (see [`measurement`]).
    pub measurements: BTreeMap<String, f64>,
    /// Textual condition code such as "clear" or "light-rain".
    pub condition: Option<String>,
    /// Set on rows produced by [`crate::resample`] between source records.
    #[serde(default)]
    pub interpolated: bool,
}

impl WeatherRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        station: impl Into<String>,
        kind: RecordKind,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            station: station.into(),
            station_name: None,
            coordinates: None,
            kind,
            fetched_at,
            measurements: BTreeMap::new(),
            condition: None,
            interpolated: false,
        }
    }

    /// Attaches the name and position of the station or place the record belongs to.
    pub fn with_location(mut self, name: impl Into<String>, coordinates: Coordinates) -> Self {
        self.station_name = Some(name.into());
        self.coordinates = Some(coordinates);
        self
    }

    /// Adds or replaces a measurement, returning the record for chaining.
    pub fn with_measurement(mut self, name: impl Into<String>, value: f64) -> Self {
        self.measurements.insert(name.into(), value);
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.measurements.get(name).copied()
    }
}

/// The `{date}` path segment of the observations endpoint.
///
/// # Examples
///
/// ```
/// use meteo_lt::ObservationDate;
/// use chrono::NaiveDate;
///
/// assert_eq!(ObservationDate::Latest.to_string(), "latest");
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(ObservationDate::from(date).to_string(), "2024-03-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObservationDate {
    /// The most recent observations the station has published.
    #[default]
    Latest,
    /// All observations of one UTC calendar day.
    Date(NaiveDate),
}

impl From<NaiveDate> for ObservationDate {
    fn from(date: NaiveDate) -> Self {
        ObservationDate::Date(date)
    }
}

impl fmt::Display for ObservationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationDate::Latest => f.write_str("latest"),
            ObservationDate::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Forecast products published per place.
///
/// Meteo.lt currently publishes `long-term` only; any other product name
/// listed by [`crate::MeteoClient::list_forecast_types`] is kept as [`ForecastType::Other`].
///
/// # Examples
///
/// ```
/// use meteo_lt::ForecastType;
///
/// assert_eq!(ForecastType::from("long-term"), ForecastType::LongTerm);
/// assert_eq!(ForecastType::from("short-term").to_string(), "short-term");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ForecastType {
    /// Hourly forecast for the coming days.
    #[default]
    LongTerm,
    Other(String),
}

impl ForecastType {
    /// The `{type}` segment of `/places/{code}/forecasts/{type}`.
    pub fn path_segment(&self) -> &str {
        match self {
            ForecastType::LongTerm => "long-term",
            ForecastType::Other(name) => name,
        }
    }
}

impl From<&str> for ForecastType {
    fn from(name: &str) -> Self {
        match name {
            "long-term" => ForecastType::LongTerm,
            other => ForecastType::Other(other.to_string()),
        }
    }
}

impl From<String> for ForecastType {
    fn from(name: String) -> Self {
        ForecastType::from(name.as_str())
    }
}

impl fmt::Display for ForecastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}
