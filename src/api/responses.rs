//! Response bodies of the Meteo.lt endpoints and their conversion into [`WeatherRecord`]s.

use crate::api::error::RequestError;
use crate::types::record::{measurement, ForecastType, RecordKind, WeatherRecord};
use crate::types::station::{Coordinates, Place, Station};
use crate::utils::parse_utc_timestamp;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

pub(crate) const OBSERVATION_TIME_FIELD: &str = "observationTimeUtc";
pub(crate) const FORECAST_TIME_FIELD: &str = "forecastTimeUtc";
const CONDITION_FIELD: &str = "conditionCode";
const FORECAST_PRECIPITATION_FIELD: &str = "totalPrecipitation";

/// Body of `/stations/{code}/observations/{date}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ObservationsResponse {
    pub station: Station,
    #[serde(default)]
    pub observations: Vec<Map<String, Value>>,
}

/// Body of `/places/{code}/forecasts/{type}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ForecastResponse {
    pub place: Place,
    #[serde(default)]
    pub forecast_type: Option<String>,
    #[serde(default)]
    pub forecast_creation_time_utc: Option<String>,
    #[serde(default)]
    pub forecast_timestamps: Vec<Map<String, Value>>,
}

/// One entry of `/places/{code}/forecasts`: either `{"type": "long-term"}` or a bare name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ForecastTypeEntry {
    Described {
        #[serde(rename = "type")]
        forecast_type: String,
    },
    Name(String),
}

impl From<ForecastTypeEntry> for ForecastType {
    fn from(entry: ForecastTypeEntry) -> Self {
        match entry {
            ForecastTypeEntry::Described { forecast_type } => ForecastType::from(forecast_type),
            ForecastTypeEntry::Name(name) => ForecastType::from(name),
        }
    }
}

/// One entry of `/stations/{code}/observations`: either `{"date": "2024-05-01"}` or a bare date.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ObservationDay {
    Described { date: NaiveDate },
    Date(NaiveDate),
}

impl From<ObservationDay> for NaiveDate {
    fn from(day: ObservationDay) -> Self {
        match day {
            ObservationDay::Described { date } | ObservationDay::Date(date) => date,
        }
    }
}

/// The station or place a response belongs to, stamped onto every record built from it.
#[derive(Debug)]
pub(crate) struct RecordOrigin<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub coordinates: Coordinates,
    pub kind: RecordKind,
    pub fetched_at: DateTime<Utc>,
}

/// Converts raw JSON rows into records tagged with the request metadata, ordered by timestamp.
pub(crate) fn rows_to_records(
    rows: Vec<Map<String, Value>>,
    time_field: &str,
    origin: &RecordOrigin<'_>,
) -> Result<Vec<WeatherRecord>, RequestError> {
    let mut records = rows
        .into_iter()
        .map(|row| row_to_record(row, time_field, origin))
        .collect::<Result<Vec<_>, _>>()?;
    records.sort_by_key(|record| record.timestamp);
    Ok(records)
}

fn row_to_record(
    row: Map<String, Value>,
    time_field: &str,
    origin: &RecordOrigin<'_>,
) -> Result<WeatherRecord, RequestError> {
    let raw_time = row
        .get(time_field)
        .and_then(Value::as_str)
        .ok_or_else(|| RequestError::MissingField {
            field: time_field.to_string(),
        })?;
    let timestamp = parse_utc_timestamp(time_field, raw_time)?;

    let mut record = WeatherRecord::new(timestamp, origin.code, origin.kind, origin.fetched_at)
        .with_location(origin.name, origin.coordinates);
    for (key, value) in row {
        if key == time_field {
            continue;
        }
        match value {
            Value::Number(number) => {
                if let Some(number) = number.as_f64() {
                    record
                        .measurements
                        .insert(measurement_name(key), number);
                }
            }
            Value::String(text) if key == CONDITION_FIELD => record.condition = Some(text),
            // nulls and unrelated text fields
            _ => {}
        }
    }
    Ok(record)
}

fn measurement_name(key: String) -> String {
    if key == FORECAST_PRECIPITATION_FIELD {
        measurement::PRECIPITATION.to_string()
    } else {
        key
    }
}
