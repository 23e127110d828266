//! This module provides the main entry point for talking to the Meteo.lt API.
//! It fetches stations, places, observations and forecasts, and runs the
//! fetch-merge-resample pipeline that turns them into one regular time series.

use crate::api::http::ApiTransport;
use crate::api::responses::{
    rows_to_records, ForecastResponse, ForecastTypeEntry, ObservationDay, ObservationsResponse,
    RecordOrigin, FORECAST_TIME_FIELD, OBSERVATION_TIME_FIELD,
};
use crate::error::MeteoError;
use crate::series::merge::merge;
use crate::series::resample::{default_interval, resample};
use crate::series::time_series::TimeSeries;
use crate::stations::nearest::nearest;
use crate::types::record::{ForecastType, ObservationDate, RecordKind, WeatherRecord};
use crate::types::station::{Coordinates, Place, Station};
use bon::{bon, Builder};
use chrono::{NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::sync::Mutex;

/// Public Meteo.lt API root.
pub const DEFAULT_BASE_URL: &str = "https://api.meteo.lt/v1";

const DEFAULT_USER_AGENT: &str = concat!("meteo-lt/", env!("CARGO_PKG_VERSION"));

/// Settings for a [`MeteoClient`].
///
/// # Examples
///
/// ```
/// use meteo_lt::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .base_url("http://localhost:8080/v1")
///     .timeout(Duration::from_secs(10))
///     .build();
/// assert_eq!(config.time_zone, chrono_tz::Europe::Vilnius);
/// assert_eq!(config.request_pause, Duration::from_millis(150));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// API root that endpoint paths are appended to.
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    /// Zone used for local-time columns and calendar statistics.
    #[builder(default = chrono_tz::Europe::Vilnius)]
    pub time_zone: Tz,
    /// Per-request timeout. reqwest's default applies when unset.
    pub timeout: Option<Duration>,
    #[builder(into, default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
    /// Delay between the per-day requests of [`MeteoClient::observations_range`].
    #[builder(default = Duration::from_millis(150))]
    pub request_pause: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::builder().build()
    }
}

/// The main client struct for accessing Meteo.lt data.
///
/// Every method issues its requests sequentially and returns the first failure
/// as a [`MeteoError::Request`]; nothing is retried. The station list is
/// reference data and is kept in memory after the first successful fetch.
///
/// # Examples
///
/// ```no_run
/// # use meteo_lt::{MeteoClient, MeteoError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), MeteoError> {
/// let client = MeteoClient::new()?;
/// let stations = client.list_stations().await?;
/// println!("{} stations", stations.len());
/// # Ok(())
/// # }
/// ```
pub struct MeteoClient {
    transport: ApiTransport,
    config: ClientConfig,
    stations: Mutex<Option<Vec<Station>>>,
}

#[bon]
impl MeteoClient {
    /// Creates a client for the public API with default settings.
    pub fn new() -> Result<Self, MeteoError> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RequestError::ClientBuild`] (wrapped in [`MeteoError::Request`])
    /// if the HTTP client cannot be constructed.
    pub fn with_config(config: ClientConfig) -> Result<Self, MeteoError> {
        let transport = ApiTransport::new(&config.base_url, &config.user_agent, config.timeout)?;
        Ok(Self {
            transport,
            config,
            stations: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Zone to pass to [`TimeSeries::to_frame`] for this client's data.
    pub fn time_zone(&self) -> Tz {
        self.config.time_zone
    }

    /// Lists all observation stations (`GET /stations`).
    ///
    /// The first successful response is cached; later calls do not hit the network.
    pub async fn list_stations(&self) -> Result<Vec<Station>, MeteoError> {
        let mut cache = self.stations.lock().await;
        if let Some(stations) = cache.as_ref() {
            return Ok(stations.clone());
        }

        let stations: Vec<Station> = self.transport.get_json("stations").await?;
        info!("Fetched {} stations", stations.len());
        *cache = Some(stations.clone());
        Ok(stations)
    }

    /// Details of one observation station (`GET /stations/{code}`).
    pub async fn get_station(&self, code: &str) -> Result<Station, MeteoError> {
        Ok(self.transport.get_json(&format!("stations/{code}")).await?)
    }

    /// Lists all forecast places (`GET /places`).
    pub async fn list_places(&self) -> Result<Vec<Place>, MeteoError> {
        let places: Vec<Place> = self.transport.get_json("places").await?;
        info!("Fetched {} places", places.len());
        Ok(places)
    }

    /// Details of one forecast place (`GET /places/{code}`).
    pub async fn get_place(&self, code: &str) -> Result<Place, MeteoError> {
        Ok(self.transport.get_json(&format!("places/{code}")).await?)
    }

    /// Forecast products a place offers (`GET /places/{code}/forecasts`).
    pub async fn list_forecast_types(&self, place: &str) -> Result<Vec<ForecastType>, MeteoError> {
        let entries: Vec<ForecastTypeEntry> = self
            .transport
            .get_json(&format!("places/{place}/forecasts"))
            .await?;
        Ok(entries.into_iter().map(ForecastType::from).collect())
    }

    /// Days for which `station` has stored observations (`GET /stations/{code}/observations`),
    /// oldest first.
    pub async fn observation_dates(&self, station: &str) -> Result<Vec<NaiveDate>, MeteoError> {
        let days: Vec<ObservationDay> = self
            .transport
            .get_json(&format!("stations/{station}/observations"))
            .await?;
        let mut dates: Vec<NaiveDate> = days.into_iter().map(NaiveDate::from).collect();
        dates.sort_unstable();
        debug!("Station {} has observations for {} days", station, dates.len());
        Ok(dates)
    }

    /// Observations of `station` for one day or the latest available batch.
    ///
    /// Records are tagged [`RecordKind::Observation`], carry `station` as their
    /// station code and the time of this call as `fetched_at`, and are ordered
    /// by timestamp. For an explicit date, only records whose UTC timestamp
    /// falls on that date are returned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use meteo_lt::{MeteoClient, MeteoError, ObservationDate};
    /// use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), MeteoError> {
    /// let client = MeteoClient::new()?;
    ///
    /// let latest = client.get_observations("vilniaus-ams", ObservationDate::Latest).await?;
    /// let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    /// let may_first = client.get_observations("vilniaus-ams", day).await?;
    /// println!("{} + {} records", latest.len(), may_first.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_observations(
        &self,
        station: &str,
        date: impl Into<ObservationDate>,
    ) -> Result<Vec<WeatherRecord>, MeteoError> {
        let date = date.into();
        let fetched_at = Utc::now();
        let body: ObservationsResponse = self
            .transport
            .get_json(&format!("stations/{station}/observations/{date}"))
            .await?;

        let origin = RecordOrigin {
            code: station,
            name: &body.station.name,
            coordinates: body.station.coordinates,
            kind: RecordKind::Observation,
            fetched_at,
        };
        let mut records = rows_to_records(body.observations, OBSERVATION_TIME_FIELD, &origin)?;
        debug!(
            "Fetched {} observations from {} for {}",
            records.len(),
            body.station.name,
            date
        );

        if let ObservationDate::Date(day) = date {
            let received = records.len();
            records.retain(|r| r.timestamp.date_naive() == day);
            if records.len() != received {
                warn!(
                    "Dropped {} observations of {} outside of {}",
                    received - records.len(),
                    station,
                    day
                );
            }
        }
        Ok(records)
    }

    /// Long-term forecast for a place, tagged [`RecordKind::Forecast`].
    pub async fn get_forecast(&self, place: &str) -> Result<Vec<WeatherRecord>, MeteoError> {
        self.get_forecast_by_type(place, ForecastType::LongTerm)
            .await
    }

    /// Forecast of the given type for a place (`GET /places/{code}/forecasts/{type}`).
    ///
    /// Accepts a [`ForecastType`] or any product name, such as one returned by
    /// [`MeteoClient::list_forecast_types`].
    pub async fn get_forecast_by_type(
        &self,
        place: &str,
        forecast_type: impl Into<ForecastType>,
    ) -> Result<Vec<WeatherRecord>, MeteoError> {
        let forecast_type = forecast_type.into();
        let fetched_at = Utc::now();
        let body: ForecastResponse = self
            .transport
            .get_json(&format!("places/{place}/forecasts/{forecast_type}"))
            .await?;
        info!(
            "Fetched {} forecast for {} created at {}",
            body.forecast_type.as_deref().unwrap_or("unknown"),
            body.place.name,
            body.forecast_creation_time_utc.as_deref().unwrap_or("unknown")
        );

        let origin = RecordOrigin {
            code: place,
            name: &body.place.name,
            coordinates: body.place.coordinates,
            kind: RecordKind::Forecast,
            fetched_at,
        };
        Ok(rows_to_records(body.forecast_timestamps, FORECAST_TIME_FIELD, &origin)?)
    }

    /// Observations for every day from `start` to `end`, inclusive.
    ///
    /// Issues one request per day, one after another, waiting
    /// [`ClientConfig::request_pause`] between them. The first failing day
    /// aborts the whole range.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use meteo_lt::{MeteoClient, MeteoError};
    /// use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), MeteoError> {
    /// let client = MeteoClient::new()?;
    /// let week = client
    ///     .observations_range()
    ///     .station("vilniaus-ams")
    ///     .start(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2024, 5, 7).unwrap())
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn observations_range(
        &self,
        station: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WeatherRecord>, MeteoError> {
        let mut records = Vec::new();
        let mut day = start;
        while day <= end {
            if day > start && !self.config.request_pause.is_zero() {
                tokio::time::sleep(self.config.request_pause).await;
            }
            info!("Fetching observations of {} for {}", station, day);
            records.extend(self.get_observations(station, day).await?);

            let Some(next) = day.succ_opt() else {
                break;
            };
            day = next;
        }
        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }

    /// Observation stations closest to `location`, with their distance in km.
    ///
    /// * `.location(Coordinates)`: **Required.** Point to search around.
    /// * `.max_distance_km(f64)`: Optional. Search radius, defaults to `50.0`.
    /// * `.limit(usize)`: Optional. Maximum number of stations, defaults to `1`.
    ///
    /// # Errors
    ///
    /// Returns [`MeteoError::NoStationWithinRadius`] when nothing is in range.
    #[builder]
    pub async fn nearest_stations(
        &self,
        location: Coordinates,
        max_distance_km: Option<f64>,
        limit: Option<usize>,
    ) -> Result<Vec<(Station, f64)>, MeteoError> {
        let max_distance_km = max_distance_km.unwrap_or(50.0);
        let limit = limit.unwrap_or(1);

        let stations = self.list_stations().await?;
        let found = nearest(&stations, location, limit, max_distance_km);
        if found.is_empty() {
            return Err(MeteoError::NoStationWithinRadius {
                radius: max_distance_km,
                lat: location.latitude,
                lon: location.longitude,
            });
        }
        Ok(found)
    }

    /// Fetches observations and forecast, merges them and resamples onto a regular grid.
    ///
    /// * `.station(&str)`: **Required.** Observation station code.
    /// * `.place(&str)`: **Required.** Forecast place code.
    /// * `.start(NaiveDate)` / `.end(NaiveDate)`: Optional. Observation days to
    ///   fetch. With only one of them set, that single day is fetched; with
    ///   neither, the latest observations are used.
    /// * `.interval(TimeDelta)`: Optional. Grid spacing, defaults to five minutes.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use meteo_lt::{MeteoClient, MeteoError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), MeteoError> {
    /// let client = MeteoClient::new()?;
    /// let series = client
    ///     .time_series()
    ///     .station("vilniaus-ams")
    ///     .place("vilnius")
    ///     .call()
    ///     .await?;
    /// let frame = series.to_frame(client.time_zone())?.collect()?;
    /// println!("{}", frame);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn time_series(
        &self,
        station: &str,
        place: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        interval: Option<TimeDelta>,
    ) -> Result<TimeSeries, MeteoError> {
        let observations = match (start, end) {
            (Some(start), Some(end)) => {
                self.observations_range()
                    .station(station)
                    .start(start)
                    .end(end)
                    .call()
                    .await?
            }
            (Some(day), None) | (None, Some(day)) => self.get_observations(station, day).await?,
            (None, None) => {
                self.get_observations(station, ObservationDate::Latest)
                    .await?
            }
        };
        let forecast = self.get_forecast(place).await?;

        let merged = merge(observations, forecast)?;
        Ok(resample(&merged, interval.unwrap_or_else(default_interval))?)
    }
}
