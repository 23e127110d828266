//! Client for the public Meteo.lt weather API, plus the shaping needed to analyse its
//! data: merging observations with forecasts, resampling onto a regular grid, and
//! summarising the result with Polars.

mod api;
mod error;
mod frame;
mod meteo;
mod series;
mod stations;
mod types;
mod utils;

pub use error::MeteoError;
pub use meteo::*;

pub use api::error::RequestError;
pub use series::error::SeriesError;

pub use series::merge::merge;
pub use series::resample::{default_interval, resample};
pub use series::time_series::TimeSeries;

pub use frame::weather_frame::{columns, default_day_hours, WeatherFrame};

pub use stations::nearest::distance_km;

pub use types::record::{measurement, ForecastType, ObservationDate, RecordKind, WeatherRecord};
pub use types::station::{Coordinates, Place, Station};
