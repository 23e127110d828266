use crate::api::error::RequestError;
use crate::series::error::SeriesError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeteoError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("Polars operation failed")]
    Polars(#[from] PolarsError),

    #[error("No weather station found within {radius} km of ({lat}, {lon})")]
    NoStationWithinRadius { radius: f64, lat: f64, lon: f64 },
}
