//! demos/plot_temperature.rs
//!
//! Plots observed and forecast air temperature for Vilnius on one time axis.
//!
//! To run this demo:
//! cargo run --example plot_temperature --features examples

use std::error::Error;

use meteo_lt::{columns, measurement, MeteoClient, ObservationDate};
use plotlars::{Legend, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let client = MeteoClient::new()?;

    let observations = client
        .get_observations("vilniaus-ams", ObservationDate::Latest)
        .await?;
    let forecast = client.get_forecast("vilnius").await?;
    let series = meteo_lt::merge(observations, forecast)?;

    let data: DataFrame = series
        .to_frame(client.time_zone())?
        .frame
        .select([col(columns::LOCAL_TIME), col(measurement::AIR_TEMPERATURE)])
        .collect()?;

    plot_temperature(&data);
    Ok(())
}

fn plot_temperature(data: &DataFrame) {
    TimeSeriesPlot::builder()
        .data(data)
        .x(columns::LOCAL_TIME)
        .y(measurement::AIR_TEMPERATURE)
        .colors(vec![Rgb(235, 117, 0)])
        .plot_title(Text::from("Vilnius air temperature").font("Arial").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("local time")
        .y_title("°C")
        .build()
        .plot();
}
