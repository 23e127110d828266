//! demos/report.rs
//!
//! Fetches the last days of observations for the station nearest to Vilnius,
//! joins them with the long-term forecast, resamples to five minute steps and
//! prints the summary tables.
//!
//! To run this demo:
//! cargo run --example report

use anyhow::Result;
use chrono::{TimeDelta, Utc};
use meteo_lt::{default_day_hours, measurement, MeteoClient};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // 1. Create a client and pick the forecast place
    let client = MeteoClient::new()?;
    let place = client.get_place("vilnius").await?;

    // 2. Pair it with the closest observation station
    let (station, distance) = client
        .nearest_stations()
        .location(place.coordinates)
        .call()
        .await?
        .remove(0);
    println!(
        "Using station {} ({:.1} km from {})",
        station.name, distance, place.name
    );

    // 3. Observations of the last three days plus the forecast, on a 5 minute grid
    let today = Utc::now().date_naive();
    let series = client
        .time_series()
        .station(&station.code)
        .place(&place.code)
        .start(today - TimeDelta::days(3))
        .end(today)
        .call()
        .await?;
    println!(
        "{} rows from {:?} to {:?}",
        series.len(),
        series.start(),
        series.end()
    );

    // 4. Summaries
    let frame = series.to_frame(client.time_zone())?;
    let fields = [measurement::AIR_TEMPERATURE, measurement::RELATIVE_HUMIDITY];
    println!("{}", frame.annual_averages(&fields)?);
    println!("{}", frame.day_night_averages(&fields, default_day_hours())?);
    println!("{}", frame.rainy_weekends(0.0)?);

    Ok(())
}
