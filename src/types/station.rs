//! Reference data describing where Meteo.lt measures and forecasts the weather:
//! observation stations and forecast places.

use serde::{Deserialize, Serialize};

/// A geographical position in decimal degrees.
///
/// # Examples
///
/// ```
/// use meteo_lt::Coordinates;
///
/// let vilnius = Coordinates::new(54.687157, 25.279652);
/// assert_eq!(vilnius.latitude, 54.687157);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude, positive for North.
    pub latitude: f64,
    /// Longitude, positive for East.
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A Meteo.lt observation station, as returned by `/stations`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// The station identifier used in request paths (e.g. "vilniaus-ams").
    pub code: String,
    /// Human readable station name (e.g. "Vilniaus AMS").
    pub name: String,
    /// Where the station is located.
    pub coordinates: Coordinates,
}

/// A forecast location, as returned by `/places`.
///
/// Places and stations are separate lists: forecasts are published per place,
/// observations per station.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// The place identifier used in request paths (e.g. "vilnius").
    pub code: String,
    pub name: String,
    /// Municipality the place belongs to, if reported.
    #[serde(default)]
    pub administrative_division: Option<String>,
    /// ISO country code, if reported.
    #[serde(default)]
    pub country_code: Option<String>,
    pub coordinates: Coordinates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_from_json() -> Result<(), serde_json::Error> {
        let station: Station = serde_json::from_str(
            r#"{
                "code": "vilniaus-ams",
                "name": "Vilniaus AMS",
                "coordinates": {"latitude": 54.625992, "longitude": 25.107064}
            }"#,
        )?;
        assert_eq!(station.code, "vilniaus-ams");
        assert_eq!(station.coordinates.longitude, 25.107064);
        Ok(())
    }

    #[test]
    fn test_place_optional_fields() -> Result<(), serde_json::Error> {
        let place: Place = serde_json::from_str(
            r#"{
                "code": "vilnius",
                "name": "Vilnius",
                "coordinates": {"latitude": 54.687157, "longitude": 25.279652}
            }"#,
        )?;
        assert_eq!(place.administrative_division, None);
        assert_eq!(place.country_code, None);

        let place: Place = serde_json::from_str(
            r#"{
                "code": "vilnius",
                "name": "Vilnius",
                "administrativeDivision": "Vilniaus miesto savivaldybė",
                "countryCode": "LT",
                "coordinates": {"latitude": 54.687157, "longitude": 25.279652}
            }"#,
        )?;
        assert_eq!(place.country_code.as_deref(), Some("LT"));
        Ok(())
    }
}
