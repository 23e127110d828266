use crate::types::station::{Coordinates, Station};
use haversine::{distance, Location as HaversineLocation, Units};
use ordered_float::OrderedFloat;

/// Great-circle distance between two points in kilometres.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    distance(
        HaversineLocation {
            latitude: from.latitude,
            longitude: from.longitude,
        },
        HaversineLocation {
            latitude: to.latitude,
            longitude: to.longitude,
        },
        Units::Kilometers,
    )
}

/// Up to `limit` stations within `max_distance_km` of `location`, closest first,
/// paired with their distance in kilometres.
pub(crate) fn nearest(
    stations: &[Station],
    location: Coordinates,
    limit: usize,
    max_distance_km: f64,
) -> Vec<(Station, f64)> {
    if limit == 0 {
        return vec![];
    }

    let mut candidates: Vec<(&Station, f64)> = stations
        .iter()
        .map(|station| (station, distance_km(location, station.coordinates)))
        .filter(|(_, dist_km)| *dist_km <= max_distance_km)
        .collect();

    candidates.sort_by_key(|(_, dist_km)| OrderedFloat(*dist_km));
    candidates.truncate(limit);
    candidates
        .into_iter()
        .map(|(station, dist_km)| (station.clone(), dist_km))
        .collect()
}
