//! Recommendation scoring and distance ordering of stations.
//!
//! The recommendation score weighs availability (up to 40 points),
//! reliability (up to 30) and rating (up to 15). With an observer location a
//! proximity term adds up to 15 more, so scores top out at 100 with a location
//! and at 85 without one. The two ranges are not normalized against each other.

use serde::Serialize;

use crate::geo::{Coordinate, Located, distance};
use crate::model::StationWithStats;

const AVAILABILITY_WEIGHT: f64 = 0.4;
const RELIABILITY_WEIGHT: f64 = 0.3;
const RATING_POINTS: f64 = 15.0;
const MAX_RATING: f64 = 5.0;
const PROXIMITY_POINTS: f64 = 15.0;

/// Distances below this are clamped before taking the inverse.
const MIN_PROXIMITY_KM: f64 = 0.1;

/// A candidate together with its recommendation score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredStation<'a> {
    pub station: &'a StationWithStats,
    pub score: f64,
}

/// A station together with its distance from an observer.
#[derive(Debug, Clone, Serialize)]
pub struct StationDistance<'a, T> {
    pub station: &'a T,
    pub distance_km: f64,
}

/// Proximity points: 15 within 1 km, then `15 / d`.
fn proximity_score(distance_km: f64) -> f64 {
    (PROXIMITY_POINTS / distance_km.max(MIN_PROXIMITY_KM)).min(PROXIMITY_POINTS)
}

/// Recommendation score of one station.
pub fn score_station(station: &StationWithStats, observer: Option<Coordinate>) -> f64 {
    let mut score = 0.0;

    score += f64::from(station.availability) * AVAILABILITY_WEIGHT;
    score += f64::from(station.reliability) * RELIABILITY_WEIGHT;
    score += (station.rating / MAX_RATING) * RATING_POINTS;

    if let Some(observer) = observer {
        score += proximity_score(distance(observer, station.coordinate()));
    }

    score
}

/// Every candidate with its score, best first.
///
/// The sort is stable, so candidates with equal scores keep their input order.
pub fn rank_by_score(
    stations: &[StationWithStats],
    observer: Option<Coordinate>,
) -> Vec<ScoredStation<'_>> {
    let mut scored: Vec<ScoredStation<'_>> = stations
        .iter()
        .map(|station| ScoredStation {
            station,
            score: score_station(station, observer),
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// The highest-scoring candidate, or `None` for an empty list.
///
/// On ties the candidate that comes first in `stations` wins.
pub fn select_best(
    stations: &[StationWithStats],
    observer: Option<Coordinate>,
) -> Option<ScoredStation<'_>> {
    rank_by_score(stations, observer).into_iter().next()
}

/// Stations ordered nearest first.
pub fn rank_by_distance<T: Located>(
    stations: &[T],
    observer: Coordinate,
) -> Vec<StationDistance<'_, T>> {
    let mut ranked: Vec<StationDistance<'_, T>> = stations
        .iter()
        .map(|station| StationDistance {
            station,
            distance_km: distance(observer, station.coordinate()),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// Stations within `radius_km` of the observer, in input order.
pub fn stations_within_radius<T: Located>(
    stations: &[T],
    observer: Coordinate,
    radius_km: f64,
) -> Vec<&T> {
    stations
        .iter()
        .filter(|station| distance(observer, station.coordinate()) <= radius_km)
        .collect()
}
