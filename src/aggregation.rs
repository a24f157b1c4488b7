//! Aggregation of raw station reports into derived quality signals.
//!
//! Every function here is pure: it reads its arguments and a reference
//! timestamp and returns a fresh value. Stats are a view over the full report
//! history and are rebuilt on every call.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::model::{
    AvailabilityLevel, Favorite, RecentReport, ReliabilityLevel, Report, Station, StationId,
    StationStatus, StationWithStats, User, UserId,
};

/// Only reports newer than this count towards availability.
const AVAILABILITY_WINDOW_HOURS: i64 = 24;

/// Availability when a station has never been reported on.
const DEFAULT_AVAILABILITY: u8 = 50;

/// Availability when a station has reports, but none inside the window.
const STALE_AVAILABILITY: u8 = 70;

/// Reliability below `MIN_REPORTS_FOR_RELIABILITY` reports.
const DEFAULT_RELIABILITY: u8 = 80;

const MIN_REPORTS_FOR_RELIABILITY: usize = 3;

/// How many reports are attached to a [`StationWithStats`].
const RECENT_REPORTS_LIMIT: usize = 5;

const NO_REPORTS: &str = "No reports yet";

/// Units for [`format_last_reported`], coarsest first.
const ELAPSED_UNITS: [(&str, f64); 5] = [
    ("years", 31_536_000.0),
    ("months", 2_592_000.0),
    ("days", 86_400.0),
    ("hours", 3_600.0),
    ("minutes", 60.0),
];

/// Integer division rounding halves up. `d` must be non-zero.
fn div_round_half_up(n: u64, d: u64) -> u64 {
    (2 * n + d) / (2 * d)
}

/// Mean rating in tenths, rounded half up. `None` without reports.
fn rating_tenths(reports: &[Report]) -> Option<u64> {
    if reports.is_empty() {
        return None;
    }
    let sum: u64 = reports.iter().map(|r| u64::from(r.rating)).sum();
    Some(div_round_half_up(sum * 10, reports.len() as u64))
}

/// Average rating rounded to one decimal, `0.0` for no reports.
pub fn compute_rating(reports: &[Report]) -> f64 {
    rating_tenths(reports).map_or(0.0, |tenths| tenths as f64 / 10.0)
}

/// Availability score in `0..=100` from reports of the last 24 hours.
///
/// Each recent report contributes 100 (available), 50 (busy) or 0
/// (unavailable); the score is their rounded mean. Falls back to 50 without
/// any reports and to 70 when every report is older than the window.
pub fn compute_availability(reports: &[Report], now: DateTime<Utc>) -> u8 {
    if reports.is_empty() {
        return DEFAULT_AVAILABILITY;
    }

    let cutoff = now - Duration::hours(AVAILABILITY_WINDOW_HOURS);
    let (weight, count) = reports
        .iter()
        .filter(|r| r.timestamp > cutoff)
        .fold((0u64, 0u64), |(weight, count), r| {
            (weight + r.status.availability_weight(), count + 1)
        });

    if count == 0 {
        return STALE_AVAILABILITY;
    }

    // a mean of values in {0, 50, 100} always fits
    div_round_half_up(weight, count) as u8
}

/// Reliability score in `0..=100`.
///
/// Half of the score comes from the average rating (`rating * 10`), the other
/// half from how strongly reporters agree on a status (share of the most
/// frequent status, times 50). Fewer than three reports yield 80.
pub fn compute_reliability(reports: &[Report]) -> u8 {
    if reports.len() < MIN_REPORTS_FOR_RELIABILITY {
        return DEFAULT_RELIABILITY;
    }
    let total = reports.len() as u64;
    let rating_factor = rating_tenths(reports).unwrap_or_default();

    let mut status_counts: HashMap<StationStatus, u64> = HashMap::new();
    for report in reports {
        *status_counts.entry(report.status).or_default() += 1;
    }
    let most_common = status_counts.values().copied().max().unwrap_or_default();

    // rating_factor + most_common / total * 50, kept in integers
    let numerator = rating_factor * total + most_common * 50;
    div_round_half_up(numerator, total).min(100) as u8
}

/// Human-readable age of the newest report, e.g. "3 hours ago".
///
/// Picks the coarsest unit whose quotient exceeds 1 and floors it. The unit is
/// always plural, so 90 minutes reads "1 hours ago".
pub fn format_last_reported(most_recent: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(reported_at) = most_recent else {
        return NO_REPORTS.to_string();
    };

    let seconds = (now - reported_at).num_milliseconds().div_euclid(1000) as f64;

    for (unit, unit_seconds) in ELAPSED_UNITS {
        let interval = seconds / unit_seconds;
        if interval > 1.0 {
            return format!("{} {} ago", interval.floor(), unit);
        }
    }

    format!("{} seconds ago", seconds)
}

/// Build the read view for one station from its full report history.
///
/// `users` resolves report authors; `favorites` and `viewer` decide
/// `is_favorite`. Nothing is mutated.
pub fn build_station_with_stats(
    station: &Station,
    reports: &[Report],
    users: &[User],
    favorites: &[Favorite],
    viewer: Option<UserId>,
    now: DateTime<Utc>,
) -> StationWithStats {
    let rating = compute_rating(reports);
    let availability = compute_availability(reports, now);
    let reliability = compute_reliability(reports);

    let is_favorite = viewer.is_some_and(|user_id| {
        favorites
            .iter()
            .any(|f| f.user_id == user_id && f.station_id == station.id)
    });

    let mut newest_first: Vec<&Report> = reports.iter().collect();
    newest_first.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let last_reported = format_last_reported(newest_first.first().map(|r| r.timestamp), now);

    let recent = newest_first
        .into_iter()
        .take(RECENT_REPORTS_LIMIT)
        .map(|report| RecentReport {
            report: report.clone(),
            user: users.iter().find(|u| u.id == report.user_id).cloned(),
        })
        .collect();

    debug!(
        station_id = station.id,
        review_count = reports.len(),
        rating,
        availability,
        reliability,
        "Station stats computed"
    );

    StationWithStats {
        station: station.clone(),
        rating,
        review_count: reports.len(),
        availability,
        availability_level: AvailabilityLevel::from_score(availability),
        reliability,
        reliability_level: ReliabilityLevel::from_score(reliability),
        is_favorite,
        last_reported,
        reports: recent,
    }
}

/// Build views for many stations from one flat report list.
///
/// Reports are matched to stations by `station_id`; output follows the order
/// of `stations`.
pub fn build_all_station_stats(
    stations: &[Station],
    reports: &[Report],
    users: &[User],
    favorites: &[Favorite],
    viewer: Option<UserId>,
    now: DateTime<Utc>,
) -> Vec<StationWithStats> {
    let mut by_station: HashMap<StationId, Vec<Report>> = HashMap::new();
    for report in reports {
        by_station
            .entry(report.station_id)
            .or_default()
            .push(report.clone());
    }

    stations
        .iter()
        .map(|station| {
            let station_reports = by_station
                .get(&station.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            build_station_with_stats(station, station_reports, users, favorites, viewer, now)
        })
        .collect()
}

/// Binds the aggregation functions to a clock.
#[derive(Clone)]
pub struct StatsAggregator {
    clock: Arc<dyn Clock>,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl StatsAggregator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn build(
        &self,
        station: &Station,
        reports: &[Report],
        users: &[User],
        favorites: &[Favorite],
        viewer: Option<UserId>,
    ) -> StationWithStats {
        build_station_with_stats(station, reports, users, favorites, viewer, self.now())
    }

    pub fn build_all(
        &self,
        stations: &[Station],
        reports: &[Report],
        users: &[User],
        favorites: &[Favorite],
        viewer: Option<UserId>,
    ) -> Vec<StationWithStats> {
        build_all_station_stats(stations, reports, users, favorites, viewer, self.now())
    }
}
