//! Data models for Chargepulse.
//!
//! Reports are immutable facts submitted by users about a charging station.
//! Stations are the aggregate they describe. [`StationWithStats`] is a view
//! derived from both on every read and is never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, Located};

pub type StationId = i64;
pub type UserId = i64;
pub type ReportId = i64;

/// Self-reported state of a station's chargers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    /// At least one charger is free.
    Available,

    /// Chargers are working but occupied.
    Busy,

    /// Out of service.
    Unavailable,
}

impl StationStatus {
    /// Contribution of one recent report to the availability score.
    pub fn availability_weight(self) -> u64 {
        match self {
            StationStatus::Available => 100,
            StationStatus::Busy => 50,
            StationStatus::Unavailable => 0,
        }
    }
}

/// A single user-submitted observation of a station.
///
/// Reports are append-only. The `timestamp` is assigned once when the report
/// is recorded and is the only ordering between reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,

    pub station_id: StationId,

    pub user_id: UserId,

    /// Charger state as seen by the reporter.
    pub status: StationStatus,

    /// Satisfaction score in `1..=5`.
    pub rating: u8,

    #[serde(default)]
    pub comment: Option<String>,

    /// Free-form issue tags such as "Out of service" or "Wait time".
    #[serde(default)]
    pub issues: Vec<String>,

    pub timestamp: DateTime<Utc>,
}

/// A charging station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub charger_type: String,

    /// Output in kW.
    pub power_output: f64,

    /// Operating hours, e.g. "24/7".
    pub hours: String,

    #[serde(default)]
    pub price: Option<String>,

    #[serde(default)]
    pub amenities: Vec<String>,

    /// Status of the most recent report. Kept alongside the derived
    /// availability and reliability scores, which are computed separately.
    pub status: StationStatus,

    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Station {
    /// Apply a newly recorded report: the latest report's status wins.
    pub fn record_report(&mut self, report: &Report) {
        debug_assert_eq!(report.station_id, self.id);
        self.status = report.status;
        self.last_updated = report.timestamp;
    }
}

impl Located for Station {
    fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A registered user, as attached to the reports they authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub points: i64,
}

/// One row of the favorites relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Favorite {
    pub user_id: UserId,
    pub station_id: StationId,
}

/// A report together with the user who submitted it.
///
/// `user` is `None` when the author is not among the users the caller
/// supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentReport {
    #[serde(flatten)]
    pub report: Report,
    pub user: Option<User>,
}

/// Coarse bucket for an availability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityLevel {
    /// 80 and above.
    High,
    /// 40 to 79.
    Medium,
    /// Below 40.
    Low,
}

impl AvailabilityLevel {
    pub fn from_score(availability: u8) -> Self {
        match availability {
            80.. => AvailabilityLevel::High,
            40..=79 => AvailabilityLevel::Medium,
            _ => AvailabilityLevel::Low,
        }
    }
}

/// Coarse bucket for a reliability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityLevel {
    /// 90 and above.
    Excellent,
    /// 70 to 89.
    VeryGood,
    /// 50 to 69.
    Good,
    /// 30 to 49.
    Fair,
    /// Below 30.
    Poor,
}

impl ReliabilityLevel {
    pub fn from_score(reliability: u8) -> Self {
        match reliability {
            90.. => ReliabilityLevel::Excellent,
            70..=89 => ReliabilityLevel::VeryGood,
            50..=69 => ReliabilityLevel::Good,
            30..=49 => ReliabilityLevel::Fair,
            _ => ReliabilityLevel::Poor,
        }
    }
}

/// A station with its derived quality signals.
///
/// Recomputed from the full report history on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationWithStats {
    #[serde(flatten)]
    pub station: Station,

    /// Mean report rating with one decimal, `0.0` without reports.
    pub rating: f64,

    /// Number of reports for the station.
    pub review_count: usize,

    /// Live likelihood of a free charger, `0..=100`.
    pub availability: u8,

    pub availability_level: AvailabilityLevel,

    /// Confidence in the station's data, `0..=100`.
    pub reliability: u8,

    pub reliability_level: ReliabilityLevel,

    /// Whether the requesting user marked this station as a favorite.
    pub is_favorite: bool,

    /// Relative time of the newest report, or "No reports yet".
    pub last_reported: String,

    /// Up to five newest reports, newest first.
    pub reports: Vec<RecentReport>,
}

impl Located for StationWithStats {
    fn coordinate(&self) -> Coordinate {
        self.station.coordinate()
    }
}

/// Request body for POST /stations/stats.
#[derive(Debug, Clone, Deserialize)]
pub struct StationStatsRequest {
    pub station: Station,

    /// Every report recorded for the station.
    #[serde(default)]
    pub reports: Vec<Report>,

    /// Users that may have authored the reports.
    #[serde(default)]
    pub users: Vec<User>,

    #[serde(default)]
    pub favorites: Vec<Favorite>,

    /// The requesting user, if any.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Request body for POST /stations/stats/batch.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchStatsRequest {
    pub stations: Vec<Station>,

    /// Reports for any of the stations, matched by `station_id`.
    #[serde(default)]
    pub reports: Vec<Report>,

    #[serde(default)]
    pub users: Vec<User>,

    #[serde(default)]
    pub favorites: Vec<Favorite>,

    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Request body for POST /recommendation.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub stations: Vec<StationWithStats>,

    /// Where the user is. Without it the proximity term is skipped.
    #[serde(default)]
    pub location: Option<Coordinate>,
}

/// The recommended station and its score.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub station: StationWithStats,
    pub score: f64,
}

/// Response for POST /recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    /// `None` when no candidates were supplied.
    pub recommendation: Option<Recommendation>,

    /// Number of candidates considered.
    pub candidates: usize,
}

/// Request body for POST /stations/nearby.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyRequest {
    pub stations: Vec<StationWithStats>,

    pub location: Coordinate,

    /// Search radius in kilometers (default: service configuration).
    #[serde(default)]
    pub radius_km: Option<f64>,
}

/// A station in a nearby listing.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyStation {
    pub station: StationWithStats,
    pub distance_km: f64,

    /// Display form of the distance, e.g. "850 m" or "2.4 km".
    pub distance_text: String,
}

/// Response for POST /stations/nearby.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyResponse {
    pub radius_km: f64,

    /// Stations within the radius, nearest first.
    pub stations: Vec<NearbyStation>,
}
