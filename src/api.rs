//! HTTP API handlers for Chargepulse.
//!
//! The service is stateless: every request carries the stations, reports and
//! users it needs, and the response is computed from that payload alone.
//! Nothing is stored between requests.
//!
//! Logging records ids and counts only, never comments or user details.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::aggregation::StatsAggregator;
use crate::config::AppConfig;
use crate::geo::format_distance;
use crate::model::{
    BatchStatsRequest, NearbyRequest, NearbyResponse, NearbyStation, Recommendation,
    RecommendationRequest, RecommendationResponse, StationStatsRequest, StationWithStats,
};
use crate::ranking::{rank_by_distance, select_best, stations_within_radius};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: StatsAggregator,
    pub config: AppConfig,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/stations/stats", post(post_station_stats))
        .route("/stations/stats/batch", post(post_batch_stats))
        .route("/stations/nearby", post(post_nearby))
        .route("/recommendation", post(post_recommendation))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /stations/stats - Derive stats for one station.
///
/// # Request Body
///
/// ```json
/// {
///     "station": { "id": 1, "name": "Riyadh Central EV Station", ... },
///     "reports": [ { "id": 1, "station_id": 1, "status": "available", "rating": 5, ... } ],
///     "users": [ { "id": 1, "username": "sarah_ev", ... } ],
///     "favorites": [ { "user_id": 1, "station_id": 1 } ],
///     "user_id": 1
/// }
/// ```
///
/// Only `station` is required.
///
/// # Response
///
/// The station's fields plus `rating`, `review_count`, `availability`,
/// `reliability`, `is_favorite`, `last_reported` and up to five `reports`.
#[instrument(skip(state, request), fields(station_id = request.station.id))]
pub async fn post_station_stats(
    State(state): State<AppState>,
    Json(request): Json<StationStatsRequest>,
) -> Json<StationWithStats> {
    let stats = state.aggregator.build(
        &request.station,
        &request.reports,
        &request.users,
        &request.favorites,
        request.user_id,
    );

    info!(
        station_id = stats.station.id,
        review_count = stats.review_count,
        availability = stats.availability,
        reliability = stats.reliability,
        "Station stats computed"
    );

    Json(stats)
}

/// POST /stations/stats/batch - Derive stats for many stations at once.
///
/// Reports are matched to stations by `station_id`. The response keeps the
/// order of `stations`.
#[instrument(skip(state, request))]
pub async fn post_batch_stats(
    State(state): State<AppState>,
    Json(request): Json<BatchStatsRequest>,
) -> Json<Vec<StationWithStats>> {
    let stats = state.aggregator.build_all(
        &request.stations,
        &request.reports,
        &request.users,
        &request.favorites,
        request.user_id,
    );

    info!(
        station_count = stats.len(),
        report_count = request.reports.len(),
        "Batch stats computed"
    );

    Json(stats)
}

/// POST /recommendation - Pick the single best station.
///
/// # Response
///
/// ```json
/// {
///     "recommendation": { "station": { ... }, "score": 81.5 },
///     "candidates": 3
/// }
/// ```
///
/// `recommendation` is `null` when `stations` is empty.
#[instrument(skip(request))]
pub async fn post_recommendation(
    Json(request): Json<RecommendationRequest>,
) -> Json<RecommendationResponse> {
    let recommendation = select_best(&request.stations, request.location).map(|best| {
        Recommendation {
            station: best.station.clone(),
            score: best.score,
        }
    });

    info!(
        candidates = request.stations.len(),
        has_location = request.location.is_some(),
        station_id = recommendation.as_ref().map(|r| r.station.station.id),
        "Recommendation computed"
    );

    Json(RecommendationResponse {
        recommendation,
        candidates: request.stations.len(),
    })
}

/// POST /stations/nearby - Stations within a radius, nearest first.
///
/// `radius_km` defaults to the configured nearby radius.
#[instrument(skip(state, request))]
pub async fn post_nearby(
    State(state): State<AppState>,
    Json(request): Json<NearbyRequest>,
) -> Json<NearbyResponse> {
    let radius_km = request.radius_km.unwrap_or(state.config.nearby_radius_km);

    let within = stations_within_radius(&request.stations, request.location, radius_km);

    let stations: Vec<NearbyStation> = rank_by_distance(&within, request.location)
        .into_iter()
        .map(|ranked| NearbyStation {
            station: (*ranked.station).clone(),
            distance_km: ranked.distance_km,
            distance_text: format_distance(ranked.distance_km),
        })
        .collect();

    info!(
        candidates = request.stations.len(),
        matched = stations.len(),
        radius_km,
        "Nearby stations listed"
    );

    Json(NearbyResponse {
        radius_km,
        stations,
    })
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
