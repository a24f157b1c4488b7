//! Chargepulse - derived quality signals for crowd-reported EV charging stations.
//!
//! # Overview
//!
//! Users report what they see at a charging station: whether a charger is
//! free, how satisfied they were, and any issues. Chargepulse turns the raw
//! report stream of a station into time-sensitive signals (rating,
//! availability, reliability, last-reported text) and ranks candidate
//! stations to pick a single recommendation.
//!
//! All computations are pure functions of their inputs and a reference
//! timestamp. Stats are never cached: they are rebuilt from the full report
//! history on every read.
//!
//! # Modules
//!
//! - [`model`]: Reports, stations, users and the derived [`model::StationWithStats`] view
//! - [`aggregation`]: Rating, availability, reliability and last-reported computation
//! - [`ranking`]: Recommendation scoring, best-station selection and distance ordering
//! - [`geo`]: Haversine distance
//! - [`clock`]: Time source for the aggregator
//! - [`config`]: Service configuration from the environment
//! - [`api`]: HTTP API handlers

pub mod aggregation;
pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod geo;
pub mod model;
pub mod ranking;
