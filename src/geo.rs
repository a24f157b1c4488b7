//! Great-circle distance between stations and observers.

use serde::{Deserialize, Serialize};

/// Mean earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Anything that sits at a fixed geographic position.
pub trait Located {
    fn coordinate(&self) -> Coordinate;
}

impl<T: Located + ?Sized> Located for &T {
    fn coordinate(&self) -> Coordinate {
        (**self).coordinate()
    }
}

impl Located for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

/// Haversine distance in kilometers.
///
/// Inputs are expected in `[-90, 90]` / `[-180, 180]`. Non-finite values
/// propagate into the result.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin() * (dlat / 2.0).sin()
        + lat1.cos() * lat2.cos() * (dlng / 2.0).sin() * (dlng / 2.0).sin();
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Short distance label: meters below one kilometer, otherwise kilometers
/// with one decimal.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{:.1} km", km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_distance() {
        let c0 = Coordinate::new(0.0, 0.0);
        assert_eq!(distance(c0, c0), 0.0);
        let c10 = Coordinate::new(10.0, 10.0);
        assert_eq!(distance(c10, c10), 0.0);
    }

    #[test]
    fn test_real_distance() {
        let riyadh = Coordinate::new(24.7136, 46.6753);
        let jeddah = Coordinate::new(21.5433, 39.1728);

        let d = distance(riyadh, jeddah);
        assert!(d > 820.0 && d < 870.0, "got {d}");
        // symmetric
        assert!((d - distance(jeddah, riyadh)).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.25), "250 m");
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(12.34), "12.3 km");
    }
}
