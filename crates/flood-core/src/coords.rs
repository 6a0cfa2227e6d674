//! Geographic coordinate type used by the map composer.
//! All coordinate math uses f64 for precision.

use serde::{Deserialize, Serialize};

/// A point on the map in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees, -90 to +90.
    pub lat: f64,
    /// Longitude in degrees, -180 to +180.
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Arithmetic mean of latitude and longitude, taken independently.
    /// Returns None for an empty iterator.
    pub fn mean<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLon>,
    {
        let (mut lat, mut lon, mut n) = (0.0f64, 0.0f64, 0usize);
        for p in points {
            lat += p.lat;
            lon += p.lon;
            n += 1;
        }
        if n == 0 {
            return None;
        }
        Some(Self::new(lat / n as f64, lon / n as f64))
    }

    /// `[lat, lon]` as Leaflet expects it.
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}
