use serde::{Deserialize, Serialize};

pub mod format;
pub mod wire;

pub use format::{format_distance_km, format_time, to_string_hdms};
pub use wire::{
    DirectionsFeature, DirectionsResponse, LineGeometry, LonLat, PredictRequest, PredictResponse,
    PredictedTime,
};

/// Geographic point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn from_lon_lat([lon, lat]: LonLat) -> Self {
        Self { lat, lon }
    }

    /// `[lon, lat]`, the axis order both remote services speak.
    pub fn lon_lat(self) -> LonLat {
        [self.lon, self.lat]
    }

    pub fn interpolate(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }
}
