//! JSON shapes exchanged with the directions service and the duration predictor.

use serde::{Deserialize, Serialize};

/// `[lon, lat]` pair as found in GeoJSON.
pub type LonLat = [f64; 2];

/// GeoJSON feature collection returned by the directions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub features: Vec<DirectionsFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsFeature {
    pub properties: FeatureProperties,
    pub geometry: LineGeometry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub summary: RouteSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Meters. Omitted by the service for zero-length routes.
    #[serde(default)]
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineGeometry {
    pub coordinates: Vec<LonLat>,
}

impl DirectionsResponse {
    pub fn first_feature(&self) -> Option<&DirectionsFeature> {
        self.features.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub coords: Vec<LonLat>,
    /// Kilometers.
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub time: PredictedTime,
}

/// The predictor answers either `"300"` or `300`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictedTime {
    Seconds(f64),
    Text(String),
}

impl PredictedTime {
    /// Whole seconds, read the way a lenient integer parser would: a number is
    /// truncated, a string contributes its leading (optionally signed) digits.
    pub fn whole_seconds(&self) -> Option<i64> {
        match self {
            PredictedTime::Seconds(value) if value.is_finite() => Some(value.trunc() as i64),
            PredictedTime::Seconds(_) => None,
            PredictedTime::Text(text) => leading_integer(text),
        }
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    rest[..digits_end].parse::<i64>().ok().map(|value| sign * value)
}
