use shared::{Coordinate, DirectionsResponse, LonLat, PredictRequest};
use thiserror::Error;

const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("directions response contains no route feature")]
    NoFeature,
    #[error("route needs at least 2 coordinates, got {0}")]
    TooFewCoordinates(usize),
    #[error("route distance must be a non-negative number of meters, got {0}")]
    InvalidDistance(f64),
    #[error("coordinate {0} is not a finite lon/lat pair")]
    InvalidCoordinate(usize),
}

/// Driving path between the selected endpoints, as returned by the directions
/// service.
///
/// Cumulative arc lengths are computed once at construction so that sampling a
/// position during animation is a binary search rather than a walk over every
/// segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    coordinates: Vec<Coordinate>,
    total_distance_m: f64,
    cumulative_km: Vec<f64>,
}

impl Route {
    pub fn new(coordinates: Vec<Coordinate>, total_distance_m: f64) -> Result<Self, RouteError> {
        if coordinates.len() < 2 {
            return Err(RouteError::TooFewCoordinates(coordinates.len()));
        }
        if !total_distance_m.is_finite() || total_distance_m < 0.0 {
            return Err(RouteError::InvalidDistance(total_distance_m));
        }
        if let Some(idx) = coordinates
            .iter()
            .position(|c| !c.lat.is_finite() || !c.lon.is_finite())
        {
            return Err(RouteError::InvalidCoordinate(idx));
        }

        let mut cumulative_km = Vec::with_capacity(coordinates.len());
        let mut total = 0.0;
        cumulative_km.push(total);
        for pair in coordinates.windows(2) {
            total += haversine_km(pair[0], pair[1]);
            cumulative_km.push(total);
        }

        Ok(Self {
            coordinates,
            total_distance_m,
            cumulative_km,
        })
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_m / 1000.0
    }

    pub fn start(&self) -> Coordinate {
        self.coordinates[0]
    }

    pub fn end(&self) -> Coordinate {
        self.coordinates[self.coordinates.len() - 1]
    }

    /// Length of the drawn geometry, which may differ slightly from the
    /// distance reported by the service.
    pub fn geometry_length_km(&self) -> f64 {
        self.cumulative_km[self.cumulative_km.len() - 1]
    }

    /// Point at `fraction` of the geometry's arc length. The fraction is
    /// clamped to [0, 1].
    pub fn coordinate_at(&self, fraction: f64) -> Coordinate {
        let total = self.geometry_length_km();
        if total <= 0.0 || fraction.is_nan() {
            return self.start();
        }
        let target = fraction.clamp(0.0, 1.0) * total;

        let next = self.cumulative_km.partition_point(|&d| d <= target);
        if next == 0 {
            return self.start();
        }
        if next >= self.coordinates.len() {
            return self.end();
        }
        let prev = next - 1;
        let segment = self.cumulative_km[next] - self.cumulative_km[prev];
        let t = (target - self.cumulative_km[prev]) / segment;
        self.coordinates[prev].interpolate(self.coordinates[next], t)
    }

    pub fn lon_lat_pairs(&self) -> Vec<LonLat> {
        self.coordinates.iter().map(|c| c.lon_lat()).collect()
    }

    /// Body for the duration predictor: the same coordinate sequence plus the
    /// distance in kilometers.
    pub fn predict_request(&self) -> PredictRequest {
        PredictRequest {
            coords: self.lon_lat_pairs(),
            distance: self.total_distance_km(),
        }
    }
}

impl TryFrom<DirectionsResponse> for Route {
    type Error = RouteError;

    fn try_from(response: DirectionsResponse) -> Result<Self, Self::Error> {
        let feature = response
            .features
            .into_iter()
            .next()
            .ok_or(RouteError::NoFeature)?;
        let coordinates = feature
            .geometry
            .coordinates
            .into_iter()
            .map(Coordinate::from_lon_lat)
            .collect();
        Route::new(coordinates, feature.properties.summary.distance)
    }
}

/// Predicted travel time for one specific route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationEstimate {
    pub predicted_seconds: u64,
}

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
