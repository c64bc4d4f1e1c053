//! Clients for the two remote services the map depends on.
//!
//! Both are traits so the route state can be driven by mocks in tests and by
//! the reqwest clients in the browser (reqwest uses `fetch` on wasm32).

use shared::{Coordinate, DirectionsResponse, PredictResponse};

use crate::config::ClientConfig;
use crate::error::NavError;
use crate::route::{DurationEstimate, Route};

/// Source of route geometry between two points.
#[allow(async_fn_in_trait)]
pub trait GeometryProvider {
    async fn fetch_route(&self, start: Coordinate, end: Coordinate) -> Result<Route, NavError>;
}

/// Source of travel time predictions for a route.
#[allow(async_fn_in_trait)]
pub trait DurationPredictor {
    async fn predict(&self, route: &Route) -> Result<DurationEstimate, NavError>;
}

fn http_client(config: &ClientConfig) -> Result<reqwest::Client, NavError> {
    let builder = reqwest::Client::builder();
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.timeout(config.timeout);
    #[cfg(target_arch = "wasm32")]
    let _ = config;
    Ok(builder.build()?)
}

/// OpenRouteService directions endpoint (`GET ?api_key=&start=lon,lat&end=lon,lat`).
#[derive(Clone)]
pub struct OrsClient {
    directions_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OrsClient {
    pub fn new(config: &ClientConfig) -> Result<Self, NavError> {
        Ok(Self {
            directions_url: config.directions_url.clone(),
            api_key: config.api_key.clone(),
            client: http_client(config)?,
        })
    }
}

fn lon_lat_param(coord: Coordinate) -> String {
    format!("{},{}", coord.lon, coord.lat)
}

impl GeometryProvider for OrsClient {
    async fn fetch_route(&self, start: Coordinate, end: Coordinate) -> Result<Route, NavError> {
        tracing::debug!(
            "requesting direction start=({:.5},{:.5}) end=({:.5},{:.5})",
            start.lon,
            start.lat,
            end.lon,
            end.lat
        );
        let response = self
            .client
            .get(self.directions_url.as_str())
            .query(&[
                ("api_key", self.api_key.clone()),
                ("start", lon_lat_param(start)),
                ("end", lon_lat_param(end)),
            ])
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        let directions: DirectionsResponse = serde_json::from_slice(&bytes)?;
        let route = Route::try_from(directions)?;
        tracing::debug!(
            "direction received: {} coordinates, {:.0} m",
            route.coordinates().len(),
            route.total_distance_m()
        );
        Ok(route)
    }
}

/// Travel time model served over HTTP (`POST {coords, distance}` → `{time}`).
#[derive(Clone)]
pub struct PredictorClient {
    predictor_url: String,
    client: reqwest::Client,
}

impl PredictorClient {
    pub fn new(config: &ClientConfig) -> Result<Self, NavError> {
        Ok(Self {
            predictor_url: config.predictor_url.clone(),
            client: http_client(config)?,
        })
    }
}

impl DurationPredictor for PredictorClient {
    async fn predict(&self, route: &Route) -> Result<DurationEstimate, NavError> {
        let body = route.predict_request();
        tracing::debug!(
            "requesting duration for {} coordinates, {:.1} km",
            body.coords.len(),
            body.distance
        );
        let response = self
            .client
            .post(self.predictor_url.as_str())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        let prediction: PredictResponse = serde_json::from_slice(&bytes)?;
        estimate_from(&prediction)
    }
}

fn estimate_from(prediction: &PredictResponse) -> Result<DurationEstimate, NavError> {
    let seconds = prediction.time.whole_seconds().ok_or_else(|| {
        NavError::MalformedResponse(format!("predicted time {:?} is not a number", prediction.time))
    })?;
    let predicted_seconds = u64::try_from(seconds).map_err(|_| {
        NavError::MalformedResponse(format!("predicted time {seconds} s is negative"))
    })?;
    tracing::debug!("duration received: {predicted_seconds} s");
    Ok(DurationEstimate { predicted_seconds })
}
