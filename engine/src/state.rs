use shared::Coordinate;

use crate::error::{NavError, Precondition};
use crate::providers::{DurationPredictor, GeometryProvider};
use crate::route::{DurationEstimate, Route};

/// Endpoints chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteSelection {
    pub start: Option<Coordinate>,
    pub end: Option<Coordinate>,
}

/// Handle for one in-flight direction request. Only the most recently issued
/// ticket may populate the state; `reset()` invalidates every ticket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteTicket {
    generation: u64,
    pub start: Coordinate,
    pub end: Coordinate,
}

/// Handle for one in-flight duration request, bound to the route it was
/// issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationTicket {
    route_generation: u64,
    request: u64,
}

/// Whether a fetched result was stored or dropped for being superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

/// Selection, route and duration estimate shared by the animator and the
/// projector. Every mutation goes through `&mut self`, so readers never see a
/// half-cleared state.
#[derive(Debug, Default)]
pub struct RouteState {
    selection: RouteSelection,
    route: Option<Route>,
    estimate: Option<DurationEstimate>,
    generation: u64,
    route_generation: u64,
    pending_route: Option<u64>,
    duration_requests: u64,
    pending_duration: Option<DurationTicket>,
}

impl RouteState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> RouteSelection {
        self.selection
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn estimate(&self) -> Option<DurationEstimate> {
        self.estimate
    }

    pub fn is_route_pending(&self) -> bool {
        self.pending_route.is_some()
    }

    pub fn is_duration_pending(&self) -> bool {
        self.pending_duration.is_some()
    }

    pub fn set_start(&mut self, point: Coordinate) {
        self.selection.start = Some(point);
    }

    pub fn set_end(&mut self, point: Coordinate) {
        self.selection.end = Some(point);
    }

    /// Clears the selection, route and estimate, and orphans every in-flight
    /// request.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.selection = RouteSelection::default();
        self.route = None;
        self.estimate = None;
        self.pending_route = None;
        self.pending_duration = None;
        tracing::info!("route state reset");
    }

    /// Validates the selection and issues a ticket for a direction request.
    /// Nothing is sent when an endpoint is missing.
    pub fn begin_route_request(&mut self) -> Result<RouteTicket, NavError> {
        let start = self.selection.start.ok_or(Precondition::StartNotSet)?;
        let end = self.selection.end.ok_or(Precondition::EndNotSet)?;
        self.generation += 1;
        self.pending_route = Some(self.generation);
        Ok(RouteTicket {
            generation: self.generation,
            start,
            end,
        })
    }

    pub fn is_current_route(&self, ticket: &RouteTicket) -> bool {
        self.pending_route == Some(ticket.generation)
    }

    /// Stores a fetched route if `ticket` is still the latest request. A new
    /// route drops any estimate made for the previous one.
    pub fn apply_route(&mut self, ticket: &RouteTicket, route: Route) -> Applied {
        if !self.is_current_route(ticket) {
            tracing::debug!(
                "discarding direction for superseded request #{}",
                ticket.generation
            );
            return Applied::Stale;
        }
        tracing::info!(
            "route #{} stored: {} coordinates, {:.0} m",
            ticket.generation,
            route.coordinates().len(),
            route.total_distance_m()
        );
        self.route = Some(route);
        self.estimate = None;
        self.route_generation = ticket.generation;
        self.pending_route = None;
        self.pending_duration = None;
        Applied::Current
    }

    /// Marks a failed request as settled so the state is no longer pending.
    pub fn fail_route(&mut self, ticket: &RouteTicket) -> Applied {
        if !self.is_current_route(ticket) {
            return Applied::Stale;
        }
        self.pending_route = None;
        Applied::Current
    }

    pub fn begin_duration_request(&mut self) -> Result<(DurationTicket, &Route), NavError> {
        let route_generation = self.route_generation;
        let route = self.route.as_ref().ok_or(Precondition::NoDirection)?;
        self.duration_requests += 1;
        let ticket = DurationTicket {
            route_generation,
            request: self.duration_requests,
        };
        self.pending_duration = Some(ticket);
        Ok((ticket, route))
    }

    pub fn is_current_duration(&self, ticket: &DurationTicket) -> bool {
        self.route.is_some()
            && self.route_generation == ticket.route_generation
            && self.pending_duration == Some(*ticket)
    }

    pub fn apply_duration(&mut self, ticket: &DurationTicket, estimate: DurationEstimate) -> Applied {
        if !self.is_current_duration(ticket) {
            tracing::debug!(
                "discarding duration estimate #{} for a replaced route",
                ticket.request
            );
            return Applied::Stale;
        }
        tracing::info!("duration estimate stored: {} s", estimate.predicted_seconds);
        self.estimate = Some(estimate);
        self.pending_duration = None;
        Applied::Current
    }

    pub fn fail_duration(&mut self, ticket: &DurationTicket) -> Applied {
        if !self.is_current_duration(ticket) {
            return Applied::Stale;
        }
        self.pending_duration = None;
        Applied::Current
    }

    /// Fetches and stores a route for the current selection.
    pub async fn request_route<G: GeometryProvider>(
        &mut self,
        provider: &G,
    ) -> Result<Route, NavError> {
        let ticket = self.begin_route_request()?;
        match provider.fetch_route(ticket.start, ticket.end).await {
            Ok(route) => {
                let applied = self.apply_route(&ticket, route.clone());
                debug_assert_eq!(applied, Applied::Current);
                Ok(route)
            }
            Err(err) => {
                tracing::warn!("error while fetching direction: {err}");
                self.fail_route(&ticket);
                Err(err)
            }
        }
    }

    /// Fetches and stores a duration estimate for the current route.
    pub async fn request_duration<P: DurationPredictor>(
        &mut self,
        predictor: &P,
    ) -> Result<DurationEstimate, NavError> {
        let (ticket, route) = self.begin_duration_request()?;
        match predictor.predict(route).await {
            Ok(estimate) => {
                let applied = self.apply_duration(&ticket, estimate);
                debug_assert_eq!(applied, Applied::Current);
                Ok(estimate)
            }
            Err(err) => {
                tracing::warn!("problem with duration fetch: {err}");
                self.fail_duration(&ticket);
                Err(err)
            }
        }
    }
}
