use shared::Coordinate;

use crate::route::{DurationEstimate, Route};

/// Position and remaining figures at a given progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub coordinate: Coordinate,
    pub remaining_distance_km: f64,
    pub remaining_duration_seconds: u64,
}

pub fn project(route: &Route, estimate: DurationEstimate, progress: f64) -> Projection {
    let remaining = 1.0 - progress;
    let remaining_duration = (estimate.predicted_seconds as f64 * remaining).round();
    Projection {
        coordinate: route.coordinate_at(progress),
        remaining_distance_km: remaining_distance_km(route, progress),
        remaining_duration_seconds: if remaining_duration > 0.0 {
            remaining_duration as u64
        } else {
            0
        },
    }
}

pub fn remaining_distance_km(route: &Route, progress: f64) -> f64 {
    (route.total_distance_km() * (1.0 - progress)).max(0.0)
}

/// Lets label updates through only when progress has moved by a minimum arc
/// length since the last update.
#[derive(Debug, Clone)]
pub struct MilestoneGate {
    threshold: f64,
    last_milestone: f64,
}

impl MilestoneGate {
    /// `step_m` meters expressed as a fraction of the route distance. A route
    /// without a known distance lets every update through.
    pub fn new(route: &Route, step_m: f64) -> Self {
        let total_m = route.total_distance_m();
        Self {
            threshold: if total_m > 0.0 { step_m / total_m } else { 0.0 },
            last_milestone: 0.0,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn reset(&mut self) {
        self.last_milestone = 0.0;
    }

    pub fn pass(&mut self, progress: f64) -> bool {
        if progress - self.last_milestone >= self.threshold {
            self.last_milestone = progress;
            true
        } else {
            false
        }
    }
}
