//! Keeps the animated marker and the remaining-distance / remaining-duration
//! labels in step with the animation clock.

use shared::{format_distance_km, format_time, Coordinate};

use crate::clock::{AnimationClock, Tick};
use crate::config::AnimationConfig;
use crate::error::{NavError, Precondition};
use crate::projector::{project, MilestoneGate, Projection};
use crate::route::{DurationEstimate, Route};
use crate::state::RouteSelection;

/// Text of the two readouts next to the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub distance: String,
    pub duration: String,
}

impl Labels {
    pub fn from_projection(projection: &Projection) -> Self {
        Self {
            distance: format_distance_km(projection.remaining_distance_km),
            duration: format_time(projection.remaining_duration_seconds),
        }
    }

    /// Whole-route figures, shown as soon as an estimate is known.
    pub fn for_route(route: &Route, estimate: DurationEstimate) -> Self {
        Self {
            distance: format_distance_km(route.total_distance_km()),
            duration: format_time(estimate.predicted_seconds),
        }
    }

    pub fn arrived() -> Self {
        Self {
            distance: format_distance_km(0.0),
            duration: format_time(0),
        }
    }
}

/// One animation frame. Marker and labels travel together so the host never
/// shows a moved marker next to labels from another frame. `labels` is `None`
/// when the readouts did not change.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub marker: Coordinate,
    pub labels: Option<Labels>,
}

/// The map widget and its surrounding readouts, as seen by the animation.
///
/// Implementations must only record what to draw and schedule drawing through
/// `request_redraw`; nothing is drawn synchronously.
pub trait RenderHost {
    /// Start delivering per-frame callbacks.
    fn attach_frames(&mut self);
    fn detach_frames(&mut self);
    fn show_labels(&mut self, labels: &Labels);
    fn hide_labels(&mut self);
    /// Static marker; `None` hides it.
    fn place_marker(&mut self, at: Option<Coordinate>);
    fn present(&mut self, frame: &Frame);
    fn show_route(&mut self, coordinates: &[Coordinate]);
    fn clear_route(&mut self);
    fn show_selection(&mut self, selection: RouteSelection, last_click: Option<Coordinate>);
    fn request_redraw(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No animation is running.
    Idle,
    Moved(Projection),
    /// The marker reached the end on this frame. The animation is idle again.
    Completed,
}

/// Drives the marker from the clock. Owns no route data: every call borrows
/// the route and estimate it needs.
#[derive(Debug, Clone)]
pub struct Animator {
    config: AnimationConfig,
    clock: AnimationClock,
    gate: Option<MilestoneGate>,
    last_position: Option<Coordinate>,
}

impl Animator {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            clock: AnimationClock::new(&config),
            config,
            gate: None,
            last_position: None,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        if self.clock.is_running() {
            AnimationPhase::Running
        } else {
            AnimationPhase::Idle
        }
    }

    /// Where the marker was last drawn.
    pub fn last_position(&self) -> Option<Coordinate> {
        self.last_position
    }

    pub fn progress(&self) -> f64 {
        self.clock.progress()
    }

    /// Begins a traversal from the start of the route.
    pub fn start(
        &mut self,
        route: Option<&Route>,
        estimate: Option<DurationEstimate>,
        now_ms: f64,
        host: &mut impl RenderHost,
    ) -> Result<(), NavError> {
        let route = route.ok_or(Precondition::NoDirection)?;
        let estimate = estimate.ok_or(Precondition::NoDuration)?;
        if self.clock.is_running() {
            return Ok(());
        }

        self.clock.start(now_ms);
        self.gate = Some(MilestoneGate::new(route, self.config.label_step_m));
        let projection = project(route, estimate, 0.0);
        self.last_position = Some(projection.coordinate);

        // The moving marker is drawn per frame; hide the static one meanwhile.
        host.place_marker(None);
        host.present(&Frame {
            marker: projection.coordinate,
            labels: Some(Labels::from_projection(&projection)),
        });
        host.attach_frames();
        host.request_redraw();
        tracing::info!("animation started");
        Ok(())
    }

    pub fn on_frame(
        &mut self,
        route: Option<&Route>,
        estimate: Option<DurationEstimate>,
        now_ms: f64,
        host: &mut impl RenderHost,
    ) -> FrameOutcome {
        let (Some(route), Some(estimate)) = (route, estimate) else {
            if self.clock.is_running() {
                tracing::warn!("route vanished during animation, stopping");
                self.stop(host);
            }
            return FrameOutcome::Idle;
        };

        match self.clock.tick(now_ms) {
            Tick::Idle => FrameOutcome::Idle,
            Tick::Completed(_) => {
                self.last_position = Some(route.end());
                host.detach_frames();
                host.place_marker(self.last_position);
                host.show_labels(&Labels::arrived());
                host.request_redraw();
                tracing::info!("animation completed");
                FrameOutcome::Completed
            }
            Tick::Advanced(progress) => {
                let projection = project(route, estimate, progress);
                let labels = self
                    .gate
                    .as_mut()
                    .is_some_and(|gate| gate.pass(progress))
                    .then(|| Labels::from_projection(&projection));
                self.last_position = Some(projection.coordinate);
                host.present(&Frame {
                    marker: projection.coordinate,
                    labels,
                });
                host.request_redraw();
                FrameOutcome::Moved(projection)
            }
        }
    }

    /// Halts the traversal and leaves the marker where it was last drawn.
    pub fn stop(&mut self, host: &mut impl RenderHost) -> Option<Coordinate> {
        if self.clock.is_running() {
            let progress = self.clock.stop();
            host.detach_frames();
            host.place_marker(self.last_position);
            host.request_redraw();
            tracing::info!("animation stopped at progress {progress:.3}");
        }
        self.last_position
    }

    /// Stops and forgets the marker position, for when the route goes away.
    pub fn clear(&mut self, host: &mut impl RenderHost) {
        if self.clock.is_running() {
            self.clock.stop();
            host.detach_frames();
        }
        self.gate = None;
        self.last_position = None;
    }
}
