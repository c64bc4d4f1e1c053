use shared::Coordinate;

use crate::config::AnimationConfig;
use crate::error::{NavError, Precondition};
use crate::route::{DurationEstimate, Route};
use crate::state::{Applied, DurationTicket, RouteSelection, RouteState, RouteTicket};
use crate::sync::{AnimationPhase, Animator, FrameOutcome, Labels, RenderHost};

/// What the direction button did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectionAction {
    /// A request was issued; fetch the route for this ticket.
    Requested(RouteTicket),
    /// The shown direction was cleared.
    Cleared,
}

/// Everything behind the map's buttons: selection, fetched data, animation
/// and the host that displays them.
#[derive(Debug)]
pub struct MapSession {
    state: RouteState,
    animator: Animator,
    last_click: Option<Coordinate>,
    directing: bool,
}

impl MapSession {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            state: RouteState::new(),
            animator: Animator::new(config),
            last_click: None,
            directing: false,
        }
    }

    pub fn state(&self) -> &RouteState {
        &self.state
    }

    pub fn last_click(&self) -> Option<Coordinate> {
        self.last_click
    }

    /// A direction is shown or on its way.
    pub fn is_directing(&self) -> bool {
        self.directing
    }

    pub fn phase(&self) -> AnimationPhase {
        self.animator.phase()
    }

    pub fn marker_position(&self) -> Option<Coordinate> {
        self.animator.last_position()
    }

    pub fn click(&mut self, at: Coordinate, host: &mut impl RenderHost) {
        self.last_click = Some(at);
        host.show_selection(self.state.selection(), self.last_click);
        host.request_redraw();
    }

    pub fn set_start(&mut self, host: &mut impl RenderHost) -> Result<Coordinate, NavError> {
        let point = self.last_click.ok_or(Precondition::NoPlaceChosen)?;
        self.state.set_start(point);
        self.sync_selection(host);
        Ok(point)
    }

    pub fn set_end(&mut self, host: &mut impl RenderHost) -> Result<Coordinate, NavError> {
        let point = self.last_click.ok_or(Precondition::NoPlaceChosen)?;
        self.state.set_end(point);
        self.sync_selection(host);
        Ok(point)
    }

    /// Requests a direction, or clears the one already shown.
    pub fn toggle_direction(
        &mut self,
        host: &mut impl RenderHost,
    ) -> Result<DirectionAction, NavError> {
        if self.directing {
            self.clear(host);
            return Ok(DirectionAction::Cleared);
        }
        let ticket = self.state.begin_route_request()?;
        self.directing = true;
        Ok(DirectionAction::Requested(ticket))
    }

    pub fn route_fetched(
        &mut self,
        ticket: &RouteTicket,
        result: Result<Route, NavError>,
        host: &mut impl RenderHost,
    ) -> Result<Applied, NavError> {
        match result {
            Ok(route) => {
                let start = route.start();
                let applied = self.state.apply_route(ticket, route);
                if applied == Applied::Current {
                    self.animator.clear(host);
                    if let Some(route) = self.state.route() {
                        host.show_route(route.coordinates());
                    }
                    host.place_marker(Some(start));
                    host.hide_labels();
                    host.request_redraw();
                }
                Ok(applied)
            }
            Err(err) => {
                if self.state.fail_route(ticket) == Applied::Current {
                    self.directing = false;
                }
                Err(err)
            }
        }
    }

    /// Issues a duration request for the shown route. The returned route is a
    /// copy the caller hands to the predictor.
    pub fn request_duration(&mut self) -> Result<(DurationTicket, Route), NavError> {
        if !self.directing {
            return Err(Precondition::NoDirection.into());
        }
        let (ticket, route) = self.state.begin_duration_request()?;
        Ok((ticket, route.clone()))
    }

    pub fn duration_fetched(
        &mut self,
        ticket: &DurationTicket,
        result: Result<DurationEstimate, NavError>,
        host: &mut impl RenderHost,
    ) -> Result<Applied, NavError> {
        match result {
            Ok(estimate) => {
                let applied = self.state.apply_duration(ticket, estimate);
                if applied == Applied::Current {
                    if let Some(route) = self.state.route() {
                        host.show_labels(&Labels::for_route(route, estimate));
                        host.request_redraw();
                    }
                }
                Ok(applied)
            }
            Err(err) => {
                self.state.fail_duration(ticket);
                Err(err)
            }
        }
    }

    /// Starts the marker, or stops it where it is.
    pub fn toggle_animation(
        &mut self,
        now_ms: f64,
        host: &mut impl RenderHost,
    ) -> Result<AnimationPhase, NavError> {
        if !self.directing {
            return Err(Precondition::NoDirection.into());
        }
        match self.animator.phase() {
            AnimationPhase::Running => {
                self.animator.stop(host);
            }
            AnimationPhase::Idle => {
                self.animator
                    .start(self.state.route(), self.state.estimate(), now_ms, host)?;
            }
        }
        Ok(self.animator.phase())
    }

    pub fn frame(&mut self, now_ms: f64, host: &mut impl RenderHost) -> FrameOutcome {
        self.animator
            .on_frame(self.state.route(), self.state.estimate(), now_ms, host)
    }

    fn sync_selection(&self, host: &mut impl RenderHost) {
        host.show_selection(self.state.selection(), self.last_click);
        host.request_redraw();
    }

    fn clear(&mut self, host: &mut impl RenderHost) {
        self.animator.clear(host);
        self.state.reset();
        self.last_click = None;
        self.directing = false;
        host.place_marker(None);
        host.clear_route();
        host.hide_labels();
        host.show_selection(RouteSelection::default(), None);
        host.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::tests::RecordingHost;

    fn point(lon: f64, lat: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    fn sample_route() -> Route {
        Route::new(
            vec![point(104.0, 30.6), point(104.05, 30.65), point(104.1, 30.7)],
            5000.0,
        )
        .unwrap()
    }

    fn session_with_endpoints(host: &mut RecordingHost) -> MapSession {
        let mut session = MapSession::new(AnimationConfig::default());
        session.click(point(104.0, 30.6), host);
        session.set_start(host).unwrap();
        session.click(point(104.1, 30.7), host);
        session.set_end(host).unwrap();
        session
    }

    fn directing_session(host: &mut RecordingHost) -> MapSession {
        let mut session = session_with_endpoints(host);
        let DirectionAction::Requested(ticket) = session.toggle_direction(host).unwrap() else {
            panic!("expected a request");
        };
        session
            .route_fetched(&ticket, Ok(sample_route()), host)
            .unwrap();
        session
    }

    #[test]
    fn set_start_requires_a_click() {
        let mut host = RecordingHost::default();
        let mut session = MapSession::new(AnimationConfig::default());
        let err = session.set_start(&mut host).unwrap_err();
        assert_eq!(err.precondition(), Some(Precondition::NoPlaceChosen));
        assert_eq!(session.state().selection().start, None);
    }

    #[test]
    fn clicks_feed_selection() {
        let mut host = RecordingHost::default();
        let session = session_with_endpoints(&mut host);
        let selection = session.state().selection();
        assert_eq!(selection.start, Some(point(104.0, 30.6)));
        assert_eq!(selection.end, Some(point(104.1, 30.7)));
        assert_eq!(host.selection, selection);
    }

    #[test]
    fn direction_without_endpoints_alerts_and_stays_idle() {
        let mut host = RecordingHost::default();
        let mut session = MapSession::new(AnimationConfig::default());
        let err = session.toggle_direction(&mut host).unwrap_err();
        assert_eq!(err.precondition(), Some(Precondition::StartNotSet));
        assert!(!session.is_directing());
    }

    #[test]
    fn fetched_route_is_drawn_with_marker_at_start() {
        let mut host = RecordingHost::default();
        let session = directing_session(&mut host);
        assert!(session.is_directing());
        assert_eq!(host.route.len(), 3);
        assert_eq!(host.marker, Some(point(104.0, 30.6)));
    }

    #[test]
    fn failed_fetch_leaves_direction_mode() {
        let mut host = RecordingHost::default();
        let mut session = session_with_endpoints(&mut host);
        let DirectionAction::Requested(ticket) = session.toggle_direction(&mut host).unwrap() else {
            panic!("expected a request");
        };
        let err = session
            .route_fetched(
                &ticket,
                Err(NavError::MalformedResponse("empty".into())),
                &mut host,
            )
            .unwrap_err();
        assert!(matches!(err, NavError::MalformedResponse(_)));
        assert!(!session.is_directing());
    }

    #[test]
    fn second_toggle_clears_everything() {
        let mut host = RecordingHost::default();
        let mut session = directing_session(&mut host);
        assert_eq!(
            session.toggle_direction(&mut host).unwrap(),
            DirectionAction::Cleared
        );
        assert!(!session.is_directing());
        assert!(session.state().route().is_none());
        assert_eq!(session.last_click(), None);
        assert!(host.route.is_empty());
        assert_eq!(host.marker, None);
        assert_eq!(host.labels, None);
        assert_eq!(host.selection, RouteSelection::default());
    }

    #[test]
    fn response_after_clear_is_ignored() {
        let mut host = RecordingHost::default();
        let mut session = session_with_endpoints(&mut host);
        let DirectionAction::Requested(ticket) = session.toggle_direction(&mut host).unwrap() else {
            panic!("expected a request");
        };
        session.toggle_direction(&mut host).unwrap();
        let applied = session
            .route_fetched(&ticket, Ok(sample_route()), &mut host)
            .unwrap();
        assert_eq!(applied, Applied::Stale);
        assert!(host.route.is_empty());
    }

    #[test]
    fn duration_shows_whole_route_labels() {
        let mut host = RecordingHost::default();
        let mut session = directing_session(&mut host);
        let (ticket, route) = session.request_duration().unwrap();
        assert_eq!(route, sample_route());
        session
            .duration_fetched(
                &ticket,
                Ok(DurationEstimate {
                    predicted_seconds: 300,
                }),
                &mut host,
            )
            .unwrap();
        assert_eq!(
            host.labels,
            Some(Labels {
                distance: "5.0 km".into(),
                duration: "5 min 0 s".into(),
            })
        );
    }

    #[test]
    fn duration_requires_direction() {
        let mut session = MapSession::new(AnimationConfig::default());
        let err = session.request_duration().unwrap_err();
        assert_eq!(err.precondition(), Some(Precondition::NoDirection));
    }

    #[test]
    fn animation_requires_duration() {
        let mut host = RecordingHost::default();
        let mut session = directing_session(&mut host);
        let err = session.toggle_animation(0.0, &mut host).unwrap_err();
        assert_eq!(err.precondition(), Some(Precondition::NoDuration));
        assert_eq!(session.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn animation_toggles_and_clear_stops_it() {
        let mut host = RecordingHost::default();
        let mut session = directing_session(&mut host);
        let (ticket, _) = session.request_duration().unwrap();
        session
            .duration_fetched(
                &ticket,
                Ok(DurationEstimate {
                    predicted_seconds: 300,
                }),
                &mut host,
            )
            .unwrap();

        assert_eq!(
            session.toggle_animation(0.0, &mut host).unwrap(),
            AnimationPhase::Running
        );
        assert!(matches!(
            session.frame(2_000.0, &mut host),
            FrameOutcome::Moved(_)
        ));
        assert_eq!(
            session.toggle_animation(2_500.0, &mut host).unwrap(),
            AnimationPhase::Idle
        );
        assert_eq!(host.marker, session.marker_position());

        session.toggle_animation(3_000.0, &mut host).unwrap();
        session.toggle_direction(&mut host).unwrap();
        assert_eq!(session.phase(), AnimationPhase::Idle);
        assert!(!host.frames_attached);
        assert_eq!(session.frame(4_000.0, &mut host), FrameOutcome::Idle);
    }
}
