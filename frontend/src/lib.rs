use engine::{
    AnimationConfig, AnimationPhase, ClientConfig, DirectionAction, DurationEstimate,
    DurationPredictor, DurationTicket, Frame, FrameOutcome, GeometryProvider, Labels, MapSession,
    NavError, OrsClient, PredictorClient, RenderHost, Route, RouteSelection, RouteTicket,
};
use seed::{prelude::*, *};
use serde::Deserialize;
use serde_wasm_bindgen::to_value;
use shared::{to_string_hdms, Coordinate};
use wasm_bindgen::{
    prelude::{wasm_bindgen, JsValue},
    JsCast,
};

#[wasm_bindgen(module = "/openlayers_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map();
    #[wasm_bindgen(js_name = resetView)]
    fn reset_view();
    #[wasm_bindgen(js_name = showPopup)]
    fn show_popup(coord: JsValue, text: &str);
    #[wasm_bindgen(js_name = hidePopup)]
    fn hide_popup();
    #[wasm_bindgen(js_name = showSelection)]
    fn show_selection_js(start: JsValue, end: JsValue, click: JsValue);
    #[wasm_bindgen(js_name = showRoute)]
    fn show_route_js(lon_lat_pairs: JsValue);
    #[wasm_bindgen(js_name = clearRoute)]
    fn clear_route_js();
    #[wasm_bindgen(js_name = placeMarker)]
    fn place_marker_js(coord: JsValue);
    #[wasm_bindgen(js_name = renderMap)]
    fn render_map();
}

/// Service settings baked in at build time, e.g.
/// `ORS_API_KEY=... trunk build`.
fn client_config() -> ClientConfig {
    ClientConfig::from_lookup(|key| {
        match key {
            "DIRECTIONS_URL" => option_env!("DIRECTIONS_URL"),
            "ORS_API_KEY" => option_env!("ORS_API_KEY"),
            "PREDICTOR_URL" => option_env!("PREDICTOR_URL"),
            "REQUEST_TIMEOUT_SECS" => option_env!("REQUEST_TIMEOUT_SECS"),
            _ => None,
        }
        .map(str::to_string)
    })
}

#[derive(Clone)]
struct Clients {
    geometry: OrsClient,
    predictor: PredictorClient,
}

impl Clients {
    fn new(config: &ClientConfig) -> Result<Self, NavError> {
        Ok(Self {
            geometry: OrsClient::new(config)?,
            predictor: PredictorClient::new(config)?,
        })
    }
}

/// The OpenLayers map plus the two readouts rendered by `view`.
#[derive(Default)]
pub struct MapHost {
    frames_attached: bool,
    labels: Option<Labels>,
}

fn js_coord(coord: Option<Coordinate>) -> JsValue {
    coord
        .and_then(|c| to_value(&c).ok())
        .unwrap_or(JsValue::NULL)
}

impl MapHost {
    /// Readout half of `present`; a frame without labels keeps the last ones.
    fn labels_only(&mut self, frame: &Frame) {
        if let Some(labels) = &frame.labels {
            self.labels = Some(labels.clone());
        }
    }
}

impl RenderHost for MapHost {
    fn attach_frames(&mut self) {
        self.frames_attached = true;
    }

    fn detach_frames(&mut self) {
        self.frames_attached = false;
    }

    fn show_labels(&mut self, labels: &Labels) {
        self.labels = Some(labels.clone());
    }

    fn hide_labels(&mut self) {
        self.labels = None;
    }

    fn place_marker(&mut self, at: Option<Coordinate>) {
        place_marker_js(js_coord(at));
    }

    fn present(&mut self, frame: &Frame) {
        place_marker_js(js_coord(Some(frame.marker)));
        self.labels_only(frame);
    }

    fn show_route(&mut self, coordinates: &[Coordinate]) {
        let pairs: Vec<[f64; 2]> = coordinates.iter().map(|c| c.lon_lat()).collect();
        if let Ok(value) = to_value(&pairs) {
            show_route_js(value);
        }
    }

    fn clear_route(&mut self) {
        clear_route_js();
    }

    fn show_selection(&mut self, selection: RouteSelection, last_click: Option<Coordinate>) {
        show_selection_js(
            js_coord(selection.start),
            js_coord(selection.end),
            js_coord(last_click),
        );
    }

    fn request_redraw(&mut self) {
        render_map();
    }
}

pub struct Model {
    session: MapSession,
    host: MapHost,
    clients: Option<Clients>,
    frame_scheduled: bool,
}

pub enum Msg {
    MapClicked { lat: f64, lon: f64 },
    SetStart,
    SetEnd,
    ToggleDirection,
    RouteFetched(RouteTicket, Result<Route, NavError>),
    GetDuration,
    DurationFetched(DurationTicket, Result<DurationEstimate, NavError>),
    ToggleAnimation,
    Frame,
    ResetView,
}

#[derive(Deserialize)]
struct MapClickPayload {
    lat: f64,
    lon: f64,
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("map-click"), |event| {
        let event = event.dyn_into::<web_sys::CustomEvent>().ok()?;
        let payload: MapClickPayload = serde_wasm_bindgen::from_value(event.detail()).ok()?;
        web_sys::console::debug_1(
            &format!(
                "[frontend] map click lat={:.5} lon={:.5}",
                payload.lat, payload.lon
            )
            .into(),
        );
        Some(Msg::MapClicked {
            lat: payload.lat,
            lon: payload.lon,
        })
    }));

    let clients = match Clients::new(&client_config()) {
        Ok(clients) => Some(clients),
        Err(err) => {
            web_sys::console::error_1(&format!("[frontend] cannot build HTTP clients: {err}").into());
            None
        }
    };

    Model {
        session: MapSession::new(AnimationConfig::default()),
        host: MapHost::default(),
        clients,
        frame_scheduled: false,
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::MapClicked { lat, lon } => {
            let at = Coordinate { lat, lon };
            model.session.click(at, &mut model.host);
            if let Ok(value) = to_value(&at) {
                show_popup(value, &to_string_hdms(at));
            }
        }
        Msg::SetStart => {
            if let Err(err) = model.session.set_start(&mut model.host) {
                report(err);
            }
        }
        Msg::SetEnd => {
            if let Err(err) = model.session.set_end(&mut model.host) {
                report(err);
            }
        }
        Msg::ToggleDirection => {
            let clients = model.clients.clone();
            if direction_needs_service(clients.is_some(), model.session.is_directing()) {
                alert("Routing service is unavailable.");
                return;
            }
            match model.session.toggle_direction(&mut model.host) {
                Ok(DirectionAction::Requested(ticket)) => {
                    let Some(clients) = clients else {
                        return;
                    };
                    orders.perform_cmd(async move {
                        let result = clients.geometry.fetch_route(ticket.start, ticket.end).await;
                        Msg::RouteFetched(ticket, result)
                    });
                }
                Ok(DirectionAction::Cleared) => hide_popup(),
                Err(err) => report(err),
            }
        }
        Msg::RouteFetched(ticket, result) => {
            match model.session.route_fetched(&ticket, result, &mut model.host) {
                Ok(_) => hide_popup(),
                Err(err) => {
                    web_sys::console::error_1(
                        &format!("[frontend] error while fetching direction: {err}").into(),
                    );
                }
            }
        }
        Msg::GetDuration => {
            let Some(clients) = model.clients.clone() else {
                alert("Duration service is unavailable.");
                return;
            };
            match model.session.request_duration() {
                Ok((ticket, route)) => {
                    orders.perform_cmd(async move {
                        let result = clients.predictor.predict(&route).await;
                        Msg::DurationFetched(ticket, result)
                    });
                }
                Err(err) => report(err),
            }
        }
        Msg::DurationFetched(ticket, result) => {
            if let Err(err) = model.session.duration_fetched(&ticket, result, &mut model.host) {
                web_sys::console::error_1(
                    &format!("[frontend] problem with duration fetch: {err}").into(),
                );
            }
        }
        Msg::ToggleAnimation => {
            match model.session.toggle_animation(js_sys::Date::now(), &mut model.host) {
                Ok(AnimationPhase::Running) => schedule_frame(model, orders),
                Ok(AnimationPhase::Idle) => {}
                Err(err) => report(err),
            }
        }
        Msg::Frame => {
            model.frame_scheduled = false;
            if !model.host.frames_attached {
                return;
            }
            if model.session.frame(js_sys::Date::now(), &mut model.host) == FrameOutcome::Completed
            {
                web_sys::console::debug_1(&"[frontend] marker reached destination".into());
            }
            if model.host.frames_attached {
                schedule_frame(model, orders);
            }
        }
        Msg::ResetView => reset_view(),
    }
}

/// Queues the next animation step for the host's next render. At most one
/// step is queued at a time.
fn schedule_frame(model: &mut Model, orders: &mut impl Orders<Msg>) {
    if !model.frame_scheduled {
        model.frame_scheduled = true;
        orders.after_next_render(|_| Msg::Frame);
    }
}

fn alert(message: &str) {
    if window().alert_with_message(message).is_err() {
        web_sys::console::error_1(&format!("[frontend] {message}").into());
    }
}

/// Missing steps are the user's to fix, so they get an alert; anything else
/// is only logged.
fn report(err: NavError) {
    match err.precondition() {
        Some(missing) => alert(&missing.to_string()),
        None => web_sys::console::error_1(&format!("[frontend] {err}").into()),
    }
}

/// Clearing a shown direction works offline; only a new request needs the
/// routing service.
fn direction_needs_service(has_clients: bool, directing: bool) -> bool {
    !has_clients && !directing
}

fn direction_caption(directing: bool) -> &'static str {
    if directing {
        "Clear Direction"
    } else {
        "Get Direction"
    }
}

fn animation_caption(phase: AnimationPhase) -> &'static str {
    match phase {
        AnimationPhase::Running => "Stop Animation",
        AnimationPhase::Idle => "Start Animation",
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["app-container"],
        view_controls(model),
        view_labels(model.host.labels.as_ref()),
    ]
}

fn view_controls(model: &Model) -> Node<Msg> {
    let control = |label: &'static str, msg: fn() -> Msg| {
        button![
            label,
            ev(Ev::Click, move |event| {
                event.prevent_default();
                msg()
            }),
        ]
    };

    div![
        C!["controls"],
        control("↻", || Msg::ResetView),
        control("Set Start", || Msg::SetStart),
        control("Set End", || Msg::SetEnd),
        button![
            direction_caption(model.session.is_directing()),
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::ToggleDirection
            }),
        ],
        control("Get Duration", || Msg::GetDuration),
        button![
            animation_caption(model.session.phase()),
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::ToggleAnimation
            }),
        ],
    ]
}

fn view_labels(labels: Option<&Labels>) -> Node<Msg> {
    let visibility = if labels.is_some() { "visible" } else { "hidden" };
    let (distance, duration) = labels
        .map(|l| (l.distance.as_str(), l.duration.as_str()))
        .unwrap_or(("", ""));

    div![
        C!["labels"],
        span![
            id!["distance"],
            style! { St::Visibility => visibility },
            button!["Distance: ", code![distance]],
        ],
        span![
            id!["duration"],
            style! { St::Visibility => visibility },
            button!["Duration: ", code![duration]],
        ],
    ]
}

#[wasm_bindgen(start)]
pub fn start() {
    init_map();
    App::start("app", init, update, view);
}
