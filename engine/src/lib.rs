//! Route animation core: selection and fetched route state, the animation
//! clock, the position projector and the presentation sync that feeds a map
//! host.

pub mod clock;
pub mod config;
pub mod error;
pub mod projector;
pub mod providers;
pub mod route;
pub mod session;
pub mod state;
pub mod sync;

pub use config::{AnimationConfig, ClientConfig};
pub use error::{NavError, Precondition};
pub use providers::{DurationPredictor, GeometryProvider, OrsClient, PredictorClient};
pub use route::{DurationEstimate, Route, RouteError};
pub use session::{DirectionAction, MapSession};
pub use state::{Applied, DurationTicket, RouteSelection, RouteState, RouteTicket};
pub use sync::{AnimationPhase, Animator, Frame, FrameOutcome, Labels, RenderHost};
