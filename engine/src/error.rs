use thiserror::Error;

use crate::route::RouteError;

/// A step the user has to complete before the requested action makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("No place has been chosen! Please click somewhere first.")]
    NoPlaceChosen,
    #[error("Start not set! Please click somewhere then set it as start.")]
    StartNotSet,
    #[error("End not set! Please click somewhere then set it as end.")]
    EndNotSet,
    #[error("No direction yet! Please get a direction first.")]
    NoDirection,
    #[error("No duration estimate yet! Please get the duration first.")]
    NoDuration,
}

#[derive(Debug, Error)]
pub enum NavError {
    #[error("{0}")]
    PreconditionUnmet(#[from] Precondition),
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl NavError {
    /// Errors the user can fix by completing a missing step; the UI shows these
    /// as a blocking alert instead of only logging them.
    pub fn precondition(&self) -> Option<Precondition> {
        match self {
            NavError::PreconditionUnmet(missing) => Some(*missing),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for NavError {
    fn from(err: serde_json::Error) -> Self {
        NavError::MalformedResponse(err.to_string())
    }
}

impl From<RouteError> for NavError {
    fn from(err: RouteError) -> Self {
        NavError::MalformedResponse(err.to_string())
    }
}
