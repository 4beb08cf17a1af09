//! # Mode control module
//!
//! The mode coordinator takes decoded operator events, works out what each one means in the
//! currently selected function, applies it to the motion state within the configured envelopes
//! and produces the gait commands and side effect requests that result.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod state;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use comms_if::nav::GeoCoord;

use crate::input::{Bumper, DirectionalVector, FunctionButton};

pub use params::*;
pub use state::*;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Possible errors that can occur during ModeCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ModeCtrlError {
    #[error("Cannot load the mode control parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid envelope for {0}: lower limit {1} is above upper limit {2}")]
    InvalidEnvelope(&'static str, f64, f64),

    #[error("Invalid step for {0}: {1} (must be positive)")]
    InvalidStep(&'static str, f64),

    #[error("Invalid limit for {0}: {1} (must not be negative)")]
    InvalidLimit(&'static str, f64),

    #[error("Initial value for {0} ({1}) is outside its envelope")]
    InitialOutOfRange(&'static str, f64),

    #[error("Invalid full scale input for {0}: {1} (must be positive)")]
    InvalidFullScale(&'static str, f64),
}

/// A single operator event for the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModeEvent {
    Function(FunctionButton),
    Bumper(Bumper),

    /// Left trigger pull, 0 (released) upwards
    LeftTrigger(u16),

    /// Right trigger pull, 0 (released) upwards
    RightTrigger(u16),

    LeftStick(DirectionalVector),
    RightStick(DirectionalVector),
    Dpad(DirectionalVector),

    /// A new position fix from the GPS source
    GpsFix(GeoCoord),
}

/// A one-shot request that is executed outside the input context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SideEffect {
    /// Record the given coordinate as a waypoint
    SaveWaypoint(GeoCoord),

    /// Pulse the auxiliary actuator output
    FireActuator,
}

/// What the X button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XButtonAction {
    /// Request an actuator pulse, the selected function is unchanged
    FireActuator,

    /// Select the horizontal translation function
    TranslateHorizontal,
}

impl Default for XButtonAction {
    fn default() -> Self {
        XButtonAction::FireActuator
    }
}
