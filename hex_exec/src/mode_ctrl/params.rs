//! Parameters structure for ModeCtrl

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use comms_if::gait::GaitType;

use super::{ModeCtrlError, XButtonAction};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters for mode control.
///
/// Lengths are in the gait engine's units, rotations in degrees.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {
    // ---- GAIT OPTIONS ----
    pub gait_speed_lower_limit: f64,
    pub gait_speed_upper_limit: f64,
    pub gait_speed_step: f64,
    pub initial_gait_speed: f64,

    pub leg_lift_height_lower_limit: f64,
    pub leg_lift_height_upper_limit: f64,
    pub leg_lift_height_step: f64,
    pub initial_leg_lift_height: f64,

    /// Gait selected when movement is enabled, and at startup
    pub start_gait_type: GaitType,

    // ---- TRAVEL ----
    /// Largest sideways travel, reached at full trigger
    pub travel_length_x_limit: f64,

    /// Largest forward/back travel for the forward and pure up/down stick directions
    pub travel_length_z_upper_limit: f64,

    /// Largest travel for the backward diagonal stick directions
    pub travel_length_z_lower_limit: f64,

    pub travel_rotation_y_limit: f64,

    // ---- BODY POSE ----
    /// Largest horizontal body offset from centre
    pub body_offset_limit: f64,

    /// Largest body tilt
    pub body_rotation_limit: f64,

    pub body_height_lower_limit: f64,
    pub body_height_upper_limit: f64,
    pub body_height_step: f64,
    pub initial_body_height: f64,

    // ---- INPUTS ----
    /// Trigger value mapped to the full travel limit. Larger values are clamped.
    pub trigger_in_max: f64,

    /// Stick magnitude mapped to the full limit
    pub stick_in_max: f64,

    pub x_button_action: XButtonAction,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            gait_speed_lower_limit: 20.0,
            gait_speed_upper_limit: 200.0,
            gait_speed_step: 5.0,
            initial_gait_speed: 70.0,

            leg_lift_height_lower_limit: 30.0,
            leg_lift_height_upper_limit: 160.0,
            leg_lift_height_step: 5.0,
            initial_leg_lift_height: 30.0,

            start_gait_type: GaitType::TripleTripod12,

            travel_length_x_limit: 70.0,
            travel_length_z_upper_limit: 160.0,
            travel_length_z_lower_limit: 90.0,
            travel_rotation_y_limit: 3.0,

            body_offset_limit: 30.0,
            body_rotation_limit: 8.0,

            body_height_lower_limit: 5.0,
            body_height_upper_limit: 90.0,
            body_height_step: 5.0,
            initial_body_height: 20.0,

            trigger_in_max: 10000.0,
            stick_in_max: 10000.0,

            x_button_action: XButtonAction::default(),
        }
    }
}

impl Params {
    /// Check that every envelope is usable.
    pub fn validate(&self) -> Result<(), ModeCtrlError> {
        check_envelope(
            "gait speed",
            self.gait_speed_lower_limit,
            self.gait_speed_upper_limit,
            self.gait_speed_step,
            self.initial_gait_speed,
        )?;
        check_envelope(
            "leg lift height",
            self.leg_lift_height_lower_limit,
            self.leg_lift_height_upper_limit,
            self.leg_lift_height_step,
            self.initial_leg_lift_height,
        )?;
        check_envelope(
            "body height",
            self.body_height_lower_limit,
            self.body_height_upper_limit,
            self.body_height_step,
            self.initial_body_height,
        )?;

        for &(name, limit) in &[
            ("travel length x", self.travel_length_x_limit),
            ("travel length z upper", self.travel_length_z_upper_limit),
            ("travel length z lower", self.travel_length_z_lower_limit),
            ("travel rotation y", self.travel_rotation_y_limit),
            ("body offset", self.body_offset_limit),
            ("body rotation", self.body_rotation_limit),
        ] {
            if !(limit >= 0.0) {
                return Err(ModeCtrlError::InvalidLimit(name, limit));
            }
        }

        for &(name, full_scale) in &[
            ("trigger", self.trigger_in_max),
            ("stick", self.stick_in_max),
        ] {
            if !(full_scale > 0.0) {
                return Err(ModeCtrlError::InvalidFullScale(name, full_scale));
            }
        }

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn check_envelope(
    name: &'static str,
    lower: f64,
    upper: f64,
    step: f64,
    initial: f64,
) -> Result<(), ModeCtrlError> {
    // Written so that NaN fails every check
    if !(lower <= upper) {
        return Err(ModeCtrlError::InvalidEnvelope(name, lower, upper));
    }
    if !(step > 0.0) {
        return Err(ModeCtrlError::InvalidStep(name, step));
    }
    if !(initial >= lower && initial <= upper) {
        return Err(ModeCtrlError::InitialOutOfRange(name, initial));
    }

    Ok(())
}
