//! # Report decoder
//!
//! Splits a [`RawReport`] into the semantic channels the mode coordinator works with.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use comms_if::input::{RawReport, AXIS_NEUTRAL, DPAD_MAX};

use super::vector::{DirectionOctant, DirectionalVector, VectorQuantizer, MAX_MAGNITUDE};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Offset between device button IDs and button indices.
pub const BUTTON_ID_OFFSET: i32 = 5;

/// Number of function buttons (A, B, X, Y) at the start of the button indices
const NUM_FUNCTION_BUTTONS: i32 = 4;

/// End (exclusive) of the bumper button indices
const BUMPER_INDEX_END: i32 = 6;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Buttons handled by the function button handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionButton {
    A,
    B,
    X,
    Y,
    Back,
    Start,

    /// An index routed to the function handler with no meaning, carries the button index.
    Other(i32),
}

/// The shoulder buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bumper {
    /// Decrease the active parameter
    Left,

    /// Increase the active parameter
    Right,
}

/// A classified button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonClass {
    Function(FunctionButton),
    Bumper(Bumper),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// All channels of a report after decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedReport {
    pub dpad: DirectionalVector,
    pub left_stick: DirectionalVector,
    pub right_stick: DirectionalVector,

    /// Left trigger, 0..32768
    pub left_trigger: u16,

    /// Right trigger, 0..32768
    pub right_trigger: u16,

    /// Device IDs of all active buttons
    pub buttons: Vec<u16>,
}

/// Decodes raw reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportDecoder {
    quantizer: VectorQuantizer,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ReportDecoder {
    pub fn new(quantizer: VectorQuantizer) -> Self {
        Self { quantizer }
    }

    pub fn decode(&self, report: &RawReport) -> DecodedReport {
        let (left_trigger, right_trigger) = split_trigger(report.trigger);

        DecodedReport {
            dpad: dpad_vector(report.dpad),
            left_stick: self
                .quantizer
                .quantize(centre(report.left_x), centre(report.left_y)),
            right_stick: self
                .quantizer
                .quantize(centre(report.right_x), centre(report.right_y)),
            left_trigger,
            right_trigger,
            buttons: report.buttons.clone(),
        }
    }
}

impl ButtonClass {
    /// Classify a device button ID.
    pub fn from_id(id: u16) -> Self {
        let index = id as i32 - BUTTON_ID_OFFSET;

        if index < NUM_FUNCTION_BUTTONS {
            ButtonClass::Function(match index {
                0 => FunctionButton::A,
                1 => FunctionButton::B,
                2 => FunctionButton::X,
                3 => FunctionButton::Y,
                i => FunctionButton::Other(i),
            })
        } else if index < BUMPER_INDEX_END {
            ButtonClass::Bumper(match index {
                4 => Bumper::Left,
                _ => Bumper::Right,
            })
        } else {
            ButtonClass::Function(match index {
                6 => FunctionButton::Back,
                7 => FunctionButton::Start,
                i => FunctionButton::Other(i),
            })
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Split the combined trigger axis into the (left, right) trigger values.
pub fn split_trigger(raw: u16) -> (u16, u16) {
    let offset = raw as i32 - AXIS_NEUTRAL as i32;

    (offset.max(0) as u16, (-offset).max(0) as u16)
}

/// The dpad as a vector, full scale whenever it's pressed.
pub fn dpad_vector(raw: u8) -> DirectionalVector {
    let direction = match raw {
        r if r > DPAD_MAX => DirectionOctant::None,
        r => DirectionOctant::from_ordinal(r).unwrap_or(DirectionOctant::None),
    };

    match direction {
        DirectionOctant::None => DirectionalVector::ZERO,
        d => DirectionalVector::new(d, MAX_MAGNITUDE),
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Remove the neutral bias from an axis.
fn centre(raw: u16) -> f64 {
    raw as f64 - AXIS_NEUTRAL as f64
}
