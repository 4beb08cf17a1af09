//! # Input device reports
//!
//! The input device layer delivers one [`RawReport`] per device poll. Reports carry absolute axis
//! values exactly as the game controller provides them, the front end is responsible for removing
//! the neutral bias and quantising them.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::nav::GeoCoord;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Value reported by an absolute axis at rest.
pub const AXIS_NEUTRAL: u16 = 32768;

/// Largest value an absolute axis can report.
pub const AXIS_MAX: u16 = u16::MAX;

/// Largest valid dpad value, values above this are treated as centred.
pub const DPAD_MAX: u8 = 8;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single report from a game controller class device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReport {
    /// Dpad hat position, 0 is centred and 1..8 go clockwise from up.
    pub dpad: u8,

    /// Left stick horizontal axis, 0..65535
    pub left_x: u16,

    /// Left stick vertical axis, 0..65535, increasing downwards
    pub left_y: u16,

    /// Right stick horizontal axis, 0..65535
    pub right_x: u16,

    /// Right stick vertical axis, 0..65535, increasing downwards
    pub right_y: u16,

    /// Combined trigger axis, 0..65535.
    ///
    /// The left trigger pushes the axis above [`AXIS_NEUTRAL`], the right trigger below it.
    pub trigger: u16,

    /// Device IDs of all buttons active in this report
    pub buttons: Vec<u16>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A record consumed by the front end, either from a device or from a recorded script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputRecord {
    /// A report from the game controller
    Report(RawReport),

    /// A new fix from the GPS source
    GpsFix(GeoCoord),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RawReport {
    /// A report with all axes at rest and no buttons pressed.
    pub fn neutral() -> Self {
        Self {
            dpad: 0,
            left_x: AXIS_NEUTRAL,
            left_y: AXIS_NEUTRAL,
            right_x: AXIS_NEUTRAL,
            right_y: AXIS_NEUTRAL,
            trigger: AXIS_NEUTRAL,
            buttons: Vec::new(),
        }
    }
}

impl Default for RawReport {
    fn default() -> Self {
        Self::neutral()
    }
}
