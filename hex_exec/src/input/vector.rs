//! # Stick vector quantisation
//!
//! Sticks are reduced to one of eight compass directions and a magnitude between 0 and
//! [`MAX_MAGNITUDE`], with a deadzone around the centre removed.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use util::maths::rem_euclid;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Largest magnitude a quantised vector can have.
pub const MAX_MAGNITUDE: u16 = 10000;

/// Half range of a centred stick axis.
pub const AXIS_HALF_RANGE: f64 = 32768.0;

/// Default radius around the stick centre treated as zero.
pub const DEFAULT_DEADZONE_TOLERANCE: f64 = 7000.0;

/// Two magnitudes closer than this are considered the same.
pub const MAGNITUDE_TOLERANCE: u16 = 5;

/// Angular width of each octant.
const SECTOR_WIDTH_DEG: f64 = 45.0;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A compass direction, clockwise from up, or `None` when centred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionOctant {
    None = 0,
    Up = 1,
    UpRight = 2,
    Right = 3,
    DownRight = 4,
    Down = 5,
    DownLeft = 6,
    Left = 7,
    UpLeft = 8,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A quantised stick position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionalVector {
    pub direction: DirectionOctant,

    /// Distance from the centre, 0..=10000
    pub magnitude: u16,
}

/// Converts centred stick samples into directional vectors.
#[derive(Debug, Clone, Copy)]
pub struct VectorQuantizer {
    deadzone_tolerance: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DirectionOctant {
    /// All octants in ordinal order.
    pub const ALL: [DirectionOctant; 9] = [
        DirectionOctant::None,
        DirectionOctant::Up,
        DirectionOctant::UpRight,
        DirectionOctant::Right,
        DirectionOctant::DownRight,
        DirectionOctant::Down,
        DirectionOctant::DownLeft,
        DirectionOctant::Left,
        DirectionOctant::UpLeft,
    ];

    /// Get the octant with the given ordinal, or `None` if there isn't one.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl Default for DirectionOctant {
    fn default() -> Self {
        DirectionOctant::None
    }
}

impl DirectionalVector {
    pub const ZERO: DirectionalVector = DirectionalVector {
        direction: DirectionOctant::None,
        magnitude: 0,
    };

    pub fn new(direction: DirectionOctant, magnitude: u16) -> Self {
        Self {
            direction,
            magnitude,
        }
    }

    /// True if `other` points the same way with a magnitude less than [`MAGNITUDE_TOLERANCE`]
    /// away, in which case it carries no new information.
    pub fn is_unchanged_from(&self, other: &DirectionalVector) -> bool {
        self.direction == other.direction
            && self.magnitude.abs_diff(other.magnitude) < MAGNITUDE_TOLERANCE
    }
}

impl Default for DirectionalVector {
    fn default() -> Self {
        Self::ZERO
    }
}

impl VectorQuantizer {
    /// Create a quantizer with the given deadzone tolerance, in raw axis units.
    ///
    /// The tolerance is limited to `[0, 32767]`.
    pub fn new(deadzone_tolerance: f64) -> Self {
        Self {
            deadzone_tolerance: deadzone_tolerance.max(0.0).min(AXIS_HALF_RANGE - 1.0),
        }
    }

    /// Quantise a centred stick sample.
    ///
    /// Samples inside the deadzone have a zero magnitude and always point `None`.
    pub fn quantize(&self, x: f64, y: f64) -> DirectionalVector {
        let magnitude = self.magnitude(x, y);

        if magnitude == 0 {
            return DirectionalVector::ZERO;
        }

        DirectionalVector {
            direction: coords_to_direction(x, y),
            magnitude,
        }
    }

    /// Magnitude of a centred stick sample with the deadzone removed.
    pub fn magnitude(&self, x: f64, y: f64) -> u16 {
        let norm = x.hypot(y);

        if norm < self.deadzone_tolerance {
            return 0;
        }

        // Scale so the deadzone is removed and the edge of the range is MAX_MAGNITUDE
        let scaled = (norm - self.deadzone_tolerance) / (AXIS_HALF_RANGE - self.deadzone_tolerance)
            * MAX_MAGNITUDE as f64;

        scaled.min(MAX_MAGNITUDE as f64) as u16
    }
}

impl Default for VectorQuantizer {
    fn default() -> Self {
        Self::new(DEFAULT_DEADZONE_TOLERANCE)
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Octant a centred stick sample points into, from its raw angle.
///
/// The vertical axis increases downwards, as reported by the device. A sample exactly at the
/// origin has an angle of zero and so resolves to `Right`.
pub fn coords_to_direction(x: f64, y: f64) -> DirectionOctant {
    angle_to_direction(y.atan2(x).to_degrees())
}

/// Octant for an angle in degrees, measured from the positive x axis towards positive y.
///
/// Each octant covers a half open 45 degree span `[centre - 22.5, centre + 22.5)`, so an angle
/// exactly on a boundary belongs to the next octant clockwise.
pub fn angle_to_direction(angle_deg: f64) -> DirectionOctant {
    // Shift into 0..360, centre each octant on its compass point and put up at zero
    let orientation = rem_euclid(angle_deg + 180.0 + 22.5 + 270.0, 360.0);

    let sector = (orientation / SECTOR_WIDTH_DEG) as u8 % 8;

    DirectionOctant::from_ordinal(sector + 1).unwrap_or(DirectionOctant::None)
}
