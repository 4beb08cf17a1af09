//! # Gait engine interface
//!
//! The gait engine turns the motion targets produced by the front end into leg trajectories and
//! servo angles. Every command is fire-and-forget: the engine keeps the latest value of each and
//! applies it on its own control cycle, nothing is acknowledged.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Commands accepted by a gait/inverse kinematics engine.
pub trait GaitEngine {
    /// Set the nominal gait speed and the height legs are lifted to during a step.
    fn set_gait_options(&mut self, speed: f64, leg_lift_height: f64);

    /// Select the stepping pattern.
    fn set_gait_type(&mut self, gait_type: GaitType);

    /// Set the travel vector.
    fn set_movement_vector(&mut self, speed: f64, travel_x: f64, travel_z: f64, rotation_y: f64);

    /// Set the body pose relative to the legs.
    fn set_body_position(&mut self, rot_x: f64, rot_z: f64, pos_x: f64, pos_z: f64, pos_y: f64);

    /// Enable or disable walking.
    fn set_movement_enabled(&mut self, enabled: bool);

    /// Start the engine's control cycle.
    fn start(&mut self);
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Leg stepping patterns, in the order the operator steps through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GaitType {
    Ripple12,
    Tripod8,
    TripleTripod12,
    TripleTripod16,
    Wave24,
}

/// A single command for the gait engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GaitCmd {
    GaitOptions {
        speed: f64,
        leg_lift_height: f64,
    },
    GaitType(GaitType),
    MovementVector {
        speed: f64,
        travel_x: f64,
        travel_z: f64,
        rotation_y: f64,
    },
    BodyPosition {
        rot_x: f64,
        rot_z: f64,
        pos_x: f64,
        pos_z: f64,
        pos_y: f64,
    },
    MovementEnabled(bool),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GaitType {
    /// All gait types in stepping order.
    pub const ALL: [GaitType; 5] = [
        GaitType::Ripple12,
        GaitType::Tripod8,
        GaitType::TripleTripod12,
        GaitType::TripleTripod16,
        GaitType::Wave24,
    ];

    /// Position of this gait in the stepping order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get the gait at the given position, or `None` if out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The next gait in the order, or `None` if this is the last one.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The previous gait in the order, or `None` if this is the first one.
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Short name used on the status display.
    pub fn short_name(self) -> &'static str {
        match self {
            GaitType::Ripple12 => "RPL12",
            GaitType::Tripod8 => "TRI8",
            GaitType::TripleTripod12 => "TT12",
            GaitType::TripleTripod16 => "TT16",
            GaitType::Wave24 => "WAV24",
        }
    }
}

impl Default for GaitType {
    fn default() -> Self {
        GaitType::TripleTripod12
    }
}

impl GaitCmd {
    /// Issue this command to the given engine.
    pub fn apply<E: GaitEngine + ?Sized>(&self, engine: &mut E) {
        match *self {
            GaitCmd::GaitOptions {
                speed,
                leg_lift_height,
            } => engine.set_gait_options(speed, leg_lift_height),
            GaitCmd::GaitType(t) => engine.set_gait_type(t),
            GaitCmd::MovementVector {
                speed,
                travel_x,
                travel_z,
                rotation_y,
            } => engine.set_movement_vector(speed, travel_x, travel_z, rotation_y),
            GaitCmd::BodyPosition {
                rot_x,
                rot_z,
                pos_x,
                pos_z,
                pos_y,
            } => engine.set_body_position(rot_x, rot_z, pos_x, pos_z, pos_y),
            GaitCmd::MovementEnabled(e) => engine.set_movement_enabled(e),
        }
    }
}
