//! # Communications interface crate.
//!
//! Provides all common interfaces between the operator input front end and the equipment it
//! drives (gait engine, servo controller board, status display).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Raw reports delivered by the input device layer
pub mod input;

/// Gait engine commands and the engine interface
pub mod gait;

/// Geographic coordinates and waypoints
pub mod nav;

/// Wire formats for equipment (servo controller board, display)
pub mod eqpt;
