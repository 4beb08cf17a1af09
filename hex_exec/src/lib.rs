//! # Hexapod library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to access items defined
//! inside the hexapod executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Gait control loop - applies queued gait commands to the engine at a fixed rate
pub mod control_loop;

/// Status display - SparkFun serial LCD or the log
pub mod display;

/// Gait engine client - queues gait commands for the control loop
pub mod gait_client;

/// Operator input - decoding, quantising and filtering of controller reports
pub mod input;

/// Mode control module - turns operator events into motion targets and gait commands
pub mod mode_ctrl;

/// Motion state shared between the input context and the control loop
pub mod motion_state;

/// Executable parameters
pub mod params;

/// Serial transport and servo controller commands
pub mod serial;

/// Side effect dispatcher - waypoint saves and actuator pulses
pub mod side_effects;

/// Waypoint store
pub mod waypoint;
