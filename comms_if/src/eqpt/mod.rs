//! # Equipment Interface
//!
//! This module defines the wire formats used to talk to equipment attached over serial links.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

/// SparkFun serial 16x2 character display framing
pub mod lcd;

/// SSC-32 servo controller board ASCII commands
pub mod ssc;
