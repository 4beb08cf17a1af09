//! # Operator input
//!
//! Turns controller reports into mode coordinator events: reports are decoded, sticks quantised,
//! unchanged channels filtered out and the remaining changes ordered by priority.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod decoder;
pub mod device;
mod filter;
mod pipeline;
mod vector;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use decoder::*;
pub use filter::*;
pub use pipeline::*;
pub use vector::*;
