//! # Navigation interface types

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A geographic coordinate from the GPS source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    /// Latitude
    ///
    /// Units: degrees, north positive
    pub lat_deg: f64,

    /// Longitude
    ///
    /// Units: degrees, east positive
    pub lon_deg: f64,
}

/// A coordinate the operator asked to be remembered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub coord: GeoCoord,

    /// When the waypoint was recorded
    pub recorded: DateTime<Utc>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Waypoint {
    /// Record a waypoint at the given coordinate, timestamped now.
    pub fn now(coord: GeoCoord) -> Self {
        Self {
            coord,
            recorded: Utc::now(),
        }
    }
}
