//! # Waypoint store
//!
//! Keeps the waypoints recorded by the operator during this session.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;

use comms_if::nav::{GeoCoord, Waypoint};
use util::session::Session;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Session relative path the waypoints are written to
pub const WAYPOINTS_PATH: &str = "waypoints/waypoints.json";

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Persists one coordinate per request.
pub trait WaypointStore: Send {
    fn save(&mut self, coord: GeoCoord);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Store which rewrites the session's waypoint file on every save.
///
/// The write itself happens on the session's save thread.
pub struct SessionWaypointStore {
    session: Session,
    waypoints: Vec<Waypoint>,
}

/// Store which only keeps waypoints in memory.
#[derive(Debug, Default)]
pub struct MemoryWaypointStore {
    pub waypoints: Vec<Waypoint>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SessionWaypointStore {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            waypoints: Vec::new(),
        }
    }
}

impl WaypointStore for SessionWaypointStore {
    fn save(&mut self, coord: GeoCoord) {
        self.waypoints.push(Waypoint::now(coord));

        info!(
            "Waypoint {} saved at ({}, {})",
            self.waypoints.len(),
            coord.lat_deg,
            coord.lon_deg
        );

        self.session.save(WAYPOINTS_PATH, self.waypoints.clone());
    }
}

impl WaypointStore for MemoryWaypointStore {
    fn save(&mut self, coord: GeoCoord) {
        self.waypoints.push(Waypoint::now(coord));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryWaypointStore::default();

        store.save(GeoCoord {
            lat_deg: 1.0,
            lon_deg: 2.0,
        });
        store.save(GeoCoord {
            lat_deg: 3.0,
            lon_deg: 4.0,
        });

        assert_eq!(store.waypoints.len(), 2);
        assert_eq!(store.waypoints[1].coord.lat_deg, 3.0);
        assert!(store.waypoints[0].recorded <= store.waypoints[1].recorded);
    }
}
