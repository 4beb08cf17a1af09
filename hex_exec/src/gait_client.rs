//! # Gait engine client
//!
//! [`GaitClient`] is the input context's view of the gait engine: every call is queued for the
//! control loop and returns immediately. [`TraceGaitEngine`] is an engine that keeps the latest
//! value of each command and logs it, used when no inverse kinematics solver is linked in.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::mpsc::Sender;

use log::{debug, info, warn};
use serde::Serialize;

use comms_if::gait::{GaitCmd, GaitEngine, GaitType};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Forwards gait engine calls to the control loop.
#[derive(Debug, Clone)]
pub struct GaitClient {
    sender: Sender<GaitCmd>,
}

/// Latest value of every gait engine command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TraceGaitEngine {
    pub started: bool,
    pub gait_options: Option<(f64, f64)>,
    pub gait_type: Option<GaitType>,
    pub movement_vector: Option<(f64, f64, f64, f64)>,
    pub body_position: Option<(f64, f64, f64, f64, f64)>,
    pub movement_enabled: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GaitClient {
    pub fn new(sender: Sender<GaitCmd>) -> Self {
        Self { sender }
    }

    /// Queue a command for the engine.
    pub fn send(&self, cmd: GaitCmd) {
        if self.sender.send(cmd).is_err() {
            warn!("Gait control loop has stopped, dropping {:?}", cmd);
        }
    }
}

impl GaitEngine for GaitClient {
    fn set_gait_options(&mut self, speed: f64, leg_lift_height: f64) {
        self.send(GaitCmd::GaitOptions {
            speed,
            leg_lift_height,
        });
    }

    fn set_gait_type(&mut self, gait_type: GaitType) {
        self.send(GaitCmd::GaitType(gait_type));
    }

    fn set_movement_vector(&mut self, speed: f64, travel_x: f64, travel_z: f64, rotation_y: f64) {
        self.send(GaitCmd::MovementVector {
            speed,
            travel_x,
            travel_z,
            rotation_y,
        });
    }

    fn set_body_position(&mut self, rot_x: f64, rot_z: f64, pos_x: f64, pos_z: f64, pos_y: f64) {
        self.send(GaitCmd::BodyPosition {
            rot_x,
            rot_z,
            pos_x,
            pos_z,
            pos_y,
        });
    }

    fn set_movement_enabled(&mut self, enabled: bool) {
        self.send(GaitCmd::MovementEnabled(enabled));
    }

    /// The control loop starts its engine itself.
    fn start(&mut self) {}
}

impl GaitEngine for TraceGaitEngine {
    fn set_gait_options(&mut self, speed: f64, leg_lift_height: f64) {
        debug!("Gait options: speed {}, leg lift {}", speed, leg_lift_height);
        self.gait_options = Some((speed, leg_lift_height));
    }

    fn set_gait_type(&mut self, gait_type: GaitType) {
        debug!("Gait type: {:?}", gait_type);
        self.gait_type = Some(gait_type);
    }

    fn set_movement_vector(&mut self, speed: f64, travel_x: f64, travel_z: f64, rotation_y: f64) {
        debug!(
            "Movement vector: speed {}, x {}, z {}, rot y {}",
            speed, travel_x, travel_z, rotation_y
        );
        self.movement_vector = Some((speed, travel_x, travel_z, rotation_y));
    }

    fn set_body_position(&mut self, rot_x: f64, rot_z: f64, pos_x: f64, pos_z: f64, pos_y: f64) {
        debug!(
            "Body position: rot ({}, {}), pos ({}, {}, {})",
            rot_x, rot_z, pos_x, pos_z, pos_y
        );
        self.body_position = Some((rot_x, rot_z, pos_x, pos_z, pos_y));
    }

    fn set_movement_enabled(&mut self, enabled: bool) {
        info!("Gait engine movement enabled: {}", enabled);
        self.movement_enabled = enabled;
    }

    fn start(&mut self) {
        info!("Trace gait engine started");
        self.started = true;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_client_queues_in_order() {
        let (tx, rx) = channel();
        let mut client = GaitClient::new(tx);

        client.set_movement_vector(0.0, 0.0, 0.0, 0.0);
        client.set_movement_enabled(false);

        let cmds: Vec<GaitCmd> = rx.try_iter().collect();
        assert_eq!(
            cmds,
            vec![
                GaitCmd::MovementVector {
                    speed: 0.0,
                    travel_x: 0.0,
                    travel_z: 0.0,
                    rotation_y: 0.0
                },
                GaitCmd::MovementEnabled(false)
            ]
        );
    }

    #[test]
    fn test_client_survives_closed_loop() {
        let (tx, rx) = channel();
        drop(rx);

        let mut client = GaitClient::new(tx);
        client.set_gait_type(GaitType::Wave24);
    }

    #[test]
    fn test_trace_keeps_latest() {
        let mut engine = TraceGaitEngine::default();

        GaitCmd::GaitOptions {
            speed: 70.0,
            leg_lift_height: 30.0,
        }
        .apply(&mut engine);
        GaitCmd::GaitOptions {
            speed: 75.0,
            leg_lift_height: 30.0,
        }
        .apply(&mut engine);
        GaitCmd::MovementEnabled(true).apply(&mut engine);

        assert_eq!(engine.gait_options, Some((75.0, 30.0)));
        assert!(engine.movement_enabled);
        assert_eq!(engine.gait_type, None);
    }
}
