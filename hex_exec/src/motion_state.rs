//! # Motion state
//!
//! The latest motion targets for the gait engine. The mode coordinator is the only writer, the
//! control loop and the status display read it. Both sides take a whole copy of the record under
//! the lock so nobody ever sees half an update.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use comms_if::gait::GaitType;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Which motion dimension the bumpers and left stick currently edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectedFunction {
    GaitSpeed,
    LegHeight,
    TranslateHorizontal,
    Translate3D,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The motion targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub gait_speed: f64,
    pub leg_lift_height: f64,

    // ---- TRAVEL ----
    pub travel_length_x: f64,
    pub travel_length_z: f64,
    pub travel_rotation_y: f64,

    // ---- BODY POSE ----
    pub body_pos_x: f64,
    pub body_pos_z: f64,

    /// Body height
    pub body_pos_y: f64,

    pub body_rot_x1: f64,
    pub body_rot_z1: f64,

    pub gait_type: GaitType,
    pub selected_function: SelectedFunction,
    pub movement_enabled: bool,
}

/// Handle to the motion state shared between threads.
#[derive(Debug, Clone, Default)]
pub struct SharedMotionState {
    inner: Arc<Mutex<MotionState>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SelectedFunction {
    fn default() -> Self {
        SelectedFunction::GaitSpeed
    }
}

impl SelectedFunction {
    /// Short name used on the status display.
    pub fn short_name(self) -> &'static str {
        match self {
            SelectedFunction::GaitSpeed => "SPD",
            SelectedFunction::LegHeight => "LEG",
            SelectedFunction::TranslateHorizontal => "TRH",
            SelectedFunction::Translate3D => "T3D",
        }
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            gait_speed: 70.0,
            leg_lift_height: 30.0,
            travel_length_x: 0.0,
            travel_length_z: 0.0,
            travel_rotation_y: 0.0,
            body_pos_x: 0.0,
            body_pos_z: 0.0,
            body_pos_y: 20.0,
            body_rot_x1: 0.0,
            body_rot_z1: 0.0,
            gait_type: GaitType::default(),
            selected_function: SelectedFunction::default(),
            movement_enabled: false,
        }
    }
}

impl SharedMotionState {
    pub fn new(initial: MotionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Replace the whole record.
    pub fn publish(&self, state: MotionState) {
        // The record is Copy so a poisoned lock still holds a complete value
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Copy of the whole record.
    pub fn snapshot(&self) -> MotionState {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;

    #[test]
    fn test_defaults() {
        let s = MotionState::default();

        assert_eq!(s.gait_speed, 70.0);
        assert_eq!(s.body_pos_y, 20.0);
        assert_eq!(s.gait_type, GaitType::TripleTripod12);
        assert_eq!(s.selected_function, SelectedFunction::GaitSpeed);
        assert!(!s.movement_enabled);
    }

    #[test]
    fn test_publish_is_whole_record() {
        let shared = SharedMotionState::default();
        let writer = shared.clone();

        let handle = thread::spawn(move || {
            for i in 0..1000 {
                let v = i as f64;
                writer.publish(MotionState {
                    gait_speed: v,
                    leg_lift_height: v,
                    body_pos_y: v,
                    ..MotionState::default()
                });
            }
        });

        for _ in 0..1000 {
            let s = shared.snapshot();
            if s.gait_speed != 70.0 {
                assert_eq!(s.gait_speed, s.leg_lift_height);
                assert_eq!(s.gait_speed, s.body_pos_y);
            }
        }

        handle.join().unwrap();
        assert_eq!(shared.snapshot().gait_speed, 999.0);
    }

    #[test]
    fn test_poisoned_lock_recovers() {
        let shared = SharedMotionState::default();
        let poisoner = shared.clone();

        let _ = thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        shared.publish(MotionState {
            gait_speed: 100.0,
            ..MotionState::default()
        });
        assert_eq!(shared.snapshot().gait_speed, 100.0);
    }
}
