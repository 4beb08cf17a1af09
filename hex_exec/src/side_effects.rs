//! # Side effect dispatcher
//!
//! Executes the one-shot requests raised by the mode coordinator away from the input context.
//! Waypoint saves are handled on the dispatcher thread. Actuator pulses each get a short lived
//! thread of their own so a pulse never holds up a save.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};

use comms_if::eqpt::ssc::SscCmd;

use crate::mode_ctrl::SideEffect;
use crate::serial::{SerialTransport, SscController};
use crate::waypoint::WaypointStore;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The auxiliary actuator output on the servo controller.
#[derive(Clone)]
pub struct Actuator {
    ssc: Arc<Mutex<SscController<Box<dyn SerialTransport>>>>,
    channel: u8,
    pulse_duration: Duration,
    pulsing: Arc<AtomicBool>,
}

/// Runs side effects received from the coordinator.
pub struct SideEffectDispatcher {
    actuator: Option<Actuator>,
    waypoints: Box<dyn WaypointStore>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Actuator {
    pub fn new(transport: Box<dyn SerialTransport>, channel: u8, pulse_duration: Duration) -> Self {
        Self {
            ssc: Arc::new(Mutex::new(SscController::new(transport))),
            channel,
            pulse_duration,
            pulsing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start a pulse. Returns `None` without doing anything if a pulse is already running.
    pub fn fire(&self) -> Option<JoinHandle<()>> {
        if self.pulsing.swap(true, Ordering::SeqCst) {
            warn!("Actuator already firing, request ignored");
            return None;
        }

        let actuator = self.clone();
        let spawned = thread::Builder::new()
            .name("actuator_pulse".into())
            .spawn(move || {
                actuator.pulse();
                actuator.pulsing.store(false, Ordering::SeqCst);
            });

        match spawned {
            Ok(h) => Some(h),
            Err(e) => {
                warn!("Cannot start the actuator pulse thread: {}", e);
                self.pulsing.store(false, Ordering::SeqCst);
                None
            }
        }
    }

    fn pulse(&self) {
        info!("Actuator channel {} high", self.channel);
        if let Err(e) = self.send(SscCmd::High(self.channel)) {
            warn!("Actuator pulse abandoned: {}", e);
            return;
        }

        thread::sleep(self.pulse_duration);

        info!("Actuator channel {} low", self.channel);
        if let Err(e) = self.send(SscCmd::Low(self.channel)) {
            warn!("Could not end the actuator pulse: {}", e);
        }
    }

    fn send(&self, cmd: SscCmd) -> Result<(), crate::serial::SerialError> {
        self.ssc
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send(cmd)
    }
}

impl SideEffectDispatcher {
    pub fn new(actuator: Option<Actuator>, waypoints: Box<dyn WaypointStore>) -> Self {
        Self {
            actuator,
            waypoints,
        }
    }

    /// Execute a single side effect.
    pub fn dispatch(&mut self, effect: SideEffect) {
        match effect {
            SideEffect::SaveWaypoint(c) => self.waypoints.save(c),
            SideEffect::FireActuator => match self.actuator {
                Some(ref a) => {
                    a.fire();
                }
                None => warn!("No actuator connected, fire request ignored"),
            },
        }
    }

    /// Execute side effects until the sender hangs up.
    pub fn run(mut self, receiver: Receiver<SideEffect>) {
        for effect in receiver.iter() {
            self.dispatch(effect);
        }

        info!("Side effect dispatcher stopped");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::serial::test_transport::MemoryTransport;
    use crate::waypoint::MemoryWaypointStore;
    use comms_if::nav::{GeoCoord, Waypoint};
    use std::sync::mpsc::channel;

    /// Store shared with the test
    struct SharedStore(Arc<Mutex<Vec<Waypoint>>>);

    impl WaypointStore for SharedStore {
        fn save(&mut self, coord: GeoCoord) {
            self.0.lock().unwrap().push(Waypoint::now(coord));
        }
    }

    #[test]
    fn test_actuator_pulse() {
        let transport = MemoryTransport::default();
        let written = transport.written.clone();
        let actuator = Actuator::new(Box::new(transport), 4, Duration::from_millis(20));

        let handle = actuator.fire().unwrap();

        // Overlapping fire is ignored
        assert!(actuator.fire().is_none());

        handle.join().unwrap();
        assert_eq!(
            *written.lock().unwrap(),
            vec![b"#4H\r".to_vec(), b"#4L\r".to_vec()]
        );

        // Can fire again once finished
        actuator.fire().unwrap().join().unwrap();
        assert_eq!(written.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_failed_pulse_releases_actuator() {
        let transport = MemoryTransport {
            fail: true,
            ..MemoryTransport::default()
        };
        let actuator = Actuator::new(Box::new(transport), 4, Duration::from_millis(1));

        actuator.fire().unwrap().join().unwrap();
        assert!(actuator.fire().is_some());
    }

    #[test]
    fn test_dispatcher_saves_waypoints() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = SideEffectDispatcher::new(None, Box::new(SharedStore(saved.clone())));

        let (tx, rx) = channel();
        let handle = thread::spawn(move || dispatcher.run(rx));

        let fix = GeoCoord {
            lat_deg: 52.2,
            lon_deg: 0.12,
        };
        tx.send(SideEffect::SaveWaypoint(fix)).unwrap();
        tx.send(SideEffect::FireActuator).unwrap();
        drop(tx);
        handle.join().unwrap();

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].coord, fix);
    }

    #[test]
    fn test_dispatch_directly() {
        let mut dispatcher = SideEffectDispatcher::new(None, Box::new(MemoryWaypointStore::default()));
        dispatcher.dispatch(SideEffect::FireActuator);
    }
}
