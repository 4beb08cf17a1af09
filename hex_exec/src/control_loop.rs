//! # Gait control loop
//!
//! Runs on its own thread at a fixed cadence. Each cycle it applies every gait command queued by
//! the input context, in order, and refreshes the status display whenever the published motion
//! state has changed.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, trace, warn};

use comms_if::gait::{GaitCmd, GaitEngine};

use crate::display::{self, DisplayDevice};
use crate::motion_state::{MotionState, SharedMotionState};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The control loop and everything it drives.
pub struct ControlLoop {
    engine: Box<dyn GaitEngine + Send>,
    cmds: Receiver<GaitCmd>,
    state: SharedMotionState,
    display: Box<dyn DisplayDevice>,
    period: Duration,
    last_shown: Option<MotionState>,
    num_cycles: u64,
}

/// Outcome of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// Number of commands applied this cycle
    Running(usize),

    /// The input context has hung up
    Disconnected,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ControlLoop {
    pub fn new(
        engine: Box<dyn GaitEngine + Send>,
        cmds: Receiver<GaitCmd>,
        state: SharedMotionState,
        display: Box<dyn DisplayDevice>,
        period: Duration,
    ) -> Self {
        Self {
            engine,
            cmds,
            state,
            display,
            period,
            last_shown: None,
            num_cycles: 0,
        }
    }

    /// Run a single cycle.
    pub fn cycle(&mut self) -> CycleStatus {
        let mut num_applied = 0;
        let mut disconnected = false;

        loop {
            match self.cmds.try_recv() {
                Ok(cmd) => {
                    trace!("Applying {:?}", cmd);
                    cmd.apply(self.engine.as_mut());
                    num_applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        let snapshot = self.state.snapshot();
        if self.last_shown != Some(snapshot) {
            display::show_status(self.display.as_mut(), &snapshot);
            self.last_shown = Some(snapshot);
        }

        self.num_cycles += 1;

        if disconnected {
            CycleStatus::Disconnected
        } else {
            CycleStatus::Running(num_applied)
        }
    }

    /// Start the engine and cycle until `stop` is set or the input context hangs up.
    pub fn run(mut self, stop: Arc<AtomicBool>) {
        self.engine.start();

        info!("Gait control loop started");

        while !stop.load(Ordering::Relaxed) {
            let cycle_start_instant = Instant::now();

            if self.cycle() == CycleStatus::Disconnected {
                info!("Gait command sender closed");
                break;
            }

            // ---- CYCLE MANAGEMENT ----

            let cycle_dur = Instant::now() - cycle_start_instant;

            match self.period.checked_sub(cycle_dur) {
                Some(d) => thread::sleep(d),
                None => warn!(
                    "Control cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - self.period.as_secs_f64()
                ),
            }
        }

        display::show_message(self.display.as_mut(), display::STOPPED_MESSAGE);

        info!("Gait control loop stopped after {} cycles", self.num_cycles);
    }
}
