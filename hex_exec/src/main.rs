//! Main hexapod executable entry point.
//!
//! # Architecture
//!
//! The executable is split into the following execution contexts:
//!
//!     - Input: controller reports (from the device or a script) are decoded, filtered and
//!       handed to ModeCtrl one event at a time. Nothing on this thread blocks on I/O.
//!     - Gait control loop: applies the gait commands produced by ModeCtrl to the gait engine
//!       and keeps the status display up to date.
//!     - Side effects: saves waypoints and fires the actuator.
//!     - Device reader (device input only): reads the event device and forwards reports.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use structopt::StructOpt;

// Internal
use comms_if::input::InputRecord;
use hex_lib::{
    control_loop::ControlLoop,
    display,
    gait_client::{GaitClient, TraceGaitEngine},
    input::{device::DeviceReader, InputPipeline},
    mode_ctrl::{ModeCtrl, SideEffect},
    params::HexExecParams,
    serial::PortTransport,
    side_effects::{Actuator, SideEffectDispatcher},
    waypoint::SessionWaypointStore,
};
use util::{
    host,
    logger::{logger_init, parse_level},
    module::State,
    script_interpreter::{PendingRecords, ScriptInterpreter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// How often a script is polled for due records.
const SCRIPT_POLL_PERIOD: Duration = Duration::from_millis(10);

/// How long the input loop waits for a device record before checking the stop flag.
const DEVICE_POLL_PERIOD: Duration = Duration::from_millis(100);

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "hex_exec", about = "Hexapod operator input front end")]
struct Opt {
    /// Replay an input script instead of reading the controller
    #[structopt(short, long, parse(from_os_str))]
    script: Option<PathBuf>,

    /// Minimum log level (info, debug or trace)
    #[structopt(short, long, default_value = "info")]
    log_level: String,
}

/// Where input records come from.
enum InputSource {
    Script(ScriptInterpreter),
    Device(Receiver<InputRecord>),
}

/// Everything the input context hands its results to.
struct Outputs {
    gait_client: GaitClient,
    side_effect_sender: Sender<SideEffect>,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("hex_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let level = parse_level(&opt.log_level).wrap_err("Invalid log level")?;
    logger_init(level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Hexapod Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: HexExecParams =
        util::params::load("hex_exec.toml").wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    let mut mode_ctrl = ModeCtrl::default();
    mode_ctrl
        .init("mode_ctrl.toml", &session)
        .wrap_err("Failed to initialise ModeCtrl")?;
    info!("ModeCtrl init complete");

    let mut pipeline = InputPipeline::new(
        exec_params.input.deadzone_tolerance,
        exec_params.input.process_all_channels,
    );

    let stop = Arc::new(AtomicBool::new(false));

    // ---- INITIALISE INPUT SOURCE ----

    let mut device_handle: Option<JoinHandle<()>> = None;

    let mut input_source = match opt.script {
        Some(ref path) => {
            info!("Loading script from {:?}", path);

            let si = ScriptInterpreter::new(path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} records\n",
                si.get_duration(),
                si.get_num_records()
            );

            InputSource::Script(si)
        }
        None => {
            info!(
                "No script provided, reading the controller at {}\n",
                exec_params.device.path
            );

            let (record_tx, record_rx) = channel();
            let reader = DeviceReader::new(
                &exec_params.device.path,
                exec_params.device.retry_period(),
                exec_params.device.trigger_axis_max,
            );
            let reader_stop = stop.clone();
            device_handle = Some(
                thread::Builder::new()
                    .name("device_reader".into())
                    .spawn(move || reader.run(record_tx, reader_stop))
                    .wrap_err("Failed to start the device reader")?,
            );

            InputSource::Device(record_rx)
        }
    };

    // ---- INITIALISE GAIT CONTROL LOOP ----

    let (gait_tx, gait_rx) = channel();
    let gait_client = GaitClient::new(gait_tx);

    // Bring the engine in line with the initial state before any input
    for cmd in mode_ctrl.initial_cmds() {
        gait_client.send(cmd);
    }

    let status_display = display::open_or_log(
        exec_params.display.port.as_deref(),
        exec_params.display.baud_rate,
    );

    let control_loop = ControlLoop::new(
        Box::new(TraceGaitEngine::default()),
        gait_rx,
        mode_ctrl.shared_state(),
        status_display,
        exec_params.control_loop.period(),
    );
    let loop_stop = stop.clone();
    let control_handle = thread::Builder::new()
        .name("gait_control".into())
        .spawn(move || control_loop.run(loop_stop))
        .wrap_err("Failed to start the gait control loop")?;

    // ---- INITIALISE SIDE EFFECTS ----

    let actuator = match exec_params.serial.port {
        Some(ref port) => match PortTransport::open(port, exec_params.serial.baud_rate) {
            Ok(t) => {
                info!("Servo controller opened on {}", port);
                Some(Actuator::new(
                    Box::new(t),
                    exec_params.actuator.channel,
                    exec_params.actuator.pulse_duration(),
                ))
            }
            Err(e) => {
                warn!("{}, the actuator is unavailable", e);
                None
            }
        },
        None => {
            info!("No servo controller port set, the actuator is unavailable");
            None
        }
    };

    let (side_effect_tx, side_effect_rx) = channel();
    let dispatcher =
        SideEffectDispatcher::new(actuator, Box::new(SessionWaypointStore::new(session.clone())));
    let side_effect_handle = thread::Builder::new()
        .name("side_effects".into())
        .spawn(move || dispatcher.run(side_effect_rx))
        .wrap_err("Failed to start the side effect dispatcher")?;

    let outputs = Outputs {
        gait_client,
        side_effect_sender: side_effect_tx,
    };

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        match input_source {
            InputSource::Script(ref mut si) => match si.get_pending_records() {
                PendingRecords::None => thread::sleep(SCRIPT_POLL_PERIOD),
                PendingRecords::Some(records) => {
                    for record in records.iter() {
                        handle_record(record, &mut pipeline, &mut mode_ctrl, &outputs);
                    }
                }
                // Exit if end of script reached
                PendingRecords::EndOfScript => {
                    info!("End of input script reached, stopping");
                    break;
                }
            },
            InputSource::Device(ref rx) => match rx.recv_timeout(DEVICE_POLL_PERIOD) {
                Ok(record) => handle_record(&record, &mut pipeline, &mut mode_ctrl, &outputs),
                Err(RecvTimeoutError::Timeout) => (),
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Device reader stopped, ending execution");
                    break;
                }
            },
        }
    }

    // ---- SHUTDOWN ----

    // Closing the senders lets the control loop apply everything already queued before it stops
    drop(outputs);

    join("gait control loop", control_handle);
    join("side effect dispatcher", side_effect_handle);

    stop.store(true, Ordering::Relaxed);
    if device_handle.is_some() {
        // A blocked device read only returns on the next event, so the reader isn't joined
        debug!("Leaving the device reader to exit with the process");
    }

    session.exit();

    info!("End of execution");

    Ok(())
}

/// Run one input record through the pipeline and the coordinator.
fn handle_record(
    record: &InputRecord,
    pipeline: &mut InputPipeline,
    mode_ctrl: &mut ModeCtrl,
    outputs: &Outputs,
) {
    for event in pipeline.process_record(record) {
        match mode_ctrl.proc(&event) {
            Ok((output, report)) => {
                if report.clamped {
                    debug!("{:?} was limited by its envelope", event);
                }
                for cmd in output.gait_cmds {
                    outputs.gait_client.send(cmd);
                }
                for effect in output.side_effects {
                    if outputs.side_effect_sender.send(effect).is_err() {
                        warn!("Side effect dispatcher has stopped, dropping {:?}", effect);
                    }
                }
            }
            Err(e) => warn!("Error during ModeCtrl processing: {}", e),
        }
    }
}

fn join(name: &str, handle: JoinHandle<()>) {
    if handle.join().is_err() {
        warn!("The {} panicked", name);
    }
}
