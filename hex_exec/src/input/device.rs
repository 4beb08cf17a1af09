//! # Linux event device reader
//!
//! Reads kernel input events from a `/dev/input/event*` node through the `evdev` crate and
//! assembles them into [`RawReport`]s, one per `SYN_REPORT`.
//!
//! Buttons are given the device IDs the front end expects (A = 5 through Start = 12), the sticks
//! are moved into `0..=65535` and the two analogue triggers are folded into the single combined
//! trigger axis.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use evdev::{Device, EventType, InputEvent};
use log::{debug, info, warn};
use thiserror::Error;

use comms_if::input::{InputRecord, RawReport, AXIS_MAX, AXIS_NEUTRAL};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const SYN_REPORT: u16 = 0;

// Absolute axes
const ABS_X: u16 = 0x00;
const ABS_Y: u16 = 0x01;
const ABS_Z: u16 = 0x02;
const ABS_RX: u16 = 0x03;
const ABS_RY: u16 = 0x04;
const ABS_RZ: u16 = 0x05;
const ABS_HAT0X: u16 = 0x10;
const ABS_HAT0Y: u16 = 0x11;

/// Key codes in the order of the device button IDs, starting at [`FIRST_BUTTON_ID`]
const BUTTON_CODES: [u16; 8] = [
    0x130, // BTN_A
    0x131, // BTN_B
    0x133, // BTN_X
    0x134, // BTN_Y
    0x136, // BTN_TL
    0x137, // BTN_TR
    0x13a, // BTN_SELECT
    0x13b, // BTN_START
];

pub const FIRST_BUTTON_ID: u16 = 5;

/// Dpad values indexed by `[hat_y + 1][hat_x + 1]`
const HAT_TO_DPAD: [[u8; 3]; 3] = [[8, 1, 2], [7, 0, 3], [6, 5, 4]];

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Anything that delivers batches of kernel input events.
pub trait EventSource {
    /// Block until events are available and return them in order.
    fn fetch(&mut self) -> io::Result<Vec<InputEvent>>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Accumulates events into the current controller state.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    report: RawReport,
    pressed: BTreeSet<u16>,
    hat: (i32, i32),
    left_trigger: i32,
    right_trigger: i32,
    trigger_axis_max: i32,
}

/// Reads a device node on its own thread and forwards reports as input records.
pub struct DeviceReader {
    path: PathBuf,
    retry_period: Duration,
    trigger_axis_max: i32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Cannot open the input device {0:?}: {1}")]
    CannotOpen(PathBuf, io::Error),

    #[error("Cannot read from the input device: {0}")]
    ReadError(io::Error),

    #[error("The report receiver has hung up")]
    ReceiverClosed,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl EventSource for Device {
    fn fetch(&mut self) -> io::Result<Vec<InputEvent>> {
        Ok(self.fetch_events()?.collect())
    }
}

impl ReportAssembler {
    /// Create an assembler for a device whose triggers report `0..=trigger_axis_max`.
    pub fn new(trigger_axis_max: i32) -> Self {
        Self {
            report: RawReport::neutral(),
            pressed: BTreeSet::new(),
            hat: (0, 0),
            left_trigger: 0,
            right_trigger: 0,
            trigger_axis_max: trigger_axis_max.max(1),
        }
    }

    /// Apply an event, returning the complete report when the device marks the end of one.
    pub fn handle(&mut self, event: &InputEvent) -> Option<RawReport> {
        let (code, value) = (event.code(), event.value());

        match event.event_type() {
            EventType::SYNCHRONIZATION if code == SYN_REPORT => {
                self.report.buttons = self.pressed.iter().copied().collect();
                return Some(self.report.clone());
            }
            EventType::KEY => {
                if let Some(i) = BUTTON_CODES.iter().position(|&c| c == code) {
                    let id = FIRST_BUTTON_ID + i as u16;
                    // 1 is press and 2 autorepeat
                    if value != 0 {
                        self.pressed.insert(id);
                    } else {
                        self.pressed.remove(&id);
                    }
                }
            }
            EventType::ABSOLUTE => match code {
                ABS_X => self.report.left_x = stick_axis(value),
                ABS_Y => self.report.left_y = stick_axis(value),
                ABS_RX => self.report.right_x = stick_axis(value),
                ABS_RY => self.report.right_y = stick_axis(value),
                ABS_Z => {
                    self.left_trigger = value;
                    self.report.trigger = self.combined_trigger();
                }
                ABS_RZ => {
                    self.right_trigger = value;
                    self.report.trigger = self.combined_trigger();
                }
                ABS_HAT0X => {
                    self.hat.0 = value.signum();
                    self.report.dpad = self.dpad();
                }
                ABS_HAT0Y => {
                    self.hat.1 = value.signum();
                    self.report.dpad = self.dpad();
                }
                _ => (),
            },
            _ => (),
        }

        None
    }

    fn combined_trigger(&self) -> u16 {
        let scale = |v: i32| {
            (v.max(0).min(self.trigger_axis_max) as i64 * (AXIS_NEUTRAL as i64 - 1)
                / self.trigger_axis_max as i64) as i32
        };

        let raw = AXIS_NEUTRAL as i32 + scale(self.left_trigger) - scale(self.right_trigger);

        raw.max(0).min(AXIS_MAX as i32) as u16
    }

    fn dpad(&self) -> u8 {
        HAT_TO_DPAD[(self.hat.1 + 1) as usize][(self.hat.0 + 1) as usize]
    }
}

impl DeviceReader {
    pub fn new<P: AsRef<Path>>(path: P, retry_period: Duration, trigger_axis_max: i32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            retry_period,
            trigger_axis_max,
        }
    }

    /// Read the device until `stop` is set, sending every report to `sender`.
    ///
    /// A missing device is retried every retry period. A read error closes the device and
    /// discovery starts again.
    pub fn run(&self, sender: Sender<InputRecord>, stop: Arc<AtomicBool>) {
        while !stop.load(Ordering::Relaxed) {
            let mut device = match Device::open(&self.path) {
                Ok(d) => d,
                Err(e) => {
                    warn!(
                        "{}, retrying in {} s",
                        DeviceError::CannotOpen(self.path.clone(), e),
                        self.retry_period.as_secs_f64()
                    );
                    thread::sleep(self.retry_period);
                    continue;
                }
            };

            info!(
                "Input device {:?} opened ({})",
                self.path,
                device.name().unwrap_or("unnamed")
            );

            match self.read_reports(&mut device, &sender, &stop) {
                Ok(()) => break,
                Err(DeviceError::ReceiverClosed) => {
                    debug!("Input report receiver closed, stopping device reader");
                    break;
                }
                Err(e) => warn!("{}, reopening the device", e),
            }
        }
    }

    /// Forward reports from an open source until `stop` is set or the source fails.
    pub fn read_reports<S: EventSource>(
        &self,
        source: &mut S,
        sender: &Sender<InputRecord>,
        stop: &AtomicBool,
    ) -> Result<(), DeviceError> {
        let mut assembler = ReportAssembler::new(self.trigger_axis_max);

        while !stop.load(Ordering::Relaxed) {
            for event in source.fetch().map_err(DeviceError::ReadError)?.iter() {
                if let Some(report) = assembler.handle(event) {
                    sender
                        .send(InputRecord::Report(report))
                        .map_err(|_| DeviceError::ReceiverClosed)?;
                }
            }
        }

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Move a signed stick axis into `0..=65535`.
fn stick_axis(value: i32) -> u16 {
    (value.max(i16::MIN as i32).min(i16::MAX as i32) + AXIS_NEUTRAL as i32) as u16
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::mpsc::channel;

    fn ev(event_type: EventType, code: u16, value: i32) -> InputEvent {
        InputEvent::new(event_type, code, value)
    }

    fn key(code: u16, value: i32) -> InputEvent {
        ev(EventType::KEY, code, value)
    }

    fn abs(code: u16, value: i32) -> InputEvent {
        ev(EventType::ABSOLUTE, code, value)
    }

    fn syn() -> InputEvent {
        ev(EventType::SYNCHRONIZATION, SYN_REPORT, 0)
    }

    /// Source replaying fixed batches, then failing like an unplugged device
    struct ReplaySource(VecDeque<Vec<InputEvent>>);

    impl EventSource for ReplaySource {
        fn fetch(&mut self) -> io::Result<Vec<InputEvent>> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "device removed"))
        }
    }

    #[test]
    fn test_reports_on_syn_only() {
        let mut a = ReportAssembler::new(255);

        assert_eq!(a.handle(&abs(ABS_X, 32767)), None);
        assert_eq!(a.handle(&key(0x13b, 1)), None);

        let r = a.handle(&syn()).unwrap();
        assert_eq!(r.left_x, 65535);
        assert_eq!(r.left_y, AXIS_NEUTRAL);
        assert_eq!(r.buttons, vec![12]);
    }

    #[test]
    fn test_button_ids() {
        let mut a = ReportAssembler::new(255);

        for &code in BUTTON_CODES.iter() {
            a.handle(&key(code, 1));
        }
        // Unmapped key is dropped
        a.handle(&key(0x13c, 1));
        assert_eq!(a.handle(&syn()).unwrap().buttons, (5..=12).collect::<Vec<u16>>());

        a.handle(&key(0x130, 0));
        a.handle(&key(0x136, 0));
        assert_eq!(a.handle(&syn()).unwrap().buttons, vec![6, 7, 8, 10, 11, 12]);
    }

    #[test]
    fn test_sticks_and_triggers() {
        let mut a = ReportAssembler::new(255);

        a.handle(&abs(ABS_RX, -32768));
        a.handle(&abs(ABS_RY, 0));
        a.handle(&abs(ABS_Z, 255));
        let r = a.handle(&syn()).unwrap();
        assert_eq!(r.right_x, 0);
        assert_eq!(r.right_y, AXIS_NEUTRAL);
        assert_eq!(r.trigger, AXIS_MAX);

        // Both triggers fully pulled cancel out
        a.handle(&abs(ABS_RZ, 255));
        assert_eq!(a.handle(&syn()).unwrap().trigger, AXIS_NEUTRAL);

        a.handle(&abs(ABS_Z, 0));
        assert_eq!(a.handle(&syn()).unwrap().trigger, 1);
    }

    #[test]
    fn test_hat_to_dpad() {
        let mut a = ReportAssembler::new(255);

        let cases = [
            ((0, -1), 1),
            ((1, -1), 2),
            ((1, 0), 3),
            ((1, 1), 4),
            ((0, 1), 5),
            ((-1, 1), 6),
            ((-1, 0), 7),
            ((-1, -1), 8),
            ((0, 0), 0),
        ];

        for &((x, y), dpad) in cases.iter() {
            a.handle(&abs(ABS_HAT0X, x));
            a.handle(&abs(ABS_HAT0Y, y));
            assert_eq!(a.handle(&syn()).unwrap().dpad, dpad, "hat ({}, {})", x, y);
        }
    }

    #[test]
    fn test_read_reports_until_source_fails() {
        let reader = DeviceReader::new("/dev/input/event0", Duration::from_millis(1), 255);
        let mut source = ReplaySource(VecDeque::from(vec![
            vec![key(0x13b, 1), syn()],
            vec![abs(ABS_X, 32767)],
            vec![syn()],
        ]));
        let (tx, rx) = channel();

        let result = reader.read_reports(&mut source, &tx, &AtomicBool::new(false));
        assert!(matches!(result, Err(DeviceError::ReadError(_))));

        let records: Vec<InputRecord> = rx.try_iter().collect();
        assert_eq!(records.len(), 2);
        match (&records[0], &records[1]) {
            (InputRecord::Report(first), InputRecord::Report(second)) => {
                assert_eq!(first.buttons, vec![12]);
                assert_eq!(first.left_x, AXIS_NEUTRAL);
                assert_eq!(second.buttons, vec![12]);
                assert_eq!(second.left_x, 65535);
            }
            other => panic!("unexpected records {:?}", other),
        }
    }

    #[test]
    fn test_read_reports_receiver_closed() {
        let reader = DeviceReader::new("/dev/input/event0", Duration::from_millis(1), 255);
        let mut source = ReplaySource(VecDeque::from(vec![vec![syn()]]));
        let (tx, rx) = channel();
        drop(rx);

        let result = reader.read_reports(&mut source, &tx, &AtomicBool::new(false));
        assert!(matches!(result, Err(DeviceError::ReceiverClosed)));
    }

    #[test]
    fn test_run_retries_missing_device_until_stopped() {
        let reader = DeviceReader::new(
            "/nonexistent/hex_exec/event99",
            Duration::from_millis(5),
            255,
        );
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = channel();

        let run_stop = stop.clone();
        let handle = thread::spawn(move || reader.run(tx, run_stop));

        thread::sleep(Duration::from_millis(30));
        stop.store(true, Ordering::Relaxed);
        handle.join().unwrap();

        // The sender is dropped once run returns, and nothing was ever sent
        assert!(rx.recv().is_err());
    }
}
