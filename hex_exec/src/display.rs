//! # Status display
//!
//! Two line, 16 character status display. The SparkFun serial LCD is driven when it can be
//! opened, otherwise status lines go to the log.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};
use thiserror::Error;

use comms_if::eqpt::lcd::{self, LcdLine};

use crate::motion_state::MotionState;
use crate::serial::{PortTransport, SerialError, SerialTransport};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Shown once the gait control loop has stopped.
pub const STOPPED_MESSAGE: &str = "Hexapod stopped";

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A two line text display.
pub trait DisplayDevice: Send {
    /// Write `text` onto `line`, padded to the line width. Longer text is not wrapped.
    fn write_line(&mut self, text: &str, line: LcdLine) -> Result<(), DisplayError>;

    /// Replace the whole display with `text`, starting on the first line.
    fn write_screen(&mut self, text: &str) -> Result<(), DisplayError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// SparkFun serial enabled 16x2 LCD.
pub struct SparkFunLcd<T: SerialTransport> {
    transport: T,
}

/// Display that writes to the log.
#[derive(Debug, Default)]
pub struct LogDisplay {
    lines: [String; lcd::NUM_LINES],
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Cannot open the display: {0}")]
    CannotOpen(SerialError),

    #[error("Cannot write to the display: {0}")]
    WriteError(SerialError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<T: SerialTransport> SparkFunLcd<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl SparkFunLcd<PortTransport> {
    pub fn open(port: &str, baud_rate: u32) -> Result<Self, DisplayError> {
        PortTransport::open(port, baud_rate)
            .map(Self::new)
            .map_err(DisplayError::CannotOpen)
    }
}

impl<T: SerialTransport> DisplayDevice for SparkFunLcd<T> {
    fn write_line(&mut self, text: &str, line: LcdLine) -> Result<(), DisplayError> {
        self.transport
            .write_bytes(&lcd::frame_line(text, line))
            .map_err(DisplayError::WriteError)
    }

    fn write_screen(&mut self, text: &str) -> Result<(), DisplayError> {
        self.transport
            .write_bytes(&lcd::frame_screen(text))
            .map_err(DisplayError::WriteError)
    }
}

impl DisplayDevice for LogDisplay {
    fn write_line(&mut self, text: &str, line: LcdLine) -> Result<(), DisplayError> {
        let index = match line {
            LcdLine::First => 0,
            LcdLine::Second => 1,
        };
        self.lines[index] = text.to_string();

        info!("[display] {} | {}", self.lines[0], self.lines[1]);

        Ok(())
    }

    fn write_screen(&mut self, text: &str) -> Result<(), DisplayError> {
        let split = text
            .char_indices()
            .nth(lcd::LINE_WIDTH)
            .map(|(i, _)| i)
            .unwrap_or_else(|| text.len());
        let (first, second) = text.split_at(split);

        self.lines = [first.to_string(), second.to_string()];

        info!("[display] {} | {}", self.lines[0], self.lines[1]);

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Open the LCD on `port`, falling back on the log if it can't be opened.
pub fn open_or_log(port: Option<&str>, baud_rate: u32) -> Box<dyn DisplayDevice> {
    match port {
        Some(p) => match SparkFunLcd::open(p, baud_rate) {
            Ok(d) => {
                info!("Status display opened on {}", p);
                Box::new(d)
            }
            Err(e) => {
                warn!("{}, status will be logged instead", e);
                Box::new(LogDisplay::default())
            }
        },
        None => Box::new(LogDisplay::default()),
    }
}

/// The two status lines for a motion state.
pub fn status_lines(state: &MotionState) -> (String, String) {
    (
        format!(
            "Spd {:.0} Lft {:.0}",
            state.gait_speed, state.leg_lift_height
        ),
        format!(
            "{} {} {}",
            state.selected_function.short_name(),
            state.gait_type.short_name(),
            if state.movement_enabled { "ON" } else { "OFF" }
        ),
    )
}

/// Show the status of `state`, logging and abandoning the write on failure.
pub fn show_status(display: &mut dyn DisplayDevice, state: &MotionState) {
    let (first, second) = status_lines(state);

    for (text, line) in [(first, LcdLine::First), (second, LcdLine::Second)].iter() {
        if let Err(e) = display.write_line(text, *line) {
            warn!("{}", e);
            return;
        }
    }
}

/// Replace the whole display with `text`, logging and abandoning the write on failure.
pub fn show_message(display: &mut dyn DisplayDevice, text: &str) {
    if let Err(e) = display.write_screen(text) {
        warn!("{}", e);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::serial::test_transport::MemoryTransport;

    #[test]
    fn test_status_lines() {
        let (first, second) = status_lines(&MotionState::default());

        assert_eq!(first, "Spd 70 Lft 30");
        assert_eq!(second, "SPD TT12 OFF");
        assert!(first.len() <= lcd::LINE_WIDTH);
    }

    #[test]
    fn test_lcd_framing() {
        let transport = MemoryTransport::default();
        let written = transport.written.clone();
        let mut d = SparkFunLcd::new(transport);

        show_status(&mut d, &MotionState::default());

        let w = written.lock().unwrap();
        assert_eq!(w.len(), 2);
        assert_eq!(&w[0][..2], &[0xfe, 0x80]);
        assert_eq!(&w[0][2..], b"Spd 70 Lft 30   ");
        assert_eq!(&w[1][..2], &[0xfe, 0xc0]);
        assert_eq!(w[1].len(), 2 + lcd::LINE_WIDTH);
    }

    #[test]
    fn test_write_failure_is_absorbed() {
        let transport = MemoryTransport {
            fail: true,
            ..MemoryTransport::default()
        };
        let mut d = SparkFunLcd::new(transport);

        assert!(d.write_screen("hello").is_err());
        show_status(&mut d, &MotionState::default());
    }

    #[test]
    fn test_log_display_split() {
        let mut d = LogDisplay::default();

        d.write_screen("Hexapod ready   Press start").unwrap();
        assert_eq!(d.lines[0], "Hexapod ready   ");
        assert_eq!(d.lines[1], "Press start");
    }

    #[test]
    fn test_fallback_without_port() {
        let mut d = open_or_log(None, 9600);
        assert!(d.write_line("x", LcdLine::First).is_ok());
    }
}
