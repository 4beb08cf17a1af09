//! # Serial transport
//!
//! Byte level access to the serial devices (servo controller board, status display), and the
//! servo controller's discrete output commands on top of it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::io::Write;
use std::time::Duration;

use log::debug;
use serialport::SerialPort;
use thiserror::Error;

use comms_if::eqpt::ssc::{SscCmd, SscCmdError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const WRITE_TIMEOUT: Duration = Duration::from_millis(100);

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Something bytes can be written to.
pub trait SerialTransport: Send {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerialError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A serial port opened through `serialport`.
pub struct PortTransport {
    name: String,
    port: Box<dyn SerialPort>,
}

/// The SSC-32 servo controller board.
pub struct SscController<T: SerialTransport> {
    transport: T,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SerialError {
    #[error("Cannot open serial port {0}: {1}")]
    CannotOpen(String, serialport::Error),

    #[error("Cannot write to serial port: {0}")]
    WriteError(std::io::Error),

    #[error("Invalid servo controller command: {0}")]
    InvalidCmd(SscCmdError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PortTransport {
    /// Open the named port at the given baud rate.
    pub fn open(name: &str, baud_rate: u32) -> Result<Self, SerialError> {
        let port = serialport::new(name, baud_rate)
            .timeout(WRITE_TIMEOUT)
            .open()
            .map_err(|e| SerialError::CannotOpen(name.to_string(), e))?;

        Ok(Self {
            name: name.to_string(),
            port,
        })
    }
}

impl SerialTransport for PortTransport {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.port.write_all(bytes).map_err(SerialError::WriteError)?;
        self.port.flush().map_err(SerialError::WriteError)?;

        debug!("Wrote {} bytes to {}", bytes.len(), self.name);

        Ok(())
    }
}

impl<T: SerialTransport + ?Sized> SerialTransport for Box<T> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        (**self).write_bytes(bytes)
    }
}

impl<T: SerialTransport> SscController<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Send a single command to the board.
    pub fn send(&mut self, cmd: SscCmd) -> Result<(), SerialError> {
        cmd.validate().map_err(SerialError::InvalidCmd)?;

        self.transport.write_bytes(cmd.to_ascii().as_bytes())
    }
}

// ------------------------------------------------------------------------------------------------
// TEST DOUBLES
// ------------------------------------------------------------------------------------------------


#[cfg(test)]
mod test {
    use super::test_transport::MemoryTransport;
    use super::*;

    #[test]
    fn test_ssc_send() {
        let transport = MemoryTransport::default();
        let written = transport.written.clone();
        let mut ssc = SscController::new(transport);

        ssc.send(SscCmd::High(4)).unwrap();
        ssc.send(SscCmd::Low(4)).unwrap();

        assert_eq!(
            *written.lock().unwrap(),
            vec![b"#4H\r".to_vec(), b"#4L\r".to_vec()]
        );
    }

    #[test]
    fn test_ssc_rejects_bad_channel() {
        let transport = MemoryTransport::default();
        let written = transport.written.clone();
        let mut ssc = SscController::new(transport);

        assert!(matches!(
            ssc.send(SscCmd::High(40)),
            Err(SerialError::InvalidCmd(SscCmdError::InvalidChannel(40)))
        ));
        assert!(written.lock().unwrap().is_empty());
    }
}
