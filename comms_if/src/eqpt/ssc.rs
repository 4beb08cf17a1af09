//! # SSC-32 Servo Controller Commands
//!
//! Only the discrete output commands are used by the front end, servo positioning belongs to the
//! gait engine.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of channels on the board.
pub const NUM_CHANNELS: u8 = 32;

/// Terminator for every command.
pub const CMD_TERMINATOR: char = '\r';

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A discrete output command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SscCmd {
    /// Drive the channel's output high
    High(u8),

    /// Drive the channel's output low
    Low(u8),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SscCmdError {
    #[error("Channel {0} does not exist, the board has {max} channels", max = NUM_CHANNELS)]
    InvalidChannel(u8),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SscCmd {
    /// Channel this command addresses.
    pub fn channel(&self) -> u8 {
        match *self {
            SscCmd::High(c) | SscCmd::Low(c) => c,
        }
    }

    /// Check the command addresses a channel that exists on the board.
    pub fn validate(&self) -> Result<(), SscCmdError> {
        if self.channel() >= NUM_CHANNELS {
            Err(SscCmdError::InvalidChannel(self.channel()))
        } else {
            Ok(())
        }
    }

    /// The ASCII string to write to the board, including the terminator.
    pub fn to_ascii(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SscCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SscCmd::High(c) => write!(f, "#{}H{}", c, CMD_TERMINATOR),
            SscCmd::Low(c) => write!(f, "#{}L{}", c, CMD_TERMINATOR),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ascii() {
        assert_eq!(SscCmd::High(16).to_ascii(), "#16H\r");
        assert_eq!(SscCmd::Low(0).to_ascii(), "#0L\r");
    }

    #[test]
    fn test_validate() {
        assert!(SscCmd::High(31).validate().is_ok());
        assert_eq!(
            SscCmd::Low(32).validate(),
            Err(SscCmdError::InvalidChannel(32))
        );
    }
}
