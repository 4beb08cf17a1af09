//! # Input script interpreter module
//!
//! This module provides an interpreter for input scripts, allowing recorded controller reports and
//! GPS fixes to be replayed without a device attached.
//!
//! Each entry in a script has the form `<time_s>: <json>;` where `<json>` is an
//! [`InputRecord`], for example:
//!
//! ```text
//! 0.5: {"Report": {"dpad": 0, "left_x": 32768, "left_y": 32768, "right_x": 32768,
//!      "right_y": 32768, "trigger": 32768, "buttons": [12]}};
//! 2.0: {"GpsFix": {"lat_deg": 52.2, "lon_deg": 0.12}};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::session::get_elapsed_seconds;
use comms_if::input::InputRecord;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A record which is scripted to occur at a specific time.
pub struct Command {
    /// The time the record is supposed to be delivered at
    exec_time_s: f64,

    /// The record to deliver
    record: InputRecord,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending_records` to
/// acquire a list of records that need delivering.
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    cmds: VecDeque<Command>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script contains an invalid record at {0} s: {1}")]
    InvalidRecord(f64, serde_json::Error),
}

#[derive(Debug, PartialEq)]
pub enum PendingRecords {
    None,
    Some(Vec<InputRecord>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path.display().to_string()));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path).map_err(ScriptError::ScriptLoadError)?;

        Self::from_script(path, &script)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script<P: AsRef<Path>>(script_path: P, script: &str) -> Result<Self, ScriptError> {
        let mut queue: VecDeque<Command> = VecDeque::new();

        // Entries may span lines, an entry ends at the first `;` after its timestamp
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .expect("Script regex is invalid");

        for cap in re.captures_iter(script) {
            // Parse the exec time
            let exec_time_s: f64 = cap[1]
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            // Parse the record from the payload. The scripts contain JSON only.
            let record: InputRecord = serde_json::from_str(&cap[3])
                .map_err(|e| ScriptError::InvalidRecord(exec_time_s, e))?;

            queue.push_back(Command {
                exec_time_s,
                record,
            });
        }

        if queue.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(ScriptInterpreter {
            _script_path: script_path.as_ref().to_path_buf(),
            cmds: queue,
        })
    }

    /// Return the records due for delivery at the current session time.
    pub fn get_pending_records(&mut self) -> PendingRecords {
        self.get_pending_records_at(get_elapsed_seconds())
    }

    /// Return the records with an execution time before `current_time_s`.
    pub fn get_pending_records_at(&mut self, current_time_s: f64) -> PendingRecords {
        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingRecords::EndOfScript;
        }

        let mut records: Vec<InputRecord> = vec![];

        while let Some(cmd) = self.cmds.front() {
            if cmd.exec_time_s >= current_time_s {
                break;
            }
            if let Some(cmd) = self.cmds.pop_front() {
                records.push(cmd.record);
            }
        }

        if records.is_empty() {
            PendingRecords::None
        } else {
            PendingRecords::Some(records)
        }
    }

    /// Get the number of records remaining in the script
    pub fn get_num_records(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64,
        }
    }
}
