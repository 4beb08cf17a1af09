//! # Hexapod Executable Parameters
//!
//! This module provide parameters for the hexapod executable, loaded from `hex_exec.toml`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::input::DEFAULT_DEADZONE_TOLERANCE;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HexExecParams {
    pub input: InputParams,
    pub device: DeviceParams,
    pub control_loop: ControlLoopParams,
    pub serial: SerialParams,
    pub display: DisplayParams,
    pub actuator: ActuatorParams,
}

/// Input processing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParams {
    /// Stick deadzone radius in raw axis units (half range is 32768)
    pub deadzone_tolerance: f64,

    /// Pass every changed channel of a report on, rather than only the highest priority one
    pub process_all_channels: bool,
}

/// Input device parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceParams {
    /// Event device node of the controller
    pub path: String,

    /// Time between attempts to open the device
    pub retry_period_s: f64,

    /// Full pull value of the analogue triggers
    pub trigger_axis_max: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlLoopParams {
    pub period_s: f64,
}

/// Servo controller board serial port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialParams {
    /// Port name, no board is used if this isn't set
    pub port: Option<String>,
    pub baud_rate: u32,
}

/// Status display serial port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayParams {
    /// Port name, status goes to the log if this isn't set
    pub port: Option<String>,
    pub baud_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorParams {
    /// Servo controller channel the actuator is wired to
    pub channel: u8,

    /// How long the output is held high per fire
    pub pulse_duration_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for InputParams {
    fn default() -> Self {
        Self {
            deadzone_tolerance: DEFAULT_DEADZONE_TOLERANCE,
            process_all_channels: false,
        }
    }
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            path: String::from("/dev/input/event0"),
            retry_period_s: 5.0,
            trigger_axis_max: 255,
        }
    }
}

impl DeviceParams {
    pub fn retry_period(&self) -> Duration {
        secs(self.retry_period_s)
    }
}

impl Default for ControlLoopParams {
    fn default() -> Self {
        Self { period_s: 0.02 }
    }
}

impl ControlLoopParams {
    pub fn period(&self) -> Duration {
        secs(self.period_s)
    }
}

impl Default for SerialParams {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: 115200,
        }
    }
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: 9600,
        }
    }
}

impl Default for ActuatorParams {
    fn default() -> Self {
        Self {
            channel: 4,
            pulse_duration_s: 3.0,
        }
    }
}

impl ActuatorParams {
    pub fn pulse_duration(&self) -> Duration {
        secs(self.pulse_duration_s)
    }
}

/// Non-finite and negative durations are treated as zero, too long ones saturate.
fn secs(s: f64) -> Duration {
    if s.is_finite() && s > 0.0 {
        Duration::try_from_secs_f64(s).unwrap_or(Duration::MAX)
    } else {
        Duration::from_secs(0)
    }
}
