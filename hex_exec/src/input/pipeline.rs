//! # Input pipeline
//!
//! Decodes each report, compares every channel against its change filter and produces the mode
//! events for the channels that changed.
//!
//! Channels are visited in a fixed priority order: buttons, left trigger, right trigger, left
//! stick, right stick, dpad. By default only the first changed channel of a report is passed on,
//! the others keep their previously emitted values in the filter and so are picked up by the
//! following reports. With `process_all_channels` every changed channel is passed on.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

use comms_if::input::{InputRecord, RawReport};

use super::{ButtonClass, ChangeFilter, ReportDecoder, VectorQuantizer};
use crate::mode_ctrl::ModeEvent;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The input processing chain between the device and the mode coordinator.
#[derive(Debug, Clone, Default)]
pub struct InputPipeline {
    decoder: ReportDecoder,
    filter: ChangeFilter,
    process_all_channels: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl InputPipeline {
    pub fn new(deadzone_tolerance: f64, process_all_channels: bool) -> Self {
        Self {
            decoder: ReportDecoder::new(VectorQuantizer::new(deadzone_tolerance)),
            filter: ChangeFilter::default(),
            process_all_channels,
        }
    }

    /// Events for any record, GPS fixes go straight through.
    pub fn process_record(&mut self, record: &InputRecord) -> Vec<ModeEvent> {
        match record {
            InputRecord::Report(r) => self.process(r),
            InputRecord::GpsFix(c) => vec![ModeEvent::GpsFix(*c)],
        }
    }

    /// Events for a single controller report.
    pub fn process(&mut self, report: &RawReport) -> Vec<ModeEvent> {
        let decoded = self.decoder.decode(report);
        let mut events = Vec::new();

        // ---- BUTTONS ----
        let pressed = self.filter.buttons.pressed(&decoded.buttons);
        if self.filter.buttons.is_changed(&decoded.buttons) {
            // Releases alone are absorbed without taking the report's slot
            self.filter.buttons.commit(&decoded.buttons);
        }
        if !pressed.is_empty() {
            events.extend(pressed.into_iter().map(|id| match ButtonClass::from_id(id) {
                ButtonClass::Function(f) => ModeEvent::Function(f),
                ButtonClass::Bumper(b) => ModeEvent::Bumper(b),
            }));

            if !self.process_all_channels {
                return self.done(events);
            }
        }

        // ---- TRIGGERS ----
        if self.filter.left_trigger.is_changed(decoded.left_trigger) {
            self.filter.left_trigger.commit(decoded.left_trigger);
            events.push(ModeEvent::LeftTrigger(decoded.left_trigger));

            if !self.process_all_channels {
                return self.done(events);
            }
        }

        if self.filter.right_trigger.is_changed(decoded.right_trigger) {
            self.filter.right_trigger.commit(decoded.right_trigger);
            events.push(ModeEvent::RightTrigger(decoded.right_trigger));

            if !self.process_all_channels {
                return self.done(events);
            }
        }

        // ---- STICKS ----
        if self.filter.left_stick.is_changed(&decoded.left_stick) {
            self.filter.left_stick.commit(decoded.left_stick);
            events.push(ModeEvent::LeftStick(decoded.left_stick));

            if !self.process_all_channels {
                return self.done(events);
            }
        }

        if self.filter.right_stick.is_changed(&decoded.right_stick) {
            self.filter.right_stick.commit(decoded.right_stick);
            events.push(ModeEvent::RightStick(decoded.right_stick));

            if !self.process_all_channels {
                return self.done(events);
            }
        }

        // ---- DPAD ----
        if self.filter.dpad.is_changed(&decoded.dpad) {
            self.filter.dpad.commit(decoded.dpad);
            events.push(ModeEvent::Dpad(decoded.dpad));
        }

        self.done(events)
    }

    fn done(&self, events: Vec<ModeEvent>) -> Vec<ModeEvent> {
        if !events.is_empty() {
            trace!("Input events: {:?}", events);
        }
        events
    }
}
