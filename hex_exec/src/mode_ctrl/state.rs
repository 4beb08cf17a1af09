//! Implementations for the ModeCtrl state structure

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use super::{ModeCtrlError, ModeEvent, Params, SideEffect, XButtonAction};
use crate::input::{Bumper, DirectionOctant, DirectionalVector, FunctionButton};
use crate::motion_state::{MotionState, SelectedFunction, SharedMotionState};
use comms_if::{gait::GaitCmd, nav::GeoCoord};
use util::{
    maths::{clamp, clamp_abs, lin_map},
    module::State,
    params,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Mode control module state
pub struct ModeCtrl {
    pub(crate) params: Params,

    /// Working copy of the motion state, the coordinator is its only writer
    state: MotionState,

    shared: SharedMotionState,

    /// The latest fix delivered by the GPS source
    last_fix: Option<GeoCoord>,

    report: StatusReport,
}

/// Everything produced by handling one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputData {
    /// Commands for the gait engine, in the order they must be applied
    pub gait_cmds: Vec<GaitCmd>,

    pub side_effects: Vec<SideEffect>,
}

/// Status report for ModeCtrl processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// The motion state was modified and published
    pub state_changed: bool,

    /// A requested value went past its envelope and was held at the limit
    pub clamped: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for ModeCtrl {
    fn default() -> Self {
        let params = Params::default();
        let state = initial_state(&params);

        Self {
            params,
            state,
            shared: SharedMotionState::new(state),
            last_fix: None,
            report: StatusReport::default(),
        }
    }
}

impl State for ModeCtrl {
    type InitData = &'static str;
    type InitError = ModeCtrlError;

    type InputData = ModeEvent;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = ModeCtrlError;

    /// Initialise the ModeCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data).map_err(ModeCtrlError::ParamLoadError)?;

        self.set_params(params)
    }

    /// Handle a single operator event.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        self.report = StatusReport::default();

        let previous = self.state;
        let mut output = OutputData::default();

        match *input_data {
            ModeEvent::Function(b) => self.handle_function(b, &mut output),
            ModeEvent::Bumper(b) => self.handle_bumper(b, &mut output),
            ModeEvent::LeftTrigger(v) => self.handle_trigger(-1.0, v, &mut output),
            ModeEvent::RightTrigger(v) => self.handle_trigger(1.0, v, &mut output),
            ModeEvent::LeftStick(v) => self.handle_left_stick(v, &mut output),
            ModeEvent::RightStick(v) => self.handle_right_stick(v, &mut output),
            ModeEvent::Dpad(v) => self.handle_dpad(v, &mut output),
            ModeEvent::GpsFix(c) => {
                debug!("GPS fix {:?}", c);
                self.last_fix = Some(c);
            }
        }

        // One write of the whole record keeps readers consistent
        if self.state != previous {
            self.report.state_changed = true;
            self.shared.publish(self.state);
        }

        Ok((output, self.report))
    }
}

impl ModeCtrl {
    /// Create a coordinator from already loaded parameters.
    pub fn new(params: Params) -> Result<Self, ModeCtrlError> {
        let mut mc = Self::default();
        mc.set_params(params)?;

        Ok(mc)
    }

    /// Handle to the published motion state.
    pub fn shared_state(&self) -> SharedMotionState {
        self.shared.clone()
    }

    /// The coordinator's current motion state.
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// The commands that bring a freshly started engine in line with the current state.
    pub fn initial_cmds(&self) -> Vec<GaitCmd> {
        vec![
            self.gait_options_cmd(),
            GaitCmd::GaitType(self.state.gait_type),
            self.body_position_cmd(),
            self.movement_vector_cmd(),
            GaitCmd::MovementEnabled(self.state.movement_enabled),
        ]
    }

    fn set_params(&mut self, params: Params) -> Result<(), ModeCtrlError> {
        params.validate()?;

        self.state = initial_state(&params);
        self.params = params;
        self.shared.publish(self.state);

        Ok(())
    }

    // ---- EVENT HANDLERS ----

    fn handle_function(&mut self, button: FunctionButton, output: &mut OutputData) {
        match button {
            FunctionButton::A => self.select(SelectedFunction::GaitSpeed),
            FunctionButton::B => self.select(SelectedFunction::LegHeight),
            FunctionButton::Y => self.select(SelectedFunction::Translate3D),
            FunctionButton::X => match self.params.x_button_action {
                XButtonAction::FireActuator => {
                    debug!("Actuator fire requested");
                    output.side_effects.push(SideEffect::FireActuator);
                }
                XButtonAction::TranslateHorizontal => {
                    self.select(SelectedFunction::TranslateHorizontal)
                }
            },
            FunctionButton::Start => self.toggle_movement(output),
            FunctionButton::Back => match self.last_fix {
                Some(c) => {
                    debug!("Waypoint save requested at {:?}", c);
                    output.side_effects.push(SideEffect::SaveWaypoint(c));
                }
                None => debug!("Waypoint save requested without a GPS fix, ignoring"),
            },
            FunctionButton::Other(i) => debug!("Unrecognised function button {}, ignoring", i),
        }
    }

    fn select(&mut self, function: SelectedFunction) {
        debug!("Selected function {:?}", function);
        self.state.selected_function = function;
    }

    fn toggle_movement(&mut self, output: &mut OutputData) {
        if self.state.movement_enabled {
            debug!("Movement disabled");
            self.state.movement_enabled = false;

            // Only the engine is stopped, the travel targets are kept
            output.gait_cmds.push(GaitCmd::MovementVector {
                speed: 0.0,
                travel_x: 0.0,
                travel_z: 0.0,
                rotation_y: 0.0,
            });
            output.gait_cmds.push(GaitCmd::MovementEnabled(false));
        } else {
            debug!("Movement enabled");
            self.state.movement_enabled = true;
            self.state.gait_type = self.params.start_gait_type;

            output.gait_cmds.push(self.movement_vector_cmd());
            output.gait_cmds.push(self.gait_options_cmd());
            output
                .gait_cmds
                .push(GaitCmd::GaitType(self.state.gait_type));
            output.gait_cmds.push(GaitCmd::MovementEnabled(true));
        }
    }

    fn handle_bumper(&mut self, bumper: Bumper, output: &mut OutputData) {
        let sign = match bumper {
            Bumper::Left => -1.0,
            Bumper::Right => 1.0,
        };

        match self.state.selected_function {
            SelectedFunction::LegHeight => {
                self.state.leg_lift_height = self.stepped(
                    self.state.leg_lift_height,
                    sign * self.params.leg_lift_height_step,
                    self.params.leg_lift_height_lower_limit,
                    self.params.leg_lift_height_upper_limit,
                );
            }
            _ => {
                self.state.gait_speed = self.stepped(
                    self.state.gait_speed,
                    sign * self.params.gait_speed_step,
                    self.params.gait_speed_lower_limit,
                    self.params.gait_speed_upper_limit,
                );
            }
        }

        output.gait_cmds.push(self.gait_options_cmd());
    }

    fn handle_trigger(&mut self, sign: f64, value: u16, output: &mut OutputData) {
        let limit = self.params.travel_length_x_limit;
        let travel = self.mapped(value as f64, self.params.trigger_in_max, limit);

        self.state.travel_length_x = sign * travel;

        output.gait_cmds.push(self.movement_vector_cmd());
    }

    fn handle_right_stick(&mut self, vector: DirectionalVector, output: &mut OutputData) {
        let upper = self.params.travel_length_z_upper_limit;
        let lower = self.params.travel_length_z_lower_limit;

        // (rotation sign, z sign, z limit)
        let (rot_sign, z_sign, z_limit) = match vector.direction {
            DirectionOctant::Left => (-1.0, 0.0, upper),
            DirectionOctant::Right => (1.0, 0.0, upper),
            DirectionOctant::Up => (0.0, -1.0, upper),
            DirectionOctant::Down => (0.0, 1.0, upper),
            DirectionOctant::UpLeft => (-1.0, -1.0, upper),
            DirectionOctant::UpRight => (1.0, -1.0, upper),
            DirectionOctant::DownLeft => (-1.0, 1.0, lower),
            DirectionOctant::DownRight => (1.0, 1.0, lower),
            DirectionOctant::None => (0.0, 0.0, upper),
        };

        let magnitude = vector.magnitude as f64;
        let rot_limit = self.params.travel_rotation_y_limit;

        self.state.travel_rotation_y =
            rot_sign * self.mapped(magnitude, self.params.stick_in_max, rot_limit);
        self.state.travel_length_z =
            z_sign * self.mapped(magnitude, self.params.stick_in_max, z_limit);

        output.gait_cmds.push(self.movement_vector_cmd());
    }

    fn handle_left_stick(&mut self, vector: DirectionalVector, output: &mut OutputData) {
        let (first_sign, second_sign) = match vector.direction {
            DirectionOctant::Up => (1.0, 0.0),
            DirectionOctant::UpRight => (1.0, 1.0),
            DirectionOctant::Right => (0.0, 1.0),
            DirectionOctant::DownRight => (-1.0, 1.0),
            DirectionOctant::Down => (-1.0, 0.0),
            DirectionOctant::DownLeft => (-1.0, -1.0),
            DirectionOctant::Left => (0.0, -1.0),
            DirectionOctant::UpLeft => (1.0, -1.0),
            DirectionOctant::None => (0.0, 0.0),
        };

        let magnitude = vector.magnitude as f64;

        if self.state.selected_function == SelectedFunction::TranslateHorizontal {
            let v = self.mapped(magnitude, self.params.stick_in_max, self.params.body_offset_limit);

            self.state.body_pos_x = clamp_abs(first_sign * v, self.params.body_offset_limit);
            self.state.body_pos_z = clamp_abs(second_sign * v, self.params.body_offset_limit);
        } else {
            let v = self.mapped(
                magnitude,
                self.params.stick_in_max,
                self.params.body_rotation_limit,
            );

            self.state.body_rot_x1 = clamp_abs(first_sign * v, self.params.body_rotation_limit);
            self.state.body_rot_z1 = clamp_abs(second_sign * v, self.params.body_rotation_limit);
        }

        output.gait_cmds.push(self.body_position_cmd());
    }

    fn handle_dpad(&mut self, vector: DirectionalVector, output: &mut OutputData) {
        match vector.direction {
            DirectionOctant::Left | DirectionOctant::Right => {
                let current = self.state.gait_type;
                let next = match vector.direction {
                    DirectionOctant::Left => current.prev(),
                    _ => current.next(),
                };

                match next {
                    Some(t) => {
                        debug!("Gait type {:?}", t);
                        self.state.gait_type = t;
                        output.gait_cmds.push(GaitCmd::GaitType(t));
                    }
                    None => self.report.clamped = true,
                }
            }
            DirectionOctant::Up | DirectionOctant::Down => {
                let sign = match vector.direction {
                    DirectionOctant::Up => 1.0,
                    _ => -1.0,
                };

                let current = self.state.body_pos_y;
                self.state.body_pos_y = self.stepped(
                    current,
                    sign * self.params.body_height_step,
                    self.params.body_height_lower_limit,
                    self.params.body_height_upper_limit,
                );

                if self.state.body_pos_y != current {
                    output.gait_cmds.push(self.body_position_cmd());
                }
            }
            _ => (),
        }
    }

    // ---- ENVELOPE ARITHMETIC ----

    /// Add `step` to `current` and limit to `[lower, upper]`, flagging the clamp if it bit.
    fn stepped(&mut self, current: f64, step: f64, lower: f64, upper: f64) -> f64 {
        let raw = current + step;
        let value = clamp(raw, lower, upper);

        if value != raw {
            self.report.clamped = true;
        }

        value
    }

    /// Map `value` from `[0, in_max]` onto `[0, limit]`, limited to `limit`.
    fn mapped(&mut self, value: f64, in_max: f64, limit: f64) -> f64 {
        let raw = lin_map((0.0, in_max), (0.0, limit), value);
        let mapped = clamp(raw, 0.0, limit);

        if mapped != raw {
            self.report.clamped = true;
        }

        mapped
    }

    // ---- COMMANDS ----

    fn gait_options_cmd(&self) -> GaitCmd {
        GaitCmd::GaitOptions {
            speed: self.state.gait_speed,
            leg_lift_height: self.state.leg_lift_height,
        }
    }

    fn movement_vector_cmd(&self) -> GaitCmd {
        GaitCmd::MovementVector {
            speed: self.state.gait_speed,
            travel_x: self.state.travel_length_x,
            travel_z: self.state.travel_length_z,
            rotation_y: self.state.travel_rotation_y,
        }
    }

    fn body_position_cmd(&self) -> GaitCmd {
        GaitCmd::BodyPosition {
            rot_x: self.state.body_rot_x1,
            rot_z: self.state.body_rot_z1,
            pos_x: self.state.body_pos_x,
            pos_z: self.state.body_pos_z,
            pos_y: self.state.body_pos_y,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn initial_state(params: &Params) -> MotionState {
    MotionState {
        gait_speed: params.initial_gait_speed,
        leg_lift_height: params.initial_leg_lift_height,
        body_pos_y: params.initial_body_height,
        gait_type: params.start_gait_type,
        ..MotionState::default()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::input::MAX_MAGNITUDE;
    use comms_if::gait::GaitType;
    use std::sync::Mutex;
    use std::thread::{self, ThreadId};

    fn proc(mc: &mut ModeCtrl, event: ModeEvent) -> (OutputData, StatusReport) {
        mc.proc(&event).unwrap()
    }

    fn dpad(direction: DirectionOctant) -> ModeEvent {
        ModeEvent::Dpad(DirectionalVector::new(direction, MAX_MAGNITUDE))
    }

    /// Logger keeping the level of every record along with the thread it came from
    struct ThreadLevels(Mutex<Vec<(ThreadId, log::Level)>>);

    impl log::Log for ThreadLevels {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }
        fn log(&self, record: &log::Record) {
            self.0
                .lock()
                .unwrap()
                .push((thread::current().id(), record.level()));
        }
        fn flush(&self) {}
    }

    static LEVELS: ThreadLevels = ThreadLevels(Mutex::new(Vec::new()));

    #[test]
    fn test_proc_logs_below_info() {
        // Another test may have installed it already
        let _ = log::set_logger(&LEVELS);
        log::set_max_level(log::LevelFilter::Trace);

        let mut mc = ModeCtrl::default();
        let events = vec![
            ModeEvent::GpsFix(GeoCoord {
                lat_deg: 51.5,
                lon_deg: -0.1,
            }),
            ModeEvent::Function(FunctionButton::A),
            ModeEvent::Function(FunctionButton::X),
            ModeEvent::Function(FunctionButton::Back),
            ModeEvent::Function(FunctionButton::Other(3)),
            ModeEvent::Function(FunctionButton::Start),
            dpad(DirectionOctant::Right),
            dpad(DirectionOctant::Up),
            ModeEvent::Bumper(Bumper::Right),
            ModeEvent::RightTrigger(5000),
            ModeEvent::Function(FunctionButton::Start),
        ];
        for e in events {
            proc(&mut mc, e);
        }

        let this_thread = thread::current().id();
        let levels = LEVELS.0.lock().unwrap();
        let mine: Vec<log::Level> = levels
            .iter()
            .filter(|(id, _)| *id == this_thread)
            .map(|(_, l)| *l)
            .collect();

        assert!(!mine.is_empty());
        assert!(
            mine.iter().all(|l| *l > log::Level::Info),
            "levels {:?}",
            mine
        );
    }

    #[test]
    fn test_bumper_gait_speed() {
        let mut mc = ModeCtrl::default();

        for _ in 0..5 {
            let (out, _) = proc(&mut mc, ModeEvent::Bumper(Bumper::Right));
            assert_eq!(out.gait_cmds.len(), 1);
        }
        assert_eq!(mc.state().gait_speed, 95.0);

        // Bounded at the upper limit
        let mut clamped = false;
        for _ in 0..100 {
            let (_, report) = proc(&mut mc, ModeEvent::Bumper(Bumper::Right));
            clamped |= report.clamped;
        }
        assert!(clamped);
        assert_eq!(mc.state().gait_speed, 200.0);

        // And the bumper always issues the gait options, even when nothing moved
        let (out, report) = proc(&mut mc, ModeEvent::Bumper(Bumper::Right));
        assert!(!report.state_changed);
        assert_eq!(
            out.gait_cmds,
            vec![GaitCmd::GaitOptions {
                speed: 200.0,
                leg_lift_height: 30.0
            }]
        );

        for _ in 0..100 {
            proc(&mut mc, ModeEvent::Bumper(Bumper::Left));
        }
        assert_eq!(mc.state().gait_speed, 20.0);
    }

    #[test]
    fn test_leg_height_mode() {
        let mut mc = ModeCtrl::default();

        proc(&mut mc, ModeEvent::Function(FunctionButton::B));
        assert_eq!(mc.state().selected_function, SelectedFunction::LegHeight);

        let (out, _) = proc(&mut mc, ModeEvent::Bumper(Bumper::Right));
        assert_eq!(mc.state().leg_lift_height, 35.0);
        assert_eq!(mc.state().gait_speed, 70.0);
        assert_eq!(
            out.gait_cmds,
            vec![GaitCmd::GaitOptions {
                speed: 70.0,
                leg_lift_height: 35.0
            }]
        );

        // Translate modes edit the gait speed
        proc(&mut mc, ModeEvent::Function(FunctionButton::Y));
        proc(&mut mc, ModeEvent::Bumper(Bumper::Left));
        assert_eq!(mc.state().gait_speed, 65.0);
        assert_eq!(mc.state().leg_lift_height, 35.0);
    }

    #[test]
    fn test_gait_type_bounds() {
        let mut mc = ModeCtrl::default();
        assert_eq!(mc.state().gait_type, GaitType::TripleTripod12);

        let (out, _) = proc(&mut mc, dpad(DirectionOctant::Left));
        assert_eq!(out.gait_cmds, vec![GaitCmd::GaitType(GaitType::Tripod8)]);

        proc(&mut mc, dpad(DirectionOctant::Left));
        assert_eq!(mc.state().gait_type, GaitType::Ripple12);

        // No-op at the boundary
        let (out, report) = proc(&mut mc, dpad(DirectionOctant::Left));
        assert!(out.gait_cmds.is_empty());
        assert!(!report.state_changed);
        assert!(report.clamped);

        for _ in 0..10 {
            proc(&mut mc, dpad(DirectionOctant::Right));
            assert!(mc.state().gait_type.index() <= 4);
        }
        assert_eq!(mc.state().gait_type, GaitType::Wave24);
    }

    #[test]
    fn test_body_height_bounds() {
        let mut mc = ModeCtrl::default();

        let (out, _) = proc(&mut mc, dpad(DirectionOctant::Up));
        assert_eq!(
            out.gait_cmds,
            vec![GaitCmd::BodyPosition {
                rot_x: 0.0,
                rot_z: 0.0,
                pos_x: 0.0,
                pos_z: 0.0,
                pos_y: 25.0
            }]
        );

        let sequence = [
            DirectionOctant::Up,
            DirectionOctant::Down,
            DirectionOctant::Down,
            DirectionOctant::Up,
        ];
        for i in 0..200 {
            let d = if i < 100 {
                DirectionOctant::Up
            } else {
                sequence[i % sequence.len()]
            };
            proc(&mut mc, dpad(d));
            let y = mc.state().body_pos_y;
            assert!(y >= 5.0 && y <= 90.0);
        }

        for _ in 0..50 {
            proc(&mut mc, dpad(DirectionOctant::Down));
        }
        assert_eq!(mc.state().body_pos_y, 5.0);

        // At the boundary nothing is sent
        let (out, _) = proc(&mut mc, dpad(DirectionOctant::Down));
        assert!(out.gait_cmds.is_empty());

        // Diagonals and release are ignored
        let (out, _) = proc(&mut mc, dpad(DirectionOctant::UpRight));
        assert!(out.gait_cmds.is_empty());
        let (out, _) = proc(&mut mc, dpad(DirectionOctant::None));
        assert!(out.gait_cmds.is_empty());
    }

    #[test]
    fn test_start_toggle() {
        let mut mc = ModeCtrl::default();

        // Change gait so the reset to the start style is visible
        proc(&mut mc, dpad(DirectionOctant::Right));
        proc(&mut mc, ModeEvent::RightTrigger(5000));

        let (out, report) = proc(&mut mc, ModeEvent::Function(FunctionButton::Start));
        assert!(report.state_changed);
        assert!(mc.state().movement_enabled);
        assert_eq!(mc.state().gait_type, GaitType::TripleTripod12);
        assert_eq!(
            out.gait_cmds,
            vec![
                GaitCmd::MovementVector {
                    speed: 70.0,
                    travel_x: 35.0,
                    travel_z: 0.0,
                    rotation_y: 0.0
                },
                GaitCmd::GaitOptions {
                    speed: 70.0,
                    leg_lift_height: 30.0
                },
                GaitCmd::GaitType(GaitType::TripleTripod12),
                GaitCmd::MovementEnabled(true),
            ]
        );

        let (out, _) = proc(&mut mc, ModeEvent::Function(FunctionButton::Start));
        assert!(!mc.state().movement_enabled);
        assert_eq!(
            out.gait_cmds,
            vec![
                GaitCmd::MovementVector {
                    speed: 0.0,
                    travel_x: 0.0,
                    travel_z: 0.0,
                    rotation_y: 0.0
                },
                GaitCmd::MovementEnabled(false),
            ]
        );

        // Travel targets survive the disable
        assert_eq!(mc.state().travel_length_x, 35.0);
    }

    #[test]
    fn test_triggers() {
        let mut mc = ModeCtrl::default();

        let (out, _) = proc(&mut mc, ModeEvent::LeftTrigger(10000));
        assert_eq!(mc.state().travel_length_x, -70.0);
        assert_eq!(
            out.gait_cmds,
            vec![GaitCmd::MovementVector {
                speed: 70.0,
                travel_x: -70.0,
                travel_z: 0.0,
                rotation_y: 0.0
            }]
        );

        // Past full scale is clamped to the limit
        let (_, report) = proc(&mut mc, ModeEvent::RightTrigger(32768));
        assert_eq!(mc.state().travel_length_x, 70.0);
        assert!(report.clamped);

        proc(&mut mc, ModeEvent::RightTrigger(0));
        assert_eq!(mc.state().travel_length_x, 0.0);
    }

    #[test]
    fn test_right_stick_table() {
        let mut mc = ModeCtrl::default();
        let full = |d| ModeEvent::RightStick(DirectionalVector::new(d, MAX_MAGNITUDE));

        let cases = [
            (DirectionOctant::Left, -3.0, 0.0),
            (DirectionOctant::Right, 3.0, 0.0),
            (DirectionOctant::Up, 0.0, -160.0),
            (DirectionOctant::Down, 0.0, 160.0),
            (DirectionOctant::UpLeft, -3.0, -160.0),
            (DirectionOctant::UpRight, 3.0, -160.0),
            (DirectionOctant::DownLeft, -3.0, 90.0),
            (DirectionOctant::DownRight, 3.0, 90.0),
        ];

        for &(d, rot, z) in cases.iter() {
            let (out, _) = proc(&mut mc, full(d));
            assert_eq!(mc.state().travel_rotation_y, rot, "{:?}", d);
            assert_eq!(mc.state().travel_length_z, z, "{:?}", d);
            assert_eq!(
                out.gait_cmds,
                vec![GaitCmd::MovementVector {
                    speed: 70.0,
                    travel_x: 0.0,
                    travel_z: z,
                    rotation_y: rot
                }]
            );
        }

        // Half stick is half the limit
        proc(
            &mut mc,
            ModeEvent::RightStick(DirectionalVector::new(DirectionOctant::Up, 5000)),
        );
        assert_eq!(mc.state().travel_length_z, -80.0);

        proc(&mut mc, ModeEvent::RightStick(DirectionalVector::ZERO));
        assert_eq!(mc.state().travel_length_z, 0.0);
        assert_eq!(mc.state().travel_rotation_y, 0.0);
    }

    #[test]
    fn test_left_stick_modes() {
        let mut mc = ModeCtrl::default();
        let full = |d| ModeEvent::LeftStick(DirectionalVector::new(d, MAX_MAGNITUDE));

        let cases = [
            (DirectionOctant::Up, 1.0, 0.0),
            (DirectionOctant::UpRight, 1.0, 1.0),
            (DirectionOctant::Right, 0.0, 1.0),
            (DirectionOctant::DownRight, -1.0, 1.0),
            (DirectionOctant::Down, -1.0, 0.0),
            (DirectionOctant::DownLeft, -1.0, -1.0),
            (DirectionOctant::Left, 0.0, -1.0),
            (DirectionOctant::UpLeft, 1.0, -1.0),
            (DirectionOctant::None, 0.0, 0.0),
        ];

        // Rotation outside of the horizontal translation mode
        for &(d, first, second) in cases.iter() {
            proc(&mut mc, full(d));
            assert_eq!(mc.state().body_rot_x1, first * 8.0, "{:?}", d);
            assert_eq!(mc.state().body_rot_z1, second * 8.0, "{:?}", d);
            assert_eq!(mc.state().body_pos_x, 0.0);
        }

        let mc_params = Params {
            x_button_action: XButtonAction::TranslateHorizontal,
            ..Params::default()
        };
        let mut mc = ModeCtrl::new(mc_params).unwrap();
        proc(&mut mc, ModeEvent::Function(FunctionButton::X));
        assert_eq!(
            mc.state().selected_function,
            SelectedFunction::TranslateHorizontal
        );

        for &(d, first, second) in cases.iter() {
            let (out, _) = proc(&mut mc, full(d));
            assert_eq!(mc.state().body_pos_x, first * 30.0, "{:?}", d);
            assert_eq!(mc.state().body_pos_z, second * 30.0, "{:?}", d);
            assert_eq!(mc.state().body_rot_x1, 0.0);
            assert_eq!(
                out.gait_cmds,
                vec![GaitCmd::BodyPosition {
                    rot_x: 0.0,
                    rot_z: 0.0,
                    pos_x: first * 30.0,
                    pos_z: second * 30.0,
                    pos_y: 20.0
                }]
            );
        }
    }

    #[test]
    fn test_x_fires_actuator() {
        let mut mc = ModeCtrl::default();
        let before = *mc.state();

        let (out, report) = proc(&mut mc, ModeEvent::Function(FunctionButton::X));
        assert_eq!(out.side_effects, vec![SideEffect::FireActuator]);
        assert!(out.gait_cmds.is_empty());
        assert!(!report.state_changed);
        assert_eq!(*mc.state(), before);
    }

    #[test]
    fn test_waypoint_save() {
        let mut mc = ModeCtrl::default();

        // Without a fix Back does nothing
        let (out, _) = proc(&mut mc, ModeEvent::Function(FunctionButton::Back));
        assert_eq!(out, OutputData::default());

        let fix = GeoCoord {
            lat_deg: 52.2,
            lon_deg: 0.12,
        };
        let (out, report) = proc(&mut mc, ModeEvent::GpsFix(fix));
        assert_eq!(out, OutputData::default());
        assert!(!report.state_changed);

        let (out, _) = proc(&mut mc, ModeEvent::Function(FunctionButton::Back));
        assert_eq!(out.side_effects, vec![SideEffect::SaveWaypoint(fix)]);
    }

    #[test]
    fn test_unknown_button_ignored() {
        let mut mc = ModeCtrl::default();
        let before = *mc.state();

        let (out, report) = proc(&mut mc, ModeEvent::Function(FunctionButton::Other(9)));
        assert_eq!(out, OutputData::default());
        assert_eq!(report, StatusReport::default());
        assert_eq!(*mc.state(), before);
    }

    #[test]
    fn test_publishes_to_shared() {
        let mut mc = ModeCtrl::default();
        let shared = mc.shared_state();

        proc(&mut mc, ModeEvent::Bumper(Bumper::Right));
        assert_eq!(shared.snapshot().gait_speed, 75.0);
        assert_eq!(shared.snapshot(), *mc.state());
    }

    #[test]
    fn test_new_rejects_invalid() {
        let p = Params {
            leg_lift_height_upper_limit: 10.0,
            ..Params::default()
        };
        assert!(ModeCtrl::new(p).is_err());
    }
}
