//! First-person camera controls driven by a controller snapshot.

use crate::input::{buttons, PadReport, STICK_CENTER};
use crate::math::{icos, isin};
use crate::scene::camera::Camera;

/// Tuning for [`ControlState::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlConfig {
    /// Stick readings strictly inside `(dead_zone_low, dead_zone_high)` are ignored.
    pub dead_zone_low: u8,
    pub dead_zone_high: u8,
    /// Movement speed multiplier for the left stick.
    pub move_speed: i32,
    /// Look sensitivity multiplier for the right stick.
    pub look_sensitivity: i32,
    /// World units moved per frame while L2 or R2 is held.
    pub vertical_step: i32,
    /// Pitch is clamped to `[-pitch_limit, pitch_limit]`.
    pub pitch_limit: i16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            dead_zone_low: 100,
            dead_zone_high: 156,
            move_speed: 30,
            look_sensitivity: 10,
            vertical_step: 16,
            pitch_limit: 1024,
        }
    }
}

impl ControlConfig {
    /// Signed deflection of a stick axis, or `None` inside the dead zone.
    fn deflection(&self, axis: u8) -> Option<i32> {
        (axis > self.dead_zone_high || axis < self.dead_zone_low)
            .then(|| i32::from(axis) - i32::from(STICK_CENTER))
    }
}

/// Toggles and button history carried from frame to frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlState {
    pub show_help: bool,
    pub textured: bool,
    previous_buttons: u16,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ControlState {
    pub fn new(show_help: bool, textured: bool) -> Self {
        Self {
            show_help,
            textured,
            previous_buttons: 0,
        }
    }

    /// Update `camera` and the toggles from this frame's controller snapshot.
    ///
    /// No snapshot leaves the camera untouched and releases all buttons.
    pub fn apply(&mut self, camera: &mut Camera, report: Option<&PadReport>, config: &ControlConfig) {
        let Some(report) = report else {
            self.previous_buttons = 0;
            return;
        };

        let pressed = report.buttons & !self.previous_buttons;
        self.previous_buttons = report.buttons;

        if pressed & buttons::TRIANGLE != 0 {
            self.show_help = !self.show_help;
        }
        if pressed & buttons::SQUARE != 0 {
            self.textured = !self.textured;
        }

        if report.is_pressed(buttons::L2) {
            camera.position.y += config.vertical_step;
        }
        if report.is_pressed(buttons::R2) {
            camera.position.y -= config.vertical_step;
        }

        if report.is_analog() {
            move_camera(camera, report, config);
            look_camera(camera, report, config);
        }
    }
}

fn move_camera(camera: &mut Camera, report: &PadReport, config: &ControlConfig) {
    let sin = i32::from(isin(camera.yaw.into()));
    let cos = i32::from(icos(camera.yaw.into()));
    let step = |d: i32, f: i32| (((d * f) >> 6) * config.move_speed) >> 12;

    if let Some(d) = config.deflection(report.lx) {
        camera.position.x += step(d, cos);
        camera.position.z -= step(d, -sin);
    }
    if let Some(d) = config.deflection(report.ly) {
        camera.position.x += step(d, sin);
        camera.position.z -= step(d, cos);
    }
}

fn look_camera(camera: &mut Camera, report: &PadReport, config: &ControlConfig) {
    if let Some(d) = config.deflection(report.rx) {
        let delta = (d >> 6) * config.look_sensitivity;
        camera.yaw = camera.yaw.wrapping_sub(delta as i16);
    }
    if let Some(d) = config.deflection(report.ry) {
        let delta = (d >> 6) * config.look_sensitivity;
        camera.pitch = camera
            .pitch
            .wrapping_add(delta as i16)
            .clamp(-config.pitch_limit, config.pitch_limit);
    }
}
