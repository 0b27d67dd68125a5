//! Jumper bounce integration
//!
//! The jumper is a fixed-period oscillator: it leaves the ground with `v0`,
//! falls back under constant gravity and relaunches on contact. Frames are
//! split into equal substeps no longer than the tuned inner step, so the
//! period does not depend on frame rate or on a long stalled frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tuning::JumpTuning;

/// Slack when splitting a frame so 1/60 s maps to two 1/120 s substeps
/// instead of three
const SUBSTEP_SLACK: f32 = 1e-4;

/// Launch velocity giving exactly one up-down cycle per `period`
#[inline]
pub fn launch_velocity(gravity: f32, period: f32) -> f32 {
    0.5 * gravity * period
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumperState {
    /// Standing position captured from the scene
    pub base_position: Vec3,
    /// Offset above `base_position` along the up axis, never negative
    pub height: f32,
    pub vertical_velocity: f32,
    pub airborne: bool,
    /// `airborne` as of the previous frame, for edge detection
    pub airborne_prev: bool,
    /// Current bounce period (seconds)
    pub period: f32,
    /// Gravity for the next flight; rescaled with the period to keep the
    /// apex fixed
    pub gravity: f32,
    /// Upward velocity applied at each ground contact
    pub launch_velocity: f32,
    /// Ground contacts since spawn
    pub landings: u64,
    /// Touched the ground during the last `advance`, even if it has
    /// already relaunched above `airborne_epsilon`
    pub touched_down: bool,
    /// Gravity of the flight in progress
    flight_gravity: f32,
    up_axis: Vec3,
}

impl JumperState {
    /// Jumper standing at `base_position`, about to launch
    pub fn new(base_position: Vec3, tuning: &JumpTuning) -> Self {
        let v0 = launch_velocity(tuning.gravity, tuning.period);
        Self {
            base_position,
            height: 0.0,
            vertical_velocity: v0,
            airborne: false,
            airborne_prev: false,
            period: tuning.period,
            gravity: tuning.gravity,
            launch_velocity: v0,
            landings: 0,
            touched_down: false,
            flight_gravity: tuning.gravity,
            up_axis: tuning.up_axis.normalize_or_zero(),
        }
    }

    /// World position for the render layer
    pub fn position(&self) -> Vec3 {
        self.base_position + self.up_axis * self.height
    }

    /// Highest point of the bounce at the current tempo
    pub fn apex_height(&self) -> f32 {
        self.gravity * self.period * self.period / 8.0
    }

    /// Advance by one frame's elapsed time and refresh the airborne flags
    pub fn advance(&mut self, elapsed: f32, tuning: &JumpTuning) {
        self.airborne_prev = self.airborne;
        self.touched_down = false;

        if elapsed.is_finite() && elapsed > 0.0 {
            let steps = (elapsed / tuning.substep - SUBSTEP_SLACK).ceil().max(1.0) as u32;
            let dt = elapsed / steps as f32;
            for _ in 0..steps {
                self.substep(dt);
            }
        }

        self.airborne = self.height > tuning.airborne_epsilon;
    }

    /// Exact constant-acceleration step; a ground contact inside the step
    /// relaunches for whatever time is left
    fn substep(&mut self, dt: f32) {
        let g = self.flight_gravity;
        let v = self.vertical_velocity;
        let next = self.height + v * dt - 0.5 * g * dt * dt;
        if next > 0.0 {
            self.height = next;
            self.vertical_velocity = v - g * dt;
            return;
        }

        let touchdown = ((v + (v * v + 2.0 * g * self.height).sqrt()) / g).clamp(0.0, dt);
        let rest = dt - touchdown;
        let g = self.gravity;
        let v0 = self.launch_velocity;
        self.flight_gravity = g;
        self.height = (v0 * rest - 0.5 * g * rest * rest).max(0.0);
        self.vertical_velocity = v0 - g * rest;
        self.landings += 1;
        self.touched_down = true;
    }

    /// Set the bounce period, keeping the apex height unchanged
    ///
    /// Takes effect from the next launch; the current flight finishes on its
    /// old arc.
    pub fn set_period(&mut self, period: f32, tuning: &JumpTuning) {
        let period = period.clamp(tuning.min_period, tuning.period);
        let ratio = tuning.period / period;
        self.period = period;
        self.gravity = tuning.gravity * ratio * ratio;
        self.launch_velocity = launch_velocity(self.gravity, period);
    }

    /// Shorten the period after a scored landing. Returns true if it changed
    pub fn speed_up(&mut self, tuning: &JumpTuning) -> bool {
        let before = self.period;
        self.set_period(before * tuning.speedup, tuning);
        self.period < before
    }

    /// Back to the starting tempo. Returns true if it changed
    pub fn reset_tempo(&mut self, tuning: &JumpTuning) -> bool {
        let before = self.period;
        self.set_period(tuning.period, tuning);
        self.period != before
    }
}
