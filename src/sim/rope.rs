//! Rope slew controller
//!
//! The rope is one rigid angular degree of freedom hung between two anchors.
//! It turns toward the player's target along the shorter direction, never
//! faster than its slew rate.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::tuning::RopeTuning;
use crate::{shortest_delta, wrap_angle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RopeState {
    /// Anchor positions as last read from the scene
    pub anchor_left: Vec3,
    pub anchor_right: Vec3,
    /// Rope origin, kept at the anchors' midpoint
    pub position: Vec3,
    /// Orientation captured from the scene at setup
    pub base_rotation: Quat,
    /// `base_rotation` turned by `current_angle` about the spin axis
    pub rotation: Quat,
    /// Current angle (radians, 0 = overhead, π = under the feet)
    pub current_angle: f32,
    /// Angle the player is steering toward
    pub target_angle: f32,
    /// Max angular speed (radians/s)
    pub slew_rate: f32,
    /// Angular velocity of the last step
    pub angular_vel: f32,
    spin_axis: Vec3,
}

impl RopeState {
    pub fn new(anchor_left: Vec3, anchor_right: Vec3, base_rotation: Quat, tuning: &RopeTuning) -> Self {
        let mut rope = Self {
            anchor_left,
            anchor_right,
            position: Vec3::ZERO,
            base_rotation,
            rotation: base_rotation,
            current_angle: tuning.initial_angle,
            target_angle: tuning.initial_angle,
            slew_rate: tuning.slew_rate,
            angular_vel: 0.0,
            spin_axis: tuning.spin_axis.normalize_or_zero(),
        };
        rope.position = rope.midpoint();
        rope.rotation = rope.orientation();
        rope
    }

    /// Midpoint between the anchors
    pub fn midpoint(&self) -> Vec3 {
        (self.anchor_left + self.anchor_right) * 0.5
    }

    /// Update anchors (they may be animated by the scene)
    pub fn set_anchors(&mut self, left: Vec3, right: Vec3) {
        self.anchor_left = left;
        self.anchor_right = right;
    }

    /// Turn toward the target by at most `slew_rate * dt`, taking the
    /// shorter way round
    pub fn move_toward(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            self.angular_vel = 0.0;
            return;
        }

        let delta = shortest_delta(self.target_angle, self.current_angle);
        let max_delta = self.slew_rate * dt;
        let clamped_delta = delta.clamp(-max_delta, max_delta);

        self.angular_vel = clamped_delta / dt;
        self.current_angle += clamped_delta;
        // Only fold back once a full turn has accumulated so small moves stay exact
        if self.current_angle.abs() > std::f32::consts::TAU {
            self.current_angle = wrap_angle(self.current_angle);
        }
    }

    /// Full per-frame update: recenter, slew, rebuild orientation
    pub fn advance(&mut self, dt: f32) {
        self.position = self.midpoint();
        self.move_toward(dt);
        self.rotation = self.orientation();
    }

    fn orientation(&self) -> Quat {
        self.base_rotation * Quat::from_axis_angle(self.spin_axis, self.current_angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn rope(slew_rate: f32) -> RopeState {
        let tuning = RopeTuning {
            slew_rate,
            ..Default::default()
        };
        RopeState::new(
            Vec3::new(0.0, -2.0, 1.0),
            Vec3::new(0.0, 2.0, 1.0),
            Quat::IDENTITY,
            &tuning,
        )
    }

    #[test]
    fn test_step_is_rate_limited() {
        let mut rope = rope(PI);
        rope.target_angle = FRAC_PI_2;
        rope.move_toward(0.1);
        assert!((rope.current_angle - 0.1 * PI).abs() < 1e-6);
        assert!((rope.angular_vel - PI).abs() < 1e-4);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut rope = rope(PI);
        rope.target_angle = FRAC_PI_2;
        for _ in 0..10 {
            rope.move_toward(0.1);
            assert!(rope.current_angle <= FRAC_PI_2 + 1e-6);
        }
        assert!((rope.current_angle - FRAC_PI_2).abs() < 1e-6);

        let settled = rope.current_angle;
        rope.move_toward(0.1);
        assert!((rope.current_angle - settled).abs() < 1e-6);
    }

    #[test]
    fn test_takes_shorter_direction_across_wrap() {
        let mut rope = rope(PI);
        rope.current_angle = 170.0_f32.to_radians();
        rope.target_angle = (-170.0_f32).to_radians();
        rope.move_toward(0.01);
        // Moves up through 180°, not back down through 0°
        assert!(rope.current_angle > 170.0_f32.to_radians());
    }

    #[test]
    fn test_zero_dt_holds_angle() {
        let mut rope = rope(PI);
        rope.target_angle = 1.0;
        rope.move_toward(0.0);
        assert_eq!(rope.current_angle, 0.0);
        assert_eq!(rope.angular_vel, 0.0);
    }

    #[test]
    fn test_advance_recenters_on_moving_anchors() {
        let mut rope = rope(PI);
        rope.set_anchors(Vec3::new(1.0, -2.0, 1.0), Vec3::new(1.0, 4.0, 3.0));
        rope.advance(0.016);
        assert_eq!(rope.position, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn test_orientation_composes_base_rotation() {
        let mut rope = rope(PI);
        rope.base_rotation = Quat::from_rotation_z(0.3);
        rope.target_angle = 0.2;
        rope.advance(1.0);
        let expected = Quat::from_rotation_z(0.3) * Quat::from_rotation_y(0.2);
        assert!(rope.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_long_spin_stays_bounded() {
        let mut rope = rope(PI);
        // Chase a target that keeps running ahead
        for _ in 0..400 {
            rope.target_angle = rope.current_angle + 1.0;
            rope.move_toward(0.1);
        }
        assert!(rope.current_angle.abs() <= std::f32::consts::TAU + 0.5);
    }
}
