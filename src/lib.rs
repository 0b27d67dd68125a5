//! Skip Rope - timing-based skipping-rope game core
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (jumper, rope, control panel, pass detection, score)
//! - `session`: Host-facing orchestrator wiring the simulation to a scene
//! - `scene`: Named transform arena owned by the engine side
//! - `input`: Platform-agnostic input events and per-frame buffering
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod input;
pub mod scene;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use session::Session;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Inner jumper integration step (120 Hz)
    pub const SUBSTEP_DT: f32 = 1.0 / 120.0;

    /// Reference frame time used by the demo and tests
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Rope angle with the rope directly beneath the jumper (6 o'clock)
    pub const UNDER_ANGLE: f32 = std::f32::consts::PI;
}

/// Wrap an angle into [-π, π]
///
/// Goes through `atan2(sin, cos)` so arbitrarily large inputs reduce without
/// looping on multiples of 2π.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    angle.sin().atan2(angle.cos())
}

/// Signed shortest rotation taking `b` onto `a`, in [-π, π]
#[inline]
pub fn shortest_delta(a: f32, b: f32) -> f32 {
    wrap_angle(a - b)
}

/// Angle of `v` measured from 12 o'clock (+Y), increasing clockwise
///
/// Returns `None` for a zero-length vector, which has no direction.
#[inline]
pub fn clockwise_angle_from_up(v: Vec2) -> Option<f32> {
    if v.length_squared() <= f32::EPSILON * f32::EPSILON {
        return None;
    }
    Some(v.x.atan2(v.y))
}
