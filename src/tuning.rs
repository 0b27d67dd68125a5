//! Data-driven game balance
//!
//! Every magnitude the simulation depends on lives here with its default, so
//! tests can pin exact values and designers can ship a JSON override.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{SUBSTEP_DT, UNDER_ANGLE};
use crate::error::{Error, Result};

/// Jumper bounce parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpTuning {
    /// Downward acceleration at the starting tempo (scene units/s²)
    pub gravity: f32,
    /// Seconds per full up-down cycle at the starting tempo
    pub period: f32,
    /// Inner integration step (seconds)
    pub substep: f32,
    /// Height above which the jumper counts as airborne
    pub airborne_epsilon: f32,
    /// Period multiplier applied after each scored landing (1.0 = off)
    pub speedup: f32,
    /// Shortest period the speed-up may reach
    pub min_period: f32,
    /// World direction the jumper rises along
    pub up_axis: Vec3,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            period: 1.0,
            substep: SUBSTEP_DT,
            airborne_epsilon: 0.1,
            speedup: 0.9,
            min_period: 0.1,
            up_axis: Vec3::Z,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RopeTuning {
    /// Maximum rope angular speed (radians/s)
    pub slew_rate: f32,
    /// Local axis the rope spins around (runs through both anchors)
    pub spin_axis: Vec3,
    /// Rope angle at session start (0 = overhead)
    pub initial_angle: f32,
}

impl Default for RopeTuning {
    fn default() -> Self {
        Self {
            slew_rate: 360.0_f32.to_radians(),
            spin_axis: Vec3::Y,
            initial_angle: 0.0,
        }
    }
}

/// Circular control panel, in overlay units (x in ±aspect, y in ±1)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelTuning {
    pub radius: f32,
    /// Gap between the panel edge and the bottom-right screen corner
    pub margin: f32,
    /// Deadzone radius as a fraction of `radius`
    pub dead_fraction: f32,
}

impl Default for PanelTuning {
    fn default() -> Self {
        Self {
            radius: 0.22,
            margin: 0.10,
            dead_fraction: 0.06,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorTuning {
    /// Rope angle directly beneath the jumper
    pub under_angle: f32,
    /// Crossings with both deltas this close to ±π are wrap artifacts
    pub near_pi_window: f32,
    /// Rope within this angle of `under_angle` can hit the feet
    pub collide_window: f32,
    /// Jumper height at or below which the rope catches the feet
    pub foot_clearance: f32,
    /// Seconds between consecutive collision resets
    pub collision_cooldown: f32,
    /// Noise band around `under_angle` ignored by the crossing test
    pub pass_epsilon: f32,
}

impl Default for DetectorTuning {
    fn default() -> Self {
        Self {
            under_angle: UNDER_ANGLE,
            near_pi_window: 20.0_f32.to_radians(),
            collide_window: 20.0_f32.to_radians(),
            foot_clearance: 0.10,
            collision_cooldown: 0.3,
            pass_epsilon: 3.0_f32.to_radians(),
        }
    }
}

/// Names of the scene transforms the game binds to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneNames {
    pub jumper: String,
    pub rope: String,
    pub left_anchor: String,
    pub right_anchor: String,
}

impl Default for SceneNames {
    fn default() -> Self {
        Self {
            jumper: "Jumper".to_string(),
            rope: "Rope".to_string(),
            left_anchor: "Blob1".to_string(),
            right_anchor: "Blob2".to_string(),
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub jump: JumpTuning,
    pub rope: RopeTuning,
    pub panel: PanelTuning,
    pub detector: DetectorTuning,
    pub scene: SceneNames,
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let jump = &self.jump;
        positive("jump.gravity", jump.gravity)?;
        positive("jump.period", jump.period)?;
        positive("jump.substep", jump.substep)?;
        positive("jump.min_period", jump.min_period)?;
        non_negative("jump.airborne_epsilon", jump.airborne_epsilon)?;
        if !(jump.speedup > 0.0 && jump.speedup <= 1.0) {
            return Err(invalid("jump.speedup", format!("{} is outside (0, 1]", jump.speedup)));
        }
        if jump.min_period > jump.period {
            return Err(invalid(
                "jump.min_period",
                format!("{} exceeds jump.period {}", jump.min_period, jump.period),
            ));
        }
        unit_axis("jump.up_axis", jump.up_axis)?;

        positive("rope.slew_rate", self.rope.slew_rate)?;
        unit_axis("rope.spin_axis", self.rope.spin_axis)?;
        finite("rope.initial_angle", self.rope.initial_angle)?;

        positive("panel.radius", self.panel.radius)?;
        non_negative("panel.margin", self.panel.margin)?;
        if !(0.0..1.0).contains(&self.panel.dead_fraction) {
            return Err(invalid(
                "panel.dead_fraction",
                format!("{} is outside [0, 1)", self.panel.dead_fraction),
            ));
        }

        let det = &self.detector;
        finite("detector.under_angle", det.under_angle)?;
        for (field, window) in [
            ("detector.near_pi_window", det.near_pi_window),
            ("detector.collide_window", det.collide_window),
            ("detector.pass_epsilon", det.pass_epsilon),
        ] {
            non_negative(field, window)?;
            if window >= std::f32::consts::PI {
                return Err(invalid(field, format!("{window} must be below π")));
            }
        }
        non_negative("detector.foot_clearance", det.foot_clearance)?;
        positive("detector.collision_cooldown", det.collision_cooldown)?;

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> Error {
    Error::InvalidTuning { field, reason }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is not finite")))
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be positive")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must not be negative")))
    }
}

fn unit_axis(field: &'static str, axis: Vec3) -> Result<()> {
    if axis.is_finite() && (axis.length() - 1.0).abs() < 1e-3 {
        Ok(())
    } else {
        Err(invalid(field, format!("{axis} is not a unit vector")))
    }
}
