//! Game state and core simulation types
//!
//! Each component owns its own state struct; `GameState` only groups them so
//! `tick` can run them in a fixed order.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::detector::DetectionState;
use super::jumper::JumperState;
use super::panel::PanelState;
use super::rope::RopeState;
use crate::tuning::Tuning;

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Jumper left the ground; a new flight begins
    TookOff,
    /// Rope swept under the feet during the current flight
    RopePassed,
    Landed { scored: bool },
    Scored { score: u32 },
    /// Rope caught the feet; `lost` is the score that was wiped
    Collision { lost: u32 },
    /// Jump period changed (seconds)
    TempoChanged { period: f32 },
}

/// Running score. Only the detector changes it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreState {
    score: u32,
    best: u32,
}

impl ScoreState {
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Highest score reached this session
    pub fn best(&self) -> u32 {
        self.best
    }

    pub(crate) fn increment(&mut self) {
        self.score = self.score.saturating_add(1);
        self.best = self.best.max(self.score);
    }

    /// Zero the score, returning what was lost
    pub(crate) fn reset(&mut self) -> u32 {
        std::mem::take(&mut self.score)
    }
}

/// Transforms captured from the scene at setup
#[derive(Debug, Clone, Copy)]
pub struct InitialPose {
    pub jumper_position: Vec3,
    pub rope_rotation: Quat,
    pub anchor_left: Vec3,
    pub anchor_right: Vec3,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub jumper: JumperState,
    pub rope: RopeState,
    pub panel: PanelState,
    pub detection: DetectionState,
    pub score: ScoreState,
    /// Frames simulated so far
    pub frame: u64,
    /// Seconds simulated so far
    pub time: f64,
}

impl GameState {
    pub fn new(pose: InitialPose, tuning: &Tuning) -> Self {
        let rope = RopeState::new(pose.anchor_left, pose.anchor_right, pose.rope_rotation, &tuning.rope);
        let detection = DetectionState::new(rope.current_angle, &tuning.detector);
        Self {
            jumper: JumperState::new(pose.jumper_position, &tuning.jump),
            rope,
            panel: PanelState::new(&tuning.panel),
            detection,
            score: ScoreState::default(),
            frame: 0,
            time: 0.0,
        }
    }

    /// Read-only snapshot for the render layer
    pub fn view(&self) -> RenderView {
        RenderView {
            rope_angle: self.rope.current_angle,
            rope_target: self.rope.target_angle,
            rope_angular_velocity: self.rope.angular_vel,
            rope_position: self.rope.position,
            rope_rotation: self.rope.rotation,
            jumper_height: self.jumper.height,
            jumper_position: self.jumper.position(),
            jumper_airborne: self.jumper.airborne,
            jump_period: self.jumper.period,
            panel: PanelView {
                center: self.panel.center,
                radius: self.panel.radius,
                dead_radius: self.panel.dead_radius(),
                handle: self.panel.handle_position,
                dragging: self.panel.dragging,
            },
            score: self.score.score(),
            best_score: self.score.best(),
        }
    }
}

/// Control panel geometry for drawing the widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelView {
    pub center: Vec2,
    pub radius: f32,
    pub dead_radius: f32,
    pub handle: Vec2,
    pub dragging: bool,
}

/// Everything the render layer reads after an update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderView {
    pub rope_angle: f32,
    pub rope_target: f32,
    /// Signed turn rate of the last step (radians/s)
    pub rope_angular_velocity: f32,
    pub rope_position: Vec3,
    pub rope_rotation: Quat,
    pub jumper_height: f32,
    pub jumper_position: Vec3,
    pub jumper_airborne: bool,
    pub jump_period: f32,
    pub panel: PanelView,
    pub score: u32,
    pub best_score: u32,
}
