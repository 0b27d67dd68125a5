//! Circular control panel mapping pointer drags onto a rope target angle
//!
//! The panel lives in overlay space: x spans ±aspect, y spans ±1, y up. It
//! sits in the bottom-right corner and owns a draggable handle clamped to
//! its disk. The handle's bearing from 12 o'clock (clockwise positive)
//! becomes the rope target with the sign flipped.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::clockwise_angle_from_up;
use crate::tuning::PanelTuning;

/// Width / height, or `None` while the window has no area
pub fn aspect_ratio(window: UVec2) -> Option<f32> {
    if window.x == 0 || window.y == 0 {
        return None;
    }
    Some(window.x as f32 / window.y as f32)
}

/// Window pixel (origin top-left, y down) to overlay coordinates
pub fn pixel_to_overlay(pixel: Vec2, window: UVec2) -> Option<Vec2> {
    let aspect = aspect_ratio(window)?;
    let size = window.as_vec2();
    Some(Vec2::new(
        (pixel.x / size.x * 2.0 - 1.0) * aspect,
        1.0 - pixel.y / size.y * 2.0,
    ))
}

/// Overlay coordinates back to window pixels
pub fn overlay_to_pixel(point: Vec2, window: UVec2) -> Option<Vec2> {
    let aspect = aspect_ratio(window)?;
    let size = window.as_vec2();
    Some(Vec2::new(
        (point.x / aspect + 1.0) * 0.5 * size.x,
        (1.0 - point.y) * 0.5 * size.y,
    ))
}

/// What the panel did with a pointer sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// Not on the panel; another handler may use it
    Ignored,
    /// Handled, but the target did not change (deadzone, release)
    Consumed,
    /// Handled and the rope should steer toward this angle
    Steered(f32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelState {
    /// Recomputed from the window aspect each frame
    pub center: Vec2,
    pub radius: f32,
    /// Gap from the panel edge to the screen corner
    pub margin: f32,
    /// Pointer went down on the panel and has not been released
    pub dragging: bool,
    /// Always inside the disk; stays put on release
    pub handle_position: Vec2,
    pub dead_fraction: f32,
    /// Handle bearing from 12 o'clock, clockwise positive
    pub angle: f32,
}

impl PanelState {
    pub fn new(tuning: &PanelTuning) -> Self {
        let mut panel = Self {
            center: Vec2::ZERO,
            radius: tuning.radius,
            margin: tuning.margin,
            dragging: false,
            handle_position: Vec2::ZERO,
            dead_fraction: tuning.dead_fraction,
            angle: 0.0,
        };
        panel.layout(1.0);
        panel.handle_position = panel.center;
        panel
    }

    /// Deadzone radius in overlay units
    pub fn dead_radius(&self) -> f32 {
        self.dead_fraction * self.radius
    }

    /// Rope target implied by the current handle bearing
    pub fn target_angle(&self) -> f32 {
        -self.angle
    }

    /// Re-anchor the panel to the bottom-right corner for a given aspect.
    /// The handle moves with the panel.
    pub fn layout(&mut self, aspect: f32) {
        let inset = self.margin + self.radius;
        let center = Vec2::new(aspect - inset, -1.0 + inset);
        self.handle_position += center - self.center;
        self.center = center;
    }

    /// Overlay point at `bearing` (clockwise from 12 o'clock), `reach`
    /// fractions of the radius out from the center
    pub fn point_at(&self, bearing: f32, reach: f32) -> Vec2 {
        self.center + Vec2::new(bearing.sin(), bearing.cos()) * self.radius * reach
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) <= self.radius
    }

    pub fn pointer_down(&mut self, point: Vec2) -> PointerOutcome {
        if !self.contains(point) {
            return PointerOutcome::Ignored;
        }
        self.dragging = true;
        self.place_handle(point)
    }

    pub fn pointer_move(&mut self, point: Vec2) -> PointerOutcome {
        if !self.dragging {
            return PointerOutcome::Ignored;
        }
        self.place_handle(point)
    }

    pub fn pointer_up(&mut self) -> PointerOutcome {
        if !self.dragging {
            return PointerOutcome::Ignored;
        }
        self.dragging = false;
        PointerOutcome::Consumed
    }

    /// Clamp the pointer onto the disk and update the bearing unless the
    /// handle sits inside the deadzone
    fn place_handle(&mut self, point: Vec2) -> PointerOutcome {
        let offset = (point - self.center).clamp_length_max(self.radius);
        self.handle_position = self.center + offset;

        if offset.length() <= self.dead_radius() {
            return PointerOutcome::Consumed;
        }
        match clockwise_angle_from_up(offset) {
            Some(angle) => {
                self.angle = angle;
                PointerOutcome::Steered(self.target_angle())
            }
            None => PointerOutcome::Consumed,
        }
    }
}
