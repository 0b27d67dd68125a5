//! Per-frame simulation step
//!
//! Order is fixed: pointer input sets the rope target, the rope slews, the
//! jumper integrates, then the detector reads both and updates the score.

use glam::UVec2;

use super::panel::{PointerOutcome, aspect_ratio, pixel_to_overlay};
use super::state::{GameEvent, GameState};
use crate::input::InputEvent;
use crate::tuning::Tuning;

/// Input buffered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer samples in arrival order; key events are skipped
    pub events: Vec<InputEvent>,
    /// Current window size in pixels
    pub window_size: UVec2,
}

/// Advance the game state by one frame of `elapsed` seconds
pub fn tick(state: &mut GameState, input: &TickInput, elapsed: f32, tuning: &Tuning) -> Vec<GameEvent> {
    let dt = if elapsed.is_finite() && elapsed > 0.0 {
        elapsed
    } else {
        0.0
    };
    let mut events = Vec::new();

    for event in &input.events {
        apply_pointer(state, event);
    }
    match aspect_ratio(input.window_size) {
        Some(aspect) => state.panel.layout(aspect),
        None => log::trace!("Skipping panel layout for empty window {}", input.window_size),
    }

    state.rope.advance(dt);
    state.jumper.advance(dt, &tuning.jump);
    state.detection.update(
        &state.jumper,
        state.rope.current_angle,
        dt,
        &mut state.score,
        &tuning.detector,
        &mut events,
    );

    let collided = events.iter().any(|e| matches!(e, GameEvent::Collision { .. }));
    let scored = events.iter().any(|e| matches!(e, GameEvent::Scored { .. }));
    let tempo_changed = if collided {
        state.jumper.reset_tempo(&tuning.jump)
    } else if scored {
        state.jumper.speed_up(&tuning.jump)
    } else {
        false
    };

    for event in &events {
        match event {
            GameEvent::Scored { score } => log::info!("Clean jump! score={score}"),
            GameEvent::Collision { lost } => log::info!("Rope caught the feet, lost {lost}"),
            _ => {}
        }
    }
    if tempo_changed {
        log::info!("Jump period now {:.3}s", state.jumper.period);
        events.push(GameEvent::TempoChanged {
            period: state.jumper.period,
        });
    }

    state.frame += 1;
    state.time += dt as f64;
    events
}

/// Route one pointer sample through the panel onto the rope target
fn apply_pointer(state: &mut GameState, event: &InputEvent) {
    let (position, window) = match *event {
        InputEvent::PointerDown { position, window }
        | InputEvent::PointerMove { position, window }
        | InputEvent::PointerUp { position, window } => (position, window),
        InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => return,
    };
    // Samples from a zero-sized window have no overlay position
    let (Some(aspect), Some(point)) = (aspect_ratio(window), pixel_to_overlay(position, window)) else {
        return;
    };
    // Measure against the panel as laid out for the window the sample came from
    state.panel.layout(aspect);

    let outcome = match event {
        InputEvent::PointerDown { .. } => state.panel.pointer_down(point),
        InputEvent::PointerMove { .. } => state.panel.pointer_move(point),
        _ => state.panel.pointer_up(),
    };
    if let PointerOutcome::Steered(target) = outcome {
        state.rope.target_angle = target;
    }
}
