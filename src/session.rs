//! Play session
//!
//! Glue between a host loop and the simulation: resolves the scene once,
//! buffers input between frames, runs one tick per update and writes the
//! result back into the scene for drawing.

use glam::{UVec2, Vec2};

use crate::error::{Error, Result};
use crate::input::{Buttons, InputEvent, InputQueue};
use crate::scene::{Scene, SceneBindings, TransformId};
use crate::sim::{GameEvent, GameState, RenderView, TickInput, aspect_ratio, pixel_to_overlay, tick};
use crate::tuning::Tuning;

pub struct Session {
    state: GameState,
    tuning: Tuning,
    bindings: SceneBindings,
    pointer: InputQueue,
    buttons: Buttons,
    window_size: UVec2,
    /// A pointer went down on the panel and has not been released yet
    capturing: bool,
}

impl Session {
    /// Bind to the scene and set up the initial state
    ///
    /// Fails if the tuning is invalid, the scene lacks a required transform
    /// or does not have exactly one camera.
    pub fn new(scene: &mut Scene, tuning: Tuning) -> Result<Self> {
        tuning.validate()?;
        let bindings = SceneBindings::resolve(scene, &tuning.scene)?;
        let pose = bindings
            .initial_pose(scene)
            .ok_or_else(|| Error::MissingTransform {
                name: tuning.scene.jumper.clone(),
            })?;
        let state = GameState::new(pose, &tuning);
        bindings.write_back(&state, scene);

        log::info!(
            "Session ready: period {:.2}s, apex {:.2}, slew {:.0} deg/s",
            state.jumper.period,
            state.jumper.apex_height(),
            tuning.rope.slew_rate.to_degrees()
        );

        Ok(Self {
            state,
            tuning,
            bindings,
            pointer: InputQueue::default(),
            buttons: Buttons::default(),
            window_size: UVec2::ZERO,
            capturing: false,
        })
    }

    /// Accept one input event. Returns true if the control panel claims it
    ///
    /// Directional keys only feed the camera mover, and pointer samples that
    /// miss the panel while no drag is active are left to the host.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::KeyDown(key) => {
                self.buttons.press(key);
                false
            }
            InputEvent::KeyUp(key) => {
                self.buttons.release(key);
                false
            }
            InputEvent::PointerDown { position, window } => {
                self.resize(window);
                self.pointer.push(event);
                self.capturing = self.hits_panel(position, window);
                self.capturing
            }
            InputEvent::PointerMove { window, .. } => {
                self.resize(window);
                self.pointer.push(event);
                self.capturing
            }
            InputEvent::PointerUp { window, .. } => {
                self.resize(window);
                self.pointer.push(event);
                std::mem::take(&mut self.capturing)
            }
        }
    }

    /// Hit-test a pixel against the panel as laid out for `window`
    fn hits_panel(&self, position: Vec2, window: UVec2) -> bool {
        let (Some(aspect), Some(point)) = (aspect_ratio(window), pixel_to_overlay(position, window)) else {
            return false;
        };
        let mut panel = self.state.panel.clone();
        panel.layout(aspect);
        panel.contains(point)
    }

    /// Track the window size the panel is laid out against
    pub fn resize(&mut self, window: UVec2) {
        if aspect_ratio(window).is_none() {
            log::warn!("Ignoring degenerate window size {window}");
            return;
        }
        self.window_size = window;
    }

    /// Run one frame: read anchors, tick, write transforms back
    pub fn update(&mut self, scene: &mut Scene, elapsed: f32) -> Vec<GameEvent> {
        if let Some((left, right)) = self.bindings.anchors(scene) {
            self.state.rope.set_anchors(left, right);
        }

        let input = TickInput {
            events: self.pointer.drain(),
            window_size: self.window_size,
        };
        let events = tick(&mut self.state, &input, elapsed, &self.tuning);

        self.bindings.write_back(&self.state, scene);
        if let Some(camera) = scene.cameras_mut().get_mut(self.bindings.camera) {
            if let Some(aspect) = aspect_ratio(self.window_size) {
                camera.aspect = aspect;
            }
        }
        self.buttons.clear_downs();
        events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn view(&self) -> RenderView {
        self.state.view()
    }

    /// Directional keys for the camera mover
    pub fn buttons(&self) -> &Buttons {
        &self.buttons
    }

    /// Transform of the scene's camera
    pub fn camera_transform(&self, scene: &Scene) -> Option<TransformId> {
        scene.cameras().get(self.bindings.camera).map(|c| c.transform)
    }

    pub fn window_size(&self) -> UVec2 {
        self.window_size
    }
}
