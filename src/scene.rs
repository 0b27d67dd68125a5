//! Scene transform arena
//!
//! The engine side owns the transforms; the game holds [`TransformId`]
//! handles resolved once by name and reads/writes through them each frame.

use glam::{Quat, Vec3};

use crate::error::{Error, Result};
use crate::sim::{GameState, InitialPose};
use crate::tuning::SceneNames;

/// Handle to a transform inside a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformId(usize);

#[derive(Debug, Clone)]
pub struct Transform {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub transform: TransformId,
    /// Kept in sync with the window by the session
    pub aspect: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    transforms: Vec<Transform>,
    cameras: Vec<Camera>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transform(&mut self, name: impl Into<String>, position: Vec3, rotation: Quat) -> TransformId {
        let id = TransformId(self.transforms.len());
        self.transforms.push(Transform {
            name: name.into(),
            position,
            rotation,
        });
        id
    }

    pub fn add_camera(&mut self, transform: TransformId) {
        self.cameras.push(Camera {
            transform,
            aspect: 1.0,
        });
    }

    /// First transform with this name
    pub fn find(&self, name: &str) -> Option<TransformId> {
        self.transforms
            .iter()
            .position(|t| t.name == name)
            .map(TransformId)
    }

    pub fn get(&self, id: TransformId) -> Option<&Transform> {
        self.transforms.get(id.0)
    }

    pub fn get_mut(&mut self, id: TransformId) -> Option<&mut Transform> {
        self.transforms.get_mut(id.0)
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn cameras_mut(&mut self) -> &mut [Camera] {
        &mut self.cameras
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }
}

/// Handles to every transform the game drives or reads
#[derive(Debug, Clone, Copy)]
pub struct SceneBindings {
    pub jumper: TransformId,
    pub rope: TransformId,
    pub left_anchor: TransformId,
    pub right_anchor: TransformId,
    /// Index of the scene's only camera
    pub camera: usize,
}

impl SceneBindings {
    /// Resolve all required transforms; any missing name is fatal
    pub fn resolve(scene: &Scene, names: &SceneNames) -> Result<Self> {
        if scene.cameras().len() != 1 {
            return Err(Error::CameraCount {
                found: scene.cameras().len(),
            });
        }
        let lookup = |name: &str| {
            scene.find(name).ok_or_else(|| Error::MissingTransform {
                name: name.to_string(),
            })
        };
        Ok(Self {
            jumper: lookup(&names.jumper)?,
            rope: lookup(&names.rope)?,
            left_anchor: lookup(&names.left_anchor)?,
            right_anchor: lookup(&names.right_anchor)?,
            camera: 0,
        })
    }

    /// Current anchor positions (scene may animate them)
    pub fn anchors(&self, scene: &Scene) -> Option<(Vec3, Vec3)> {
        let left = scene.get(self.left_anchor)?.position;
        let right = scene.get(self.right_anchor)?.position;
        Some((left, right))
    }

    /// Snapshot of the starting transforms
    pub fn initial_pose(&self, scene: &Scene) -> Option<InitialPose> {
        let (anchor_left, anchor_right) = self.anchors(scene)?;
        Some(InitialPose {
            jumper_position: scene.get(self.jumper)?.position,
            rope_rotation: scene.get(self.rope)?.rotation,
            anchor_left,
            anchor_right,
        })
    }

    /// Push simulated jumper and rope transforms into the scene
    pub fn write_back(&self, state: &GameState, scene: &mut Scene) {
        if let Some(jumper) = scene.get_mut(self.jumper) {
            jumper.position = state.jumper.position();
        }
        if let Some(rope) = scene.get_mut(self.rope) {
            rope.position = state.rope.position;
            rope.rotation = state.rope.rotation;
        }
    }
}
