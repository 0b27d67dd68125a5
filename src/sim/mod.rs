//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Frame-stepped, single-threaded, fixed update order
//! - Jumper integrated in bounded substeps
//! - No rendering, scene or platform dependencies

pub mod detector;
pub mod jumper;
pub mod panel;
pub mod rope;
pub mod state;
pub mod tick;

pub use detector::{DetectionState, FlightPhase};
pub use jumper::{JumperState, launch_velocity};
pub use panel::{PanelState, PointerOutcome, aspect_ratio, overlay_to_pixel, pixel_to_overlay};
pub use rope::RopeState;
pub use state::{GameEvent, GameState, InitialPose, PanelView, RenderView, ScoreState};
pub use tick::{TickInput, tick};
