//! Crate error type
//!
//! Only initialization can fail. Once a session is running every step is
//! infallible and degenerate inputs are guarded where they occur.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A transform the game needs was not found in the scene
    #[error("scene is missing required transform '{name}'")]
    MissingTransform { name: String },

    #[error("expecting scene to have exactly one camera, but it has {found}")]
    CameraCount { found: usize },

    #[error("invalid tuning value for {field}: {reason}")]
    InvalidTuning { field: &'static str, reason: String },

    #[error("failed to parse tuning: {0}")]
    TuningParse(#[from] serde_json::Error),

    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
