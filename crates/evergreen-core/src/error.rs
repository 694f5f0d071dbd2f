use crate::population::EntityClass;

/// Errors raised while building or configuring the scene.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("{class:?} population must contain at least one entity")]
    EmptyPopulation { class: EntityClass },
    #[error("smoothing factor {0} is outside (0, 1]")]
    InvalidSmoothing(f32),
}

/// Failures of the gesture subsystem.
///
/// None of these are fatal: the pipeline degrades to "no command" and the
/// manual toggle keeps working.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GestureError {
    #[error("gesture model failed to load: {0}")]
    ModelLoad(String),
    #[error("camera access denied: {0}")]
    CameraDenied(String),
    #[error("camera stream ended")]
    StreamEnded,
    #[error("classifier failed: {0}")]
    Classifier(String),
    #[error("task was dropped before completing")]
    Abandoned,
}
