use hamlet_scene::SceneError;

/// Errors from kernel operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KernelError {
    #[error("no house with index {0}")]
    UnknownHouse(usize),
    #[error(transparent)]
    Scene(#[from] SceneError),
}
