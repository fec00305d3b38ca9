use crate::backend::MeshId;

/// Rejected page options.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("unrecognized color `{0}`")]
    InvalidColor(String),
    #[error("options object could not be read: {0}")]
    Malformed(String),
    #[error("option `{field}` is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

/// Failures reported by a rendering backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("rendering backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to create GPU resource: {0}")]
    ResourceCreation(String),
    #[error("unknown mesh {0:?}")]
    UnknownMesh(MeshId),
    #[error("frame submission failed: {0}")]
    Draw(String),
}

/// Why a background could not be started.
#[derive(Debug, thiserror::Error)]
pub enum BackgroundError {
    #[error("rendering backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("target surface `{0}` not found")]
    SurfaceMissing(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl BackgroundError {
    /// Environment-missing errors are expected on some pages and only warrant
    /// a warning; everything else is a genuine failure.
    pub fn is_environment_missing(&self) -> bool {
        matches!(
            self,
            BackgroundError::BackendUnavailable(_)
                | BackgroundError::SurfaceMissing(_)
                | BackgroundError::Backend(BackendError::Unavailable(_))
        )
    }
}
