/// Errors surfaced by the engine crate's public entry points. Per-chunk
/// transport/protocol failures do NOT appear here; they are caught by the
/// scheduler and folded into chunk state. This enum is reserved for
/// failures that abort job creation itself.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `JobManager::create` was asked for a scheme with no registered
    /// implementation.
    #[error("unknown password scheme: {0:?}")]
    UnknownScheme(String),
    /// The hash passed to `JobManager::create` failed normalization.
    #[error("invalid hash: {0:?}")]
    InvalidHash(String),
}

impl From<crackforge_core::CoreError> for EngineError {
    fn from(err: crackforge_core::CoreError) -> Self {
        match err {
            crackforge_core::CoreError::InvalidHash(h) => EngineError::InvalidHash(h),
        }
    }
}

impl From<crackforge_scheme::SchemeError> for EngineError {
    fn from(err: crackforge_scheme::SchemeError) -> Self {
        match err {
            crackforge_scheme::SchemeError::UnknownScheme(name) => {
                EngineError::UnknownScheme(name)
            }
            crackforge_scheme::SchemeError::IndexOutOfBounds { scheme, .. } => {
                EngineError::UnknownScheme(scheme)
            }
        }
    }
}
