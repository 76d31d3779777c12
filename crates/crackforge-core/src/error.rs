/// Errors produced by the shared domain layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A hash token did not match `^[0-9a-f]{32}$` after trimming and case-folding.
    #[error("invalid hash: {0:?}")]
    InvalidHash(String),
}
