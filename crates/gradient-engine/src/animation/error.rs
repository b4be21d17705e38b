use thiserror::Error;

/// Precondition violations rejected by the animation core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnimationError {
    /// Two sequences that must be index-aligned have different lengths.
    #[error("sequence length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A layout cycle or session was built from an empty sequence.
    #[error("sequence must not be empty")]
    Empty,

    /// The output ring must hold at least one buffer.
    #[error("output ring size must be at least 1")]
    ZeroRing,
}
