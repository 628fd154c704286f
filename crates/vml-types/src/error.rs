use thiserror::Error;

/// Errors produced when constructing or parsing foundation types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// The string does not name a known action type.
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    /// A point delta outside {-1, 0, +1}.
    #[error("point delta out of range: {0}")]
    PointDeltaOutOfRange(i8),

    /// The string is not a valid entity id.
    #[error("invalid id: {0}")]
    InvalidId(String),
}
