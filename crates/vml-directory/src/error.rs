use thiserror::Error;

/// Errors that can occur during directory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("team not found")]
    TeamNotFound,

    #[error("player not found")]
    PlayerNotFound,

    #[error("match not found")]
    MatchNotFound,

    #[error("a match requires two different teams")]
    TeamsMustDiffer,

    #[error("jersey number {number} is already taken on this team")]
    NumberTaken { number: u8 },

    #[error("directory lock poisoned")]
    LockPoisoned,
}

/// Convenience alias for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;
