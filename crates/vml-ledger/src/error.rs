use thiserror::Error;
use vml_directory::DirectoryError;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("match not found")]
    MatchNotFound,

    #[error("set not found for match")]
    SetNotFound,

    #[error("set does not belong to match")]
    SetNotInMatch,

    #[error("action not found")]
    ActionNotFound,

    #[error("starting rotation not found")]
    LineupNotFound,

    #[error("team is not part of this match")]
    TeamNotInMatch,

    #[error("player does not belong to the team")]
    PlayerNotOnTeam,

    #[error("rotation already set for this set and team")]
    LineupAlreadySet,

    #[error("positions and libero must be distinct players")]
    LineupPlayersNotDistinct,

    #[error("libero cannot be the server (position 1)")]
    LiberoCannotServe,

    #[error("cannot delete starting rotation after actions have been recorded")]
    LineupLocked,

    #[error("cannot change initial server after play has begun")]
    ServeAlreadyDecided,

    #[error("sequence {sequence} already exists for this set")]
    SequenceConflict { sequence: u32 },

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

/// Coarse classification of a [`LedgerError`] for callers.
///
/// `Conflict` is the only retryable kind: the same logical command may be
/// resubmitted unchanged. `NotFound` and `Validation` require corrected
/// input. `Internal` indicates a broken invariant in the process itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Internal,
}

impl LedgerError {
    /// The taxonomy bucket this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MatchNotFound
            | Self::SetNotFound
            | Self::SetNotInMatch
            | Self::ActionNotFound
            | Self::LineupNotFound => ErrorKind::NotFound,

            Self::TeamNotInMatch
            | Self::PlayerNotOnTeam
            | Self::LineupAlreadySet
            | Self::LineupPlayersNotDistinct
            | Self::LiberoCannotServe
            | Self::LineupLocked
            | Self::ServeAlreadyDecided => ErrorKind::Validation,

            Self::SequenceConflict { .. } => ErrorKind::Conflict,

            Self::Directory(inner) => match inner {
                DirectoryError::TeamNotFound
                | DirectoryError::PlayerNotFound
                | DirectoryError::MatchNotFound => ErrorKind::NotFound,
                DirectoryError::TeamsMustDiffer | DirectoryError::NumberTaken { .. } => {
                    ErrorKind::Validation
                }
                DirectoryError::LockPoisoned => ErrorKind::Internal,
            },

            Self::LockPoisoned => ErrorKind::Internal,
        }
    }

    /// Returns `true` if the caller may resubmit the same command.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

/// Convenience alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(LedgerError::MatchNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(LedgerError::TeamNotInMatch.kind(), ErrorKind::Validation);
        assert_eq!(
            LedgerError::SequenceConflict { sequence: 4 }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            LedgerError::Directory(DirectoryError::TeamNotFound).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn only_conflicts_are_retryable() {
        assert!(LedgerError::SequenceConflict { sequence: 1 }.is_retryable());
        assert!(!LedgerError::ActionNotFound.is_retryable());
        assert!(!LedgerError::LineupLocked.is_retryable());
    }
}
