use thiserror::Error;
use vml_directory::DirectoryError;
use vml_ledger::{ErrorKind, LedgerError};
use vml_stats::StatsError;

/// Errors surfaced by the high-level scoring API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("stats not found")]
    StatsNotFound,

    #[error("stats lock poisoned")]
    StatsUnavailable,
}

impl SdkError {
    /// The taxonomy bucket this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ledger(inner) => inner.kind(),
            Self::Directory(inner) => LedgerError::from(inner.clone()).kind(),
            Self::StatsNotFound => ErrorKind::NotFound,
            Self::StatsUnavailable => ErrorKind::Internal,
        }
    }
}

impl From<StatsError> for SdkError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::StatsNotFound => Self::StatsNotFound,
            StatsError::Ledger(inner) => Self::Ledger(inner),
            StatsError::LockPoisoned => Self::StatsUnavailable,
        }
    }
}

/// Convenience alias for SDK operations.
pub type SdkResult<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_flow_through_wrappers() {
        assert_eq!(
            SdkError::from(LedgerError::ActionNotFound).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SdkError::from(LedgerError::SequenceConflict { sequence: 2 }).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            SdkError::from(DirectoryError::TeamsMustDiffer).kind(),
            ErrorKind::Validation
        );
        assert_eq!(SdkError::StatsNotFound.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn stats_errors_flatten() {
        assert_eq!(
            SdkError::from(StatsError::StatsNotFound),
            SdkError::StatsNotFound
        );
        assert_eq!(
            SdkError::from(StatsError::Ledger(LedgerError::MatchNotFound)),
            SdkError::Ledger(LedgerError::MatchNotFound)
        );
    }
}
