use thiserror::Error;
use vml_ledger::LedgerError;

/// Errors produced by statistics maintenance and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// No aggregate exists yet for the (match, player) pair.
    #[error("stats not found")]
    StatsNotFound,

    /// Reading the ledger back failed while rebuilding an aggregate.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("stats lock poisoned")]
    LockPoisoned,
}

/// Convenience alias for statistics operations.
pub type Result<T> = std::result::Result<T, StatsError>;
