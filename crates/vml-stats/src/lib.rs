//! Player statistics for the Volleyball Match Ledger.
//!
//! Two complementary views over the action ledger:
//!
//! - [`StatsProjection`] — the persisted per-(match, player) aggregate,
//!   updated incrementally on every append and rebuilt from scratch on
//!   every delete. Deletions are not restricted to the newest entry, so
//!   decrementing would drift; the projection always refolds instead.
//! - [`totals`] — on-demand folds of a filtered ledger slice into category
//!   totals (attack / serve / block / reception) and per-player team
//!   summaries. Nothing here is stored; every call recomputes.
//!
//! The ledger remains the sole source of truth; both views are
//! reconstructable from it at any time.

pub mod error;
pub mod projection;
pub mod totals;

pub use error::{Result, StatsError};
pub use projection::{ActionBreakdown, PlayerMatchStats, StatsProjection};
pub use totals::{
    fold_player_totals, team_player_stats, CategoryBreakdown, CategoryTotals, ContactLine,
    PlayerTotals, ReceiveLine, TeamPlayerStats, TypeTotals,
};
