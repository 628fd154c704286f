//! The [`Directory`] trait defining the roster/match lookup interface.
//!
//! The scoring core only ever asks the questions below; roster CRUD and
//! ownership policy live behind this boundary and are not part of the
//! ledger's contract.

use vml_types::{MatchId, PlayerId, SetId, TeamId};

use crate::error::Result;
use crate::types::{MatchRecord, Player, SetRecord};

/// Lookup interface over teams, players, matches and sets.
///
/// Implementations must be thread-safe (`Send + Sync`). All methods take a
/// consistent point-in-time view; the core never mutates through this trait.
pub trait Directory: Send + Sync {
    /// Returns `true` if the team is registered.
    fn team_exists(&self, team_id: TeamId) -> Result<bool>;

    /// Returns `true` if the player exists and is on the given team's roster.
    fn player_belongs_to_team(&self, player_id: PlayerId, team_id: TeamId) -> Result<bool>;

    /// Look up a match by id.
    fn get_match(&self, match_id: MatchId) -> Result<Option<MatchRecord>>;

    /// Look up a set by id.
    fn get_set(&self, set_id: SetId) -> Result<Option<SetRecord>>;

    /// All sets of a match in ordinal order (always five once created).
    fn sets_of_match(&self, match_id: MatchId) -> Result<Vec<SetRecord>>;

    /// The full roster of a team, in jersey-number order.
    fn players_of_team(&self, team_id: TeamId) -> Result<Vec<Player>>;
}
