use vml_types::{ActionId, MatchId, PlayerId, Score, SetId, TeamId};

use crate::error::Result;
use crate::lineup::StartingLineup;
use crate::records::{ActionDraft, RecordedAction, SetContext};

/// Read boundary over a ledger store.
///
/// Reads take a consistent snapshot of committed data; they never observe
/// a mutation mid-flight.
pub trait LedgerReader: Send + Sync {
    /// A set's full stream, in sequence order.
    fn actions_for_set(&self, set_id: SetId) -> Result<Vec<RecordedAction>>;

    /// Every action of a match, ordered by (set, sequence).
    fn actions_for_match(&self, match_id: MatchId) -> Result<Vec<RecordedAction>>;

    /// One player's actions within a match, ordered by (set, sequence).
    fn actions_for_player(&self, match_id: MatchId, player_id: PlayerId)
        -> Result<Vec<RecordedAction>>;

    /// Look up one action by id.
    fn find_action(&self, action_id: ActionId) -> Result<Option<RecordedAction>>;

    /// Number of entries in a set's ledger.
    fn action_count(&self, set_id: SetId) -> Result<usize>;

    /// The set's cached score (zero for a set with no stream yet).
    fn set_score(&self, set_id: SetId) -> Result<Score>;

    /// The stored lineup for a (set, team) pair, if any.
    fn lineup(&self, set_id: SetId, team_id: TeamId) -> Result<Option<StartingLineup>>;

    /// The explicitly recorded first-serving team, if any was set.
    fn initial_serving_team(&self, set_id: SetId) -> Result<Option<TeamId>>;

    /// The stream identity for a set, if the set has any recorded state.
    fn set_context(&self, set_id: SetId) -> Result<Option<SetContext>>;
}

/// Write boundary over a ledger store.
///
/// Every method is one atomic unit of work: all of its writes commit or
/// none do, and sequence assignment is serialized across concurrent
/// callers. Validation against rosters happens in the engine before any
/// of these are reached.
pub trait LedgerWriter: Send + Sync {
    /// Append one action: assign the next dense sequence and the rally
    /// counter, update the cached score, and persist the entry.
    fn append_action(
        &self,
        context: &SetContext,
        draft: ActionDraft,
    ) -> Result<(RecordedAction, Score)>;

    /// Remove one action and replay the survivors: dense sequences from 1,
    /// rally run-lengths and score rebuilt from zero. Returns the removed
    /// entry and the recomputed score.
    fn delete_action(&self, action_id: ActionId) -> Result<(RecordedAction, Score)>;

    /// Store a validated lineup. Fails if one already exists for the pair.
    fn set_lineup(&self, context: &SetContext, lineup: StartingLineup) -> Result<()>;

    /// Remove a lineup. Fails if absent, or if the set's ledger is
    /// non-empty (checked match-wide for the set, not per team).
    fn delete_lineup(&self, set_id: SetId, team_id: TeamId) -> Result<()>;

    /// Record which team serves first. Fails once the set has any score
    /// or any ledger entries.
    fn set_initial_server(&self, context: &SetContext, team_id: TeamId) -> Result<()>;
}
