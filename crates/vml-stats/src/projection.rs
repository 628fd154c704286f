use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vml_ledger::{LedgerReader, MatchEvent, RecordedAction};
use vml_types::{ActionType, MatchId, PlayerId, PointDelta};

use crate::error::{Result, StatsError};

/// Per-action-type slice of a player's aggregate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBreakdown {
    pub attempts: u32,
    pub successes: u32,
    pub penalties: u32,
    pub last_outcome: Option<String>,
}

/// The persisted per-(match, player) aggregate.
///
/// Derived state: always reconstructable from the ledger, never the source
/// of truth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub actions: u32,
    pub scoring_actions: u32,
    pub penalties: u32,
    pub by_type: BTreeMap<ActionType, ActionBreakdown>,
}

impl PlayerMatchStats {
    fn new(match_id: MatchId, player_id: PlayerId) -> Self {
        Self {
            match_id,
            player_id,
            actions: 0,
            scoring_actions: 0,
            penalties: 0,
            by_type: BTreeMap::new(),
        }
    }

    fn apply(&mut self, action_type: ActionType, delta: PointDelta, outcome: &str) {
        self.actions += 1;
        if delta.is_positive() {
            self.scoring_actions += 1;
        }
        if delta.is_negative() {
            self.penalties += 1;
        }

        let breakdown = self.by_type.entry(action_type).or_default();
        breakdown.attempts += 1;
        if delta.is_positive() {
            breakdown.successes += 1;
        }
        if delta.is_negative() {
            breakdown.penalties += 1;
        }
        breakdown.last_outcome = Some(outcome.to_string());
    }

    /// Rebuild an aggregate from a player's surviving ledger entries.
    pub fn rebuild(
        match_id: MatchId,
        player_id: PlayerId,
        actions: &[RecordedAction],
    ) -> Self {
        let mut stats = Self::new(match_id, player_id);
        for action in actions {
            stats.apply(action.action_type, action.point_delta, &action.outcome);
        }
        stats
    }
}

/// Maintains [`PlayerMatchStats`] rows in step with the ledger.
///
/// Appends are applied incrementally; deletions trigger a full refold of
/// the affected player's entries — a removed entry need not be the newest,
/// so differential subtraction would drift from the ledger.
#[derive(Debug, Default)]
pub struct StatsProjection {
    inner: RwLock<HashMap<(MatchId, PlayerId), PlayerMatchStats>>,
}

impl StatsProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one committed ledger event into the projection.
    ///
    /// Lineup events carry no statistics and are ignored.
    pub fn observe<R: LedgerReader>(&self, event: &MatchEvent, reader: &R) -> Result<()> {
        match event {
            MatchEvent::ActionRecorded { action, .. } => {
                let mut rows = self.write_rows()?;
                rows.entry((action.match_id, action.player_id))
                    .or_insert_with(|| {
                        PlayerMatchStats::new(action.match_id, action.player_id)
                    })
                    .apply(action.action_type, action.point_delta, &action.outcome);
                Ok(())
            }
            MatchEvent::ActionDeleted {
                match_id,
                player_id,
                ..
            } => {
                let survivors = reader.actions_for_player(*match_id, *player_id)?;
                debug!(
                    match_id = %match_id,
                    player = %player_id,
                    survivors = survivors.len(),
                    "rebuilding player stats after delete"
                );
                let rebuilt = PlayerMatchStats::rebuild(*match_id, *player_id, &survivors);
                self.write_rows()?.insert((*match_id, *player_id), rebuilt);
                Ok(())
            }
            MatchEvent::StartingRotationSet { .. }
            | MatchEvent::StartingRotationDeleted { .. } => Ok(()),
        }
    }

    /// The aggregate for a (match, player) pair, if one exists.
    pub fn player_stats(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
    ) -> Result<Option<PlayerMatchStats>> {
        Ok(self.read_rows()?.get(&(match_id, player_id)).cloned())
    }

    fn write_rows(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<(MatchId, PlayerId), PlayerMatchStats>>>
    {
        self.inner.write().map_err(|_| StatsError::LockPoisoned)
    }

    fn read_rows(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<(MatchId, PlayerId), PlayerMatchStats>>>
    {
        self.inner.read().map_err(|_| StatsError::LockPoisoned)
    }
}
