use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use vml_types::{ActionId, MatchId, PlayerId, Score, SetId, TeamId};

use crate::error::{LedgerError, Result};
use crate::lineup::StartingLineup;
use crate::records::{
    fold_score, next_rally, renumber_stream, scoring_side, ActionDraft, RecordedAction, SetContext,
};
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger for tests, local scoring sessions, and embedding.
///
/// One `RwLock` guards all streams: each write method is a single unit of
/// work under the write guard, so appends to the same set can never
/// compute the same sequence and a delete's read-modify-rewrite excludes
/// every concurrent mutation.
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    streams: HashMap<SetId, SetStream>,
    action_index: HashMap<ActionId, SetId>,
}

/// Everything the ledger holds for one set.
struct SetStream {
    context: SetContext,
    actions: Vec<RecordedAction>,
    score: Score,
    initial_serving_team: Option<TeamId>,
    lineups: HashMap<TeamId, StartingLineup>,
}

impl SetStream {
    fn new(context: SetContext) -> Self {
        Self {
            context,
            actions: Vec::new(),
            score: Score::default(),
            initial_serving_team: None,
            lineups: HashMap::new(),
        }
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
        }
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, LedgerState>> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, LedgerState>> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerWriter for InMemoryLedger {
    fn append_action(
        &self,
        context: &SetContext,
        draft: ActionDraft,
    ) -> Result<(RecordedAction, Score)> {
        let acting = context
            .side_of(draft.team_id)
            .ok_or(LedgerError::TeamNotInMatch)?;

        let mut guard = self.write_state()?;
        let state = &mut *guard;
        let stream = state
            .streams
            .entry(context.set_id)
            .or_insert_with(|| SetStream::new(*context));

        let last = stream.actions.last();
        let sequence = last.map(|a| a.sequence).unwrap_or(0) + 1;
        let rally = next_rally(last.map(|a| a.rally).unwrap_or(0), draft.point_delta);

        // Dense-sequence re-check. Unreachable under this lock, but a
        // persistence backend with weaker isolation surfaces the same
        // condition as a retryable conflict instead of silent corruption.
        if stream.actions.iter().any(|a| a.sequence == sequence) {
            return Err(LedgerError::SequenceConflict { sequence });
        }

        if let Some(side) = scoring_side(acting, draft.point_delta) {
            stream.score.award(side);
        }

        let action = RecordedAction {
            id: ActionId::new(),
            match_id: context.match_id,
            set_id: context.set_id,
            team_id: draft.team_id,
            player_id: draft.player_id,
            action_type: draft.action_type,
            outcome: draft.outcome,
            point_delta: draft.point_delta,
            sequence,
            rally,
            occurred_at: draft.occurred_at.unwrap_or_else(Utc::now),
            metadata: draft.metadata,
        };

        let score = stream.score;
        stream.actions.push(action.clone());
        state.action_index.insert(action.id, context.set_id);
        Ok((action, score))
    }

    fn delete_action(&self, action_id: ActionId) -> Result<(RecordedAction, Score)> {
        let mut guard = self.write_state()?;
        let state = &mut *guard;
        let set_id = *state
            .action_index
            .get(&action_id)
            .ok_or(LedgerError::ActionNotFound)?;
        let stream = state
            .streams
            .get_mut(&set_id)
            .ok_or(LedgerError::ActionNotFound)?;

        let position = stream
            .actions
            .iter()
            .position(|a| a.id == action_id)
            .ok_or(LedgerError::ActionNotFound)?;

        // Full replay of the survivors. Removing a non-trailing entry can
        // shift rally groupings and point attribution for everything after
        // it, so the score is rebuilt from zero rather than decremented.
        let removed = stream.actions.remove(position);
        renumber_stream(&mut stream.actions);
        stream.score = fold_score(stream.context.team_a, &stream.actions);

        let score = stream.score;
        state.action_index.remove(&action_id);
        Ok((removed, score))
    }

    fn set_lineup(&self, context: &SetContext, lineup: StartingLineup) -> Result<()> {
        let mut state = self.write_state()?;
        let stream = state
            .streams
            .entry(context.set_id)
            .or_insert_with(|| SetStream::new(*context));

        if stream.lineups.contains_key(&lineup.team_id) {
            return Err(LedgerError::LineupAlreadySet);
        }
        stream.lineups.insert(lineup.team_id, lineup);
        Ok(())
    }

    fn delete_lineup(&self, set_id: SetId, team_id: TeamId) -> Result<()> {
        let mut state = self.write_state()?;
        let stream = state
            .streams
            .get_mut(&set_id)
            .ok_or(LedgerError::LineupNotFound)?;

        if !stream.lineups.contains_key(&team_id) {
            return Err(LedgerError::LineupNotFound);
        }
        // Match-wide check: either team's recorded actions lock both lineups.
        if !stream.actions.is_empty() {
            return Err(LedgerError::LineupLocked);
        }
        stream.lineups.remove(&team_id);
        Ok(())
    }

    fn set_initial_server(&self, context: &SetContext, team_id: TeamId) -> Result<()> {
        let mut state = self.write_state()?;
        let stream = state
            .streams
            .entry(context.set_id)
            .or_insert_with(|| SetStream::new(*context));

        if stream.score.total() > 0 || !stream.actions.is_empty() {
            return Err(LedgerError::ServeAlreadyDecided);
        }
        stream.initial_serving_team = Some(team_id);
        Ok(())
    }
}

impl LedgerReader for InMemoryLedger {
    fn actions_for_set(&self, set_id: SetId) -> Result<Vec<RecordedAction>> {
        let state = self.read_state()?;
        Ok(state
            .streams
            .get(&set_id)
            .map(|s| s.actions.clone())
            .unwrap_or_default())
    }

    fn actions_for_match(&self, match_id: MatchId) -> Result<Vec<RecordedAction>> {
        let state = self.read_state()?;
        let mut streams: Vec<&SetStream> = state
            .streams
            .values()
            .filter(|s| s.context.match_id == match_id)
            .collect();
        streams.sort_by_key(|s| s.context.set_id);

        Ok(streams
            .into_iter()
            .flat_map(|s| s.actions.iter().cloned())
            .collect())
    }

    fn actions_for_player(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
    ) -> Result<Vec<RecordedAction>> {
        Ok(self
            .actions_for_match(match_id)?
            .into_iter()
            .filter(|a| a.player_id == player_id)
            .collect())
    }

    fn find_action(&self, action_id: ActionId) -> Result<Option<RecordedAction>> {
        let state = self.read_state()?;
        let Some(set_id) = state.action_index.get(&action_id) else {
            return Ok(None);
        };
        Ok(state
            .streams
            .get(set_id)
            .and_then(|s| s.actions.iter().find(|a| a.id == action_id))
            .cloned())
    }

    fn action_count(&self, set_id: SetId) -> Result<usize> {
        let state = self.read_state()?;
        Ok(state.streams.get(&set_id).map(|s| s.actions.len()).unwrap_or(0))
    }

    fn set_score(&self, set_id: SetId) -> Result<Score> {
        let state = self.read_state()?;
        Ok(state
            .streams
            .get(&set_id)
            .map(|s| s.score)
            .unwrap_or_default())
    }

    fn lineup(&self, set_id: SetId, team_id: TeamId) -> Result<Option<StartingLineup>> {
        let state = self.read_state()?;
        Ok(state
            .streams
            .get(&set_id)
            .and_then(|s| s.lineups.get(&team_id))
            .copied())
    }

    fn initial_serving_team(&self, set_id: SetId) -> Result<Option<TeamId>> {
        let state = self.read_state()?;
        Ok(state
            .streams
            .get(&set_id)
            .and_then(|s| s.initial_serving_team))
    }

    fn set_context(&self, set_id: SetId) -> Result<Option<SetContext>> {
        let state = self.read_state()?;
        Ok(state.streams.get(&set_id).map(|s| s.context))
    }
}
