//! The action command engine: validated, transactional mutations of the
//! per-set ledger, plus the read operations that replay it.
//!
//! The engine owns no state of its own. Rosters come from a [`Directory`],
//! the stream lives in a store implementing [`LedgerReader`] +
//! [`LedgerWriter`], and committed mutations are announced through an
//! [`EventSink`]. A command either commits every one of its writes or none.

use std::sync::Arc;

use tracing::debug;
use vml_directory::{Directory, MatchRecord, SetRecord};
use vml_types::{ActionId, MatchId, PlayerId, Score, SetId, TeamId};

use crate::error::{LedgerError, Result};
use crate::events::{EventSink, MatchEvent};
use crate::lineup::StartingLineup;
use crate::records::{NewAction, RecordedAction, SetContext};
use crate::rotation::{derive_rotation, RotationSnapshot};
use crate::traits::{LedgerReader, LedgerWriter};

/// Orchestrates ledger mutations against a directory-backed roster.
pub struct ActionEngine<D, L> {
    directory: Arc<D>,
    ledger: Arc<L>,
    events: Arc<dyn EventSink>,
}

impl<D, L> ActionEngine<D, L>
where
    D: Directory,
    L: LedgerReader + LedgerWriter,
{
    pub fn new(directory: Arc<D>, ledger: Arc<L>, events: Arc<dyn EventSink>) -> Self {
        Self {
            directory,
            ledger,
            events,
        }
    }

    /// Append one action to a set's ledger.
    ///
    /// Validates that the match exists, the set belongs to it, the team is
    /// one of the match's two, and the player is on that team's roster;
    /// then assigns sequence and rally, updates the cached score, and
    /// emits [`MatchEvent::ActionRecorded`].
    pub fn record_action(&self, new: NewAction) -> Result<(RecordedAction, Score)> {
        let match_record = self.require_match(new.match_id)?;
        let set = self.require_set_of(&match_record, new.set_id)?;
        if match_record.side_of(new.team_id).is_none() {
            return Err(LedgerError::TeamNotInMatch);
        }
        if !self
            .directory
            .player_belongs_to_team(new.player_id, new.team_id)?
        {
            return Err(LedgerError::PlayerNotOnTeam);
        }

        let context = self.context_for(&match_record, &set);
        let (_, draft) = new.into_draft();
        let (action, score) = self.ledger.append_action(&context, draft)?;

        debug!(
            action = %action.id,
            set = %action.set_id,
            sequence = action.sequence,
            rally = action.rally,
            score = %score,
            "action recorded"
        );
        self.events.publish(&MatchEvent::ActionRecorded {
            action: action.clone(),
            score,
        });
        Ok((action, score))
    }

    /// Remove one action and replay the survivors.
    ///
    /// The surviving entries are renumbered to dense sequences, rally
    /// run-lengths are rebuilt, and the set score is recomputed from zero —
    /// a non-trailing removal can shift attribution for everything after
    /// it, so nothing is decremented in place. Emits
    /// [`MatchEvent::ActionDeleted`].
    pub fn delete_action(&self, action_id: ActionId) -> Result<(RecordedAction, Score)> {
        let target = self
            .ledger
            .find_action(action_id)?
            .ok_or(LedgerError::ActionNotFound)?;
        let match_record = self.require_match(target.match_id)?;
        let set = self
            .directory
            .get_set(target.set_id)?
            .ok_or(LedgerError::SetNotFound)?;
        if set.match_id != match_record.id {
            return Err(LedgerError::SetNotInMatch);
        }

        let (removed, score) = self.ledger.delete_action(action_id)?;

        debug!(
            action = %removed.id,
            set = %removed.set_id,
            score = %score,
            "action deleted, stream replayed"
        );
        self.events.publish(&MatchEvent::ActionDeleted {
            action_id: removed.id,
            match_id: removed.match_id,
            set_id: removed.set_id,
            team_id: removed.team_id,
            player_id: removed.player_id,
            score,
        });
        Ok((removed, score))
    }

    /// Lock in a team's six starting positions and libero for a set.
    pub fn set_starting_lineup(
        &self,
        set_id: SetId,
        team_id: TeamId,
        positions: [PlayerId; 6],
        libero: PlayerId,
    ) -> Result<StartingLineup> {
        let set = self
            .directory
            .get_set(set_id)?
            .ok_or(LedgerError::SetNotFound)?;
        let match_record = self.require_match(set.match_id)?;
        if match_record.side_of(team_id).is_none() {
            return Err(LedgerError::TeamNotInMatch);
        }
        if self.ledger.lineup(set_id, team_id)?.is_some() {
            return Err(LedgerError::LineupAlreadySet);
        }

        let lineup = StartingLineup::new(team_id, positions, libero)?;
        for player in lineup.players() {
            if !self.directory.player_belongs_to_team(player, team_id)? {
                return Err(LedgerError::PlayerNotOnTeam);
            }
        }

        let context = self.context_for(&match_record, &set);
        self.ledger.set_lineup(&context, lineup)?;

        debug!(set = %set_id, team = %team_id, "starting rotation set");
        self.events.publish(&MatchEvent::StartingRotationSet {
            set_id,
            team_id,
            positions,
            libero,
        });
        Ok(lineup)
    }

    /// Remove a team's starting lineup, permitted only while the set's
    /// ledger is still empty (either team's actions lock both lineups).
    pub fn delete_starting_lineup(&self, set_id: SetId, team_id: TeamId) -> Result<()> {
        let set = self
            .directory
            .get_set(set_id)?
            .ok_or(LedgerError::SetNotFound)?;
        let match_record = self.require_match(set.match_id)?;
        if match_record.side_of(team_id).is_none() {
            return Err(LedgerError::TeamNotInMatch);
        }

        self.ledger.delete_lineup(set_id, team_id)?;

        debug!(set = %set_id, team = %team_id, "starting rotation deleted");
        self.events
            .publish(&MatchEvent::StartingRotationDeleted { set_id, team_id });
        Ok(())
    }

    /// Record which team serves first. Must happen before any scoring or
    /// ledger activity in the set.
    pub fn set_initial_server(&self, set_id: SetId, team_id: TeamId) -> Result<()> {
        let set = self
            .directory
            .get_set(set_id)?
            .ok_or(LedgerError::SetNotFound)?;
        let match_record = self.require_match(set.match_id)?;
        if match_record.side_of(team_id).is_none() {
            return Err(LedgerError::TeamNotInMatch);
        }

        let context = self.context_for(&match_record, &set);
        self.ledger.set_initial_server(&context, team_id)
    }

    /// The stored lineup for a (set, team) pair.
    pub fn starting_lineup(&self, set_id: SetId, team_id: TeamId) -> Result<StartingLineup> {
        self.ledger
            .lineup(set_id, team_id)?
            .ok_or(LedgerError::LineupNotFound)
    }

    /// Replay a set's ledger into current positions and serve state.
    ///
    /// Requires both starting lineups; with typed position arrays there is
    /// no meaningful placeholder for a missing side.
    pub fn rotation_state(&self, set_id: SetId) -> Result<RotationSnapshot> {
        let set = self
            .directory
            .get_set(set_id)?
            .ok_or(LedgerError::SetNotFound)?;
        let match_record = self.require_match(set.match_id)?;

        let lineup_a = self.starting_lineup(set_id, match_record.team_a)?;
        let lineup_b = self.starting_lineup(set_id, match_record.team_b)?;
        let initial = self.ledger.initial_serving_team(set_id)?;
        let actions = self.ledger.actions_for_set(set_id)?;

        Ok(derive_rotation(
            &match_record,
            &lineup_a,
            &lineup_b,
            initial,
            &actions,
        ))
    }

    /// A set's full stream in sequence order, validated against the match.
    pub fn list_actions(&self, match_id: MatchId, set_id: SetId) -> Result<Vec<RecordedAction>> {
        let match_record = self.require_match(match_id)?;
        self.require_set_of(&match_record, set_id)?;
        self.ledger.actions_for_set(set_id)
    }

    /// Cached per-set scores for a match in ordinal order.
    pub fn set_scores(&self, match_id: MatchId) -> Result<Vec<(SetRecord, Score)>> {
        self.require_match(match_id)?;
        let sets = self.directory.sets_of_match(match_id)?;
        sets.into_iter()
            .map(|set| {
                let score = self.ledger.set_score(set.id)?;
                Ok((set, score))
            })
            .collect()
    }

    /// Read access to the underlying store, for projections and views.
    pub fn reader(&self) -> &L {
        self.ledger.as_ref()
    }

    fn require_match(&self, match_id: MatchId) -> Result<MatchRecord> {
        self.directory
            .get_match(match_id)?
            .ok_or(LedgerError::MatchNotFound)
    }

    fn require_set_of(&self, match_record: &MatchRecord, set_id: SetId) -> Result<SetRecord> {
        let set = self
            .directory
            .get_set(set_id)?
            .ok_or(LedgerError::SetNotFound)?;
        if set.match_id != match_record.id {
            return Err(LedgerError::SetNotFound);
        }
        Ok(set)
    }

    fn context_for(&self, match_record: &MatchRecord, set: &SetRecord) -> SetContext {
        SetContext::new(
            set.id,
            match_record.id,
            match_record.team_a,
            match_record.team_b,
        )
    }
}
