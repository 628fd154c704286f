use std::sync::Arc;

use vml_directory::{Directory, InMemoryDirectory, MatchRecord, Player, SetRecord, Team};
use vml_ledger::{
    ActionEngine, EventSink, InMemoryLedger, LedgerError, LedgerReader, LedgerValidator,
    MatchEvent, NewAction, NullSink, RecordedAction, RotationSnapshot, StartingLineup,
    ValidationReport,
};
use vml_stats::{
    fold_player_totals, team_player_stats, PlayerMatchStats, PlayerTotals, StatsProjection,
    TeamPlayerStats,
};
use vml_types::{ActionId, MatchId, PlayerId, Score, SetId, TeamId};

use crate::error::SdkResult;

/// One scoring session: directory, ledger, projection and event sink wired
/// together behind the exposed operation surface.
///
/// The engine publishes every committed mutation to the configured sink;
/// the scorekeeper additionally feeds the same events into the statistics
/// projection, which is how the persisted player aggregates stay in step
/// with the ledger. Sinks remain observability-only.
pub struct Scorekeeper {
    directory: Arc<InMemoryDirectory>,
    ledger: Arc<InMemoryLedger>,
    engine: ActionEngine<InMemoryDirectory, InMemoryLedger>,
    projection: StatsProjection,
}

impl Scorekeeper {
    /// A scorekeeper that drops all event notifications.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(NullSink))
    }

    /// A scorekeeper publishing committed mutations to the given sink.
    pub fn with_sink(events: Arc<dyn EventSink>) -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let ledger = Arc::new(InMemoryLedger::new());
        let engine = ActionEngine::new(directory.clone(), ledger.clone(), events);
        Self {
            directory,
            ledger,
            engine,
            projection: StatsProjection::new(),
        }
    }

    // ---- Registration ----

    pub fn create_team(&self, name: &str) -> SdkResult<Team> {
        Ok(self.directory.create_team(name)?)
    }

    pub fn create_player(&self, team_id: TeamId, name: &str, number: u8) -> SdkResult<Player> {
        Ok(self.directory.create_player(team_id, name, number)?)
    }

    /// Register a match; its five sets are seeded in the same call.
    pub fn create_match(&self, team_a: TeamId, team_b: TeamId) -> SdkResult<MatchRecord> {
        Ok(self.directory.create_match(team_a, team_b)?)
    }

    pub fn sets(&self, match_id: MatchId) -> SdkResult<Vec<SetRecord>> {
        Ok(self.directory.sets_of_match(match_id)?)
    }

    // ---- Commands ----

    /// Append one action and fold it into the player's aggregate.
    pub fn record_action(&self, new: NewAction) -> SdkResult<(RecordedAction, Score)> {
        let (action, score) = self.engine.record_action(new)?;
        self.projection.observe(
            &MatchEvent::ActionRecorded {
                action: action.clone(),
                score,
            },
            self.ledger.as_ref(),
        )?;
        Ok((action, score))
    }

    /// Remove one action; the set stream is replayed and the affected
    /// player's aggregate rebuilt from the survivors.
    pub fn delete_action(&self, action_id: ActionId) -> SdkResult<Score> {
        let (removed, score) = self.engine.delete_action(action_id)?;
        self.projection.observe(
            &MatchEvent::ActionDeleted {
                action_id: removed.id,
                match_id: removed.match_id,
                set_id: removed.set_id,
                team_id: removed.team_id,
                player_id: removed.player_id,
                score,
            },
            self.ledger.as_ref(),
        )?;
        Ok(score)
    }

    pub fn set_starting_lineup(
        &self,
        set_id: SetId,
        team_id: TeamId,
        positions: [PlayerId; 6],
        libero: PlayerId,
    ) -> SdkResult<StartingLineup> {
        Ok(self
            .engine
            .set_starting_lineup(set_id, team_id, positions, libero)?)
    }

    pub fn delete_starting_lineup(&self, set_id: SetId, team_id: TeamId) -> SdkResult<()> {
        Ok(self.engine.delete_starting_lineup(set_id, team_id)?)
    }

    pub fn set_initial_server(&self, set_id: SetId, team_id: TeamId) -> SdkResult<()> {
        Ok(self.engine.set_initial_server(set_id, team_id)?)
    }

    // ---- Reads ----

    pub fn starting_lineup(&self, set_id: SetId, team_id: TeamId) -> SdkResult<StartingLineup> {
        Ok(self.engine.starting_lineup(set_id, team_id)?)
    }

    /// Replay the set's ledger into current positions and serve state.
    pub fn rotation_state(&self, set_id: SetId) -> SdkResult<RotationSnapshot> {
        Ok(self.engine.rotation_state(set_id)?)
    }

    pub fn list_actions(&self, match_id: MatchId, set_id: SetId) -> SdkResult<Vec<RecordedAction>> {
        Ok(self.engine.list_actions(match_id, set_id)?)
    }

    /// Cached per-set scores in ordinal order.
    pub fn set_scores(&self, match_id: MatchId) -> SdkResult<Vec<(SetRecord, Score)>> {
        Ok(self.engine.set_scores(match_id)?)
    }

    /// Diagnostics: check one set's stream invariants.
    pub fn validate_set(&self, set_id: SetId) -> SdkResult<ValidationReport> {
        Ok(LedgerValidator::validate_set(self.ledger.as_ref(), set_id)?)
    }

    // ---- Statistics ----

    /// The persisted aggregate for one player in one match.
    pub fn player_stats(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
    ) -> SdkResult<PlayerMatchStats> {
        self.projection
            .player_stats(match_id, player_id)?
            .ok_or(crate::error::SdkError::StatsNotFound)
    }

    /// Per-player team summary over the whole match.
    pub fn match_stats(&self, match_id: MatchId, team_id: TeamId) -> SdkResult<Vec<TeamPlayerStats>> {
        self.require_match(match_id)?;
        let roster = self.require_roster(team_id)?;
        let actions = self.ledger.actions_for_match(match_id)?;
        Ok(team_player_stats(&roster, &actions))
    }

    /// Per-player team summary restricted to one set.
    pub fn set_stats(
        &self,
        match_id: MatchId,
        team_id: TeamId,
        set_id: SetId,
    ) -> SdkResult<Vec<TeamPlayerStats>> {
        let match_record = self.require_match(match_id)?;
        let set = self
            .directory
            .get_set(set_id)?
            .ok_or(LedgerError::SetNotFound)?;
        if set.match_id != match_record.id {
            return Err(LedgerError::SetNotFound.into());
        }
        let roster = self.require_roster(team_id)?;
        let actions = self.ledger.actions_for_set(set_id)?;
        Ok(team_player_stats(&roster, &actions))
    }

    /// Category totals for every player who acted in the match.
    pub fn match_totals(&self, match_id: MatchId) -> SdkResult<Vec<PlayerTotals>> {
        self.require_match(match_id)?;
        let actions = self.ledger.actions_for_match(match_id)?;
        Ok(fold_player_totals(&actions))
    }

    fn require_match(&self, match_id: MatchId) -> SdkResult<MatchRecord> {
        Ok(self
            .directory
            .get_match(match_id)?
            .ok_or(LedgerError::MatchNotFound)?)
    }

    fn require_roster(&self, team_id: TeamId) -> SdkResult<Vec<Player>> {
        if !self.directory.team_exists(team_id)? {
            return Err(vml_directory::DirectoryError::TeamNotFound.into());
        }
        Ok(self.directory.players_of_team(team_id)?)
    }
}

impl Default for Scorekeeper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use vml_ledger::{ErrorKind, RecordingSink};
    use vml_types::{ActionType, PointDelta};

    use crate::error::SdkError;

    use super::*;

    struct Court {
        keeper: Scorekeeper,
        match_id: MatchId,
        sets: Vec<SetRecord>,
        team_a: TeamId,
        team_b: TeamId,
        roster_a: Vec<Player>,
        roster_b: Vec<Player>,
    }

    impl Court {
        fn new() -> Self {
            Self::with_keeper(Scorekeeper::new())
        }

        fn with_keeper(keeper: Scorekeeper) -> Self {
            let home = keeper.create_team("Harbor Hawks").unwrap();
            let away = keeper.create_team("Valley Vipers").unwrap();
            let roster = |team: TeamId| -> Vec<Player> {
                (1..=7u8)
                    .map(|n| keeper.create_player(team, &format!("p{n}"), n).unwrap())
                    .collect()
            };
            let roster_a = roster(home.id);
            let roster_b = roster(away.id);
            let match_record = keeper.create_match(home.id, away.id).unwrap();
            let sets = keeper.sets(match_record.id).unwrap();
            Self {
                keeper,
                match_id: match_record.id,
                sets,
                team_a: home.id,
                team_b: away.id,
                roster_a,
                roster_b,
            }
        }

        fn set_id(&self) -> SetId {
            self.sets[0].id
        }

        fn lock_lineups(&self) {
            for (team, roster) in [(self.team_a, &self.roster_a), (self.team_b, &self.roster_b)] {
                let positions: [PlayerId; 6] = roster[..6]
                    .iter()
                    .map(|p| p.id)
                    .collect::<Vec<_>>()
                    .try_into()
                    .unwrap();
                self.keeper
                    .set_starting_lineup(self.set_id(), team, positions, roster[6].id)
                    .unwrap();
            }
        }

        fn record(
            &self,
            team_id: TeamId,
            player_id: PlayerId,
            action_type: ActionType,
            delta: i8,
        ) -> RecordedAction {
            self.keeper
                .record_action(NewAction {
                    match_id: self.match_id,
                    set_id: self.set_id(),
                    team_id,
                    player_id,
                    action_type,
                    outcome: "recorded".into(),
                    point_delta: PointDelta::new(delta).unwrap(),
                    occurred_at: None,
                    metadata: None,
                })
                .unwrap()
                .0
        }
    }

    #[test]
    fn full_scoring_flow() {
        let court = Court::new();
        court.lock_lineups();
        court.keeper
            .set_initial_server(court.set_id(), court.team_a)
            .unwrap();

        // A holds serve twice, then B side-outs.
        let server = court.roster_a[0].id;
        court.record(court.team_a, server, ActionType::EarnedAce, 1);
        court.record(court.team_a, server, ActionType::EarnedAce, 1);
        court.record(court.team_b, court.roster_b[2].id, ActionType::EarnedSpike, 1);

        let scores = court.keeper.set_scores(court.match_id).unwrap();
        assert_eq!(scores[0].1, Score::new(2, 1));

        let rotation = court.keeper.rotation_state(court.set_id()).unwrap();
        assert_eq!(rotation.serving_team, court.team_b);
        assert_eq!(rotation.team_b.positions[0], court.roster_b[1].id);
        assert_eq!(rotation.team_a.positions[0], court.roster_a[0].id);

        let server_stats = court.keeper.player_stats(court.match_id, server).unwrap();
        assert_eq!(server_stats.actions, 2);
        assert_eq!(server_stats.scoring_actions, 2);

        let report = court.keeper.validate_set(court.set_id()).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn delete_keeps_every_view_consistent() {
        let court = Court::new();
        court.lock_lineups();

        let hitter = court.roster_a[3].id;
        let first = court.record(court.team_a, hitter, ActionType::EarnedSpike, 1);
        court.record(court.team_a, hitter, ActionType::ErrorSpike, -1);
        court.record(court.team_b, court.roster_b[0].id, ActionType::EarnedTip, 1);

        let score = court.keeper.delete_action(first.id).unwrap();
        assert_eq!(score, Score::new(0, 2));

        let actions = court
            .keeper
            .list_actions(court.match_id, court.set_id())
            .unwrap();
        assert_eq!(
            actions.iter().map(|a| a.sequence).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let stats = court.keeper.player_stats(court.match_id, hitter).unwrap();
        assert_eq!(stats.actions, 1);
        assert_eq!(stats.scoring_actions, 0);
        assert_eq!(stats.penalties, 1);

        assert!(court.keeper.validate_set(court.set_id()).unwrap().is_valid());
    }

    #[test]
    fn events_reach_the_sink() {
        let sink = Arc::new(RecordingSink::new());
        let court = Court::with_keeper(Scorekeeper::with_sink(sink.clone()));
        court.lock_lineups();
        let action = court.record(
            court.team_a,
            court.roster_a[0].id,
            ActionType::EarnedAce,
            1,
        );
        court.keeper.delete_action(action.id).unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], MatchEvent::StartingRotationSet { .. }));
        assert!(matches!(events[2], MatchEvent::ActionRecorded { .. }));
        assert!(matches!(events[3], MatchEvent::ActionDeleted { .. }));
    }

    #[test]
    fn stats_views_cover_roster_and_respect_set_filter() {
        let court = Court::new();
        court.lock_lineups();
        let hitter = court.roster_a[1].id;
        court.record(court.team_a, hitter, ActionType::EarnedSpike, 1);

        let match_stats = court.keeper.match_stats(court.match_id, court.team_a).unwrap();
        assert_eq!(match_stats.len(), 7);
        let hitter_row = match_stats.iter().find(|s| s.player_id == hitter).unwrap();
        assert_eq!(hitter_row.attack.scored, 1);

        // Another set of the same match has no actions yet.
        let other_set = court.sets[1].id;
        let set_stats = court
            .keeper
            .set_stats(court.match_id, court.team_a, other_set)
            .unwrap();
        assert!(set_stats.iter().all(|s| s.total == 0));

        let totals = court.keeper.match_totals(court.match_id).unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].categories.attack.scored, 1);
    }

    #[test]
    fn not_found_and_validation_kinds_surface() {
        let court = Court::new();

        let err = court
            .keeper
            .player_stats(court.match_id, PlayerId::new())
            .unwrap_err();
        assert_eq!(err, SdkError::StatsNotFound);
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = court
            .keeper
            .match_stats(MatchId::new(), court.team_a)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = court
            .keeper
            .create_match(court.team_a, court.team_a)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn randomized_appends_and_deletes_hold_invariants() {
        let court = Court::new();
        court.lock_lineups();
        let mut rng = StdRng::seed_from_u64(0x5e7_ba11);
        let mut live: Vec<RecordedAction> = Vec::new();

        for _ in 0..200 {
            let delete = !live.is_empty() && rng.gen_ratio(1, 3);
            if delete {
                let victim = live.remove(rng.gen_range(0..live.len()));
                court.keeper.delete_action(victim.id).unwrap();
            } else {
                let (team, roster) = if rng.gen_bool(0.5) {
                    (court.team_a, &court.roster_a)
                } else {
                    (court.team_b, &court.roster_b)
                };
                let player = roster[rng.gen_range(0..roster.len())].id;
                let (ty, delta) = match rng.gen_range(0..3) {
                    0 => (ActionType::EarnedSpike, 1),
                    1 => (ActionType::ErrorServe, -1),
                    _ => (ActionType::InRallyDig, 0),
                };
                live.push(court.record(team, player, ty, delta));
            }

            let report = court.keeper.validate_set(court.set_id()).unwrap();
            assert!(report.is_valid(), "violations: {:?}", report.violations);
        }

        // Cached score equals the nonzero-delta count split by attribution.
        let actions = court
            .keeper
            .list_actions(court.match_id, court.set_id())
            .unwrap();
        let nonzero = actions.iter().filter(|a| !a.point_delta.is_zero()).count() as u32;
        let score = court.keeper.set_scores(court.match_id).unwrap()[0].1;
        assert_eq!(score.total(), nonzero);

        // Rotation stays a permutation of the starting six.
        let rotation = court.keeper.rotation_state(court.set_id()).unwrap();
        let mut expected: Vec<PlayerId> = court.roster_a[..6].iter().map(|p| p.id).collect();
        let mut actual = rotation.team_a.positions.to_vec();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
    }
}
