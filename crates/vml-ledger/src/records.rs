use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vml_types::{ActionId, ActionType, MatchId, PlayerId, PointDelta, Score, SetId, TeamId, TeamSide};

/// One immutable ledger entry: a single facet of one rally.
///
/// Once written an action never changes; deletion removes it and renumbers
/// its siblings. `sequence` values within a set are always exactly
/// `{1..N}`, dense and gapless. `rally` advances by one on every entry
/// that decides a point and repeats otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedAction {
    pub id: ActionId,
    pub match_id: MatchId,
    pub set_id: SetId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub action_type: ActionType,
    pub outcome: String,
    pub point_delta: PointDelta,
    pub sequence: u32,
    pub rally: u32,
    pub occurred_at: DateTime<Utc>,
    pub metadata: Option<Value>,
}

/// Input to [`crate::ActionEngine::record_action`]: everything the caller
/// supplies; sequence, rally and the resulting score are assigned by the
/// ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewAction {
    pub match_id: MatchId,
    pub set_id: SetId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub action_type: ActionType,
    pub outcome: String,
    pub point_delta: PointDelta,
    /// Defaults to the append wall-clock time when `None`.
    pub occurred_at: Option<DateTime<Utc>>,
    pub metadata: Option<Value>,
}

/// A validated action handed from the engine to the store.
///
/// Match/set identity travels separately in the [`SetContext`].
#[derive(Clone, Debug)]
pub struct ActionDraft {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub action_type: ActionType,
    pub outcome: String,
    pub point_delta: PointDelta,
    pub occurred_at: Option<DateTime<Utc>>,
    pub metadata: Option<Value>,
}

impl NewAction {
    pub(crate) fn into_draft(self) -> (SetId, ActionDraft) {
        (
            self.set_id,
            ActionDraft {
                team_id: self.team_id,
                player_id: self.player_id,
                action_type: self.action_type,
                outcome: self.outcome,
                point_delta: self.point_delta,
                occurred_at: self.occurred_at,
                metadata: self.metadata,
            },
        )
    }
}

/// Identity of a set's stream: which match it belongs to and which team
/// plays on which side. Established by the engine from the directory and
/// fixed for the lifetime of the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetContext {
    pub set_id: SetId,
    pub match_id: MatchId,
    pub team_a: TeamId,
    pub team_b: TeamId,
}

impl SetContext {
    pub fn new(set_id: SetId, match_id: MatchId, team_a: TeamId, team_b: TeamId) -> Self {
        Self {
            set_id,
            match_id,
            team_a,
            team_b,
        }
    }

    /// Which side the team plays on, if it is part of this set's match.
    pub fn side_of(&self, team_id: TeamId) -> Option<TeamSide> {
        if team_id == self.team_a {
            Some(TeamSide::A)
        } else if team_id == self.team_b {
            Some(TeamSide::B)
        } else {
            None
        }
    }

    /// The team playing on the given side.
    pub fn team_on(&self, side: TeamSide) -> TeamId {
        match side {
            TeamSide::A => self.team_a,
            TeamSide::B => self.team_b,
        }
    }
}

/// The side credited with the point for one entry, per the scoring rule:
/// a positive delta credits the acting team, a negative delta awards the
/// point to the opponent. `None` for in-rally entries.
pub(crate) fn scoring_side(acting: TeamSide, delta: PointDelta) -> Option<TeamSide> {
    if delta.is_zero() {
        None
    } else if delta.is_positive() {
        Some(acting)
    } else {
        Some(acting.opposite())
    }
}

/// Fold a set's ordered ledger into its score from zero.
///
/// `team_a` anchors side attribution; actions by unknown teams cannot occur
/// in a stream built through the engine.
pub fn fold_score(team_a: TeamId, actions: &[RecordedAction]) -> Score {
    let mut score = Score::default();
    for action in actions {
        let acting = if action.team_id == team_a {
            TeamSide::A
        } else {
            TeamSide::B
        };
        if let Some(side) = scoring_side(acting, action.point_delta) {
            score.award(side);
        }
    }
    score
}

/// The rally counter for the next entry given the previous rally value
/// (0 when the ledger is empty).
pub(crate) fn next_rally(last_rally: u32, delta: PointDelta) -> u32 {
    if !delta.is_zero() {
        last_rally + 1
    } else if last_rally == 0 {
        1
    } else {
        last_rally
    }
}

/// Renumber a surviving stream in place after a deletion: dense sequences
/// from 1 and rally run-lengths rebuilt from zero.
pub(crate) fn renumber_stream(actions: &mut [RecordedAction]) {
    let mut last_rally = 0u32;
    for (index, action) in actions.iter_mut().enumerate() {
        let rally = next_rally(last_rally, action.point_delta);
        last_rally = rally;
        action.sequence = (index + 1) as u32;
        action.rally = rally;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(team: TeamId, delta: i8, sequence: u32, rally: u32) -> RecordedAction {
        RecordedAction {
            id: ActionId::new(),
            match_id: MatchId::new(),
            set_id: SetId::new(),
            team_id: team,
            player_id: PlayerId::new(),
            action_type: if delta > 0 {
                ActionType::EarnedSpike
            } else if delta < 0 {
                ActionType::ErrorServe
            } else {
                ActionType::InRallyDig
            },
            outcome: "test".into(),
            point_delta: PointDelta::new(delta).unwrap(),
            sequence,
            rally,
            occurred_at: Utc::now(),
            metadata: None,
        }
    }

    #[test]
    fn positive_delta_credits_acting_team() {
        let a = TeamId::new();
        let b = TeamId::new();
        let actions = vec![entry(a, 1, 1, 1), entry(b, 1, 2, 2)];
        assert_eq!(fold_score(a, &actions), Score::new(1, 1));
    }

    #[test]
    fn negative_delta_awards_opponent() {
        let a = TeamId::new();
        let b = TeamId::new();
        // Team A faults twice, team B faults once.
        let actions = vec![
            entry(a, -1, 1, 1),
            entry(a, -1, 2, 2),
            entry(b, -1, 3, 3),
        ];
        assert_eq!(fold_score(a, &actions), Score::new(1, 2));
    }

    #[test]
    fn zero_delta_scores_nothing() {
        let a = TeamId::new();
        let actions = vec![entry(a, 0, 1, 1), entry(a, 0, 2, 1)];
        assert_eq!(fold_score(a, &actions), Score::default());
    }

    #[test]
    fn rally_advances_only_on_decided_points() {
        assert_eq!(next_rally(0, PointDelta::NONE), 1);
        assert_eq!(next_rally(0, PointDelta::WON), 1);
        assert_eq!(next_rally(3, PointDelta::NONE), 3);
        assert_eq!(next_rally(3, PointDelta::LOST), 4);
    }

    #[test]
    fn renumber_restores_density_and_rallies() {
        let a = TeamId::new();
        let b = TeamId::new();
        // Simulates a stream that just lost its second entry.
        let mut actions = vec![
            entry(a, 0, 1, 1),
            entry(a, 1, 3, 2),
            entry(b, 0, 4, 2),
            entry(b, 1, 5, 3),
        ];
        renumber_stream(&mut actions);

        let sequences: Vec<u32> = actions.iter().map(|x| x.sequence).collect();
        let rallies: Vec<u32> = actions.iter().map(|x| x.rally).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
        assert_eq!(rallies, vec![1, 2, 2, 3]);
    }

    #[test]
    fn context_resolves_sides() {
        let ctx = SetContext::new(SetId::new(), MatchId::new(), TeamId::new(), TeamId::new());
        assert_eq!(ctx.side_of(ctx.team_a), Some(TeamSide::A));
        assert_eq!(ctx.side_of(ctx.team_b), Some(TeamSide::B));
        assert_eq!(ctx.side_of(TeamId::new()), None);
        assert_eq!(ctx.team_on(TeamSide::B), ctx.team_b);
    }
}
