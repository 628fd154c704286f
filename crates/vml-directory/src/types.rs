use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vml_types::{MatchId, PlayerId, SetId, TeamId, TeamSide};

/// Number of sets seeded when a match is created.
pub const SETS_PER_MATCH: u8 = 5;

/// A registered team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

/// A player on a team's roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub name: String,
    /// Jersey number, unique within the team.
    pub number: u8,
}

/// A registered match between two distinct teams.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Which side of this match the given team plays on, if any.
    pub fn side_of(&self, team_id: TeamId) -> Option<TeamSide> {
        if team_id == self.team_a {
            Some(TeamSide::A)
        } else if team_id == self.team_b {
            Some(TeamSide::B)
        } else {
            None
        }
    }

    /// The team id playing on the given side.
    pub fn team_on(&self, side: TeamSide) -> TeamId {
        match side {
            TeamSide::A => self.team_a,
            TeamSide::B => self.team_b,
        }
    }

    /// The opponent of the given team. `None` if the team is not in the match.
    pub fn opponent_of(&self, team_id: TeamId) -> Option<TeamId> {
        self.side_of(team_id)
            .map(|side| self.team_on(side.opposite()))
    }
}

/// One set of a match, identified by its 0-based ordinal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRecord {
    pub id: SetId,
    pub match_id: MatchId,
    pub ordinal: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match() -> MatchRecord {
        MatchRecord {
            id: MatchId::new(),
            team_a: TeamId::new(),
            team_b: TeamId::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn side_resolution() {
        let m = sample_match();
        assert_eq!(m.side_of(m.team_a), Some(TeamSide::A));
        assert_eq!(m.side_of(m.team_b), Some(TeamSide::B));
        assert_eq!(m.side_of(TeamId::new()), None);
    }

    #[test]
    fn opponent_resolution() {
        let m = sample_match();
        assert_eq!(m.opponent_of(m.team_a), Some(m.team_b));
        assert_eq!(m.opponent_of(m.team_b), Some(m.team_a));
        assert_eq!(m.opponent_of(TeamId::new()), None);
    }

    #[test]
    fn team_on_inverts_side_of() {
        let m = sample_match();
        for side in [TeamSide::A, TeamSide::B] {
            assert_eq!(m.side_of(m.team_on(side)), Some(side));
        }
    }
}
