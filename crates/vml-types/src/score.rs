use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Which of a match's two teams a value refers to.
///
/// Matches always have exactly two teams; the ledger resolves a concrete
/// [`crate::TeamId`] to a side at the match boundary and folds operate on
/// sides from there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    /// The other side of the net.
    pub fn opposite(&self) -> TeamSide {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// The point effect of one recorded action: -1, 0, or +1.
///
/// Positive means the acting team won the rally; negative means the action
/// was an error or fault and the rally goes to the opponent; zero is an
/// in-rally contact that decides nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub struct PointDelta(i8);

impl PointDelta {
    pub const WON: PointDelta = PointDelta(1);
    pub const LOST: PointDelta = PointDelta(-1);
    pub const NONE: PointDelta = PointDelta(0);

    /// Construct from a raw integer, rejecting anything outside {-1, 0, +1}.
    pub fn new(value: i8) -> Result<Self, TypeError> {
        match value {
            -1 | 0 | 1 => Ok(Self(value)),
            other => Err(TypeError::PointDeltaOutOfRange(other)),
        }
    }

    pub fn value(&self) -> i8 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl TryFrom<i8> for PointDelta {
    type Error = TypeError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PointDelta> for i8 {
    fn from(delta: PointDelta) -> i8 {
        delta.0
    }
}

impl fmt::Display for PointDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => f.write_str("+1"),
            -1 => f.write_str("-1"),
            _ => f.write_str("0"),
        }
    }
}

/// A set's point pair. Always equal to the fold of the set's ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub points_a: u32,
    pub points_b: u32,
}

impl Score {
    pub fn new(points_a: u32, points_b: u32) -> Self {
        Self { points_a, points_b }
    }

    /// Total points awarded in the set.
    pub fn total(&self) -> u32 {
        self.points_a + self.points_b
    }

    /// Points for the given side.
    pub fn for_side(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::A => self.points_a,
            TeamSide::B => self.points_b,
        }
    }

    /// Add one point to the given side.
    pub fn award(&mut self, side: TeamSide) {
        match side {
            TeamSide::A => self.points_a += 1,
            TeamSide::B => self.points_b += 1,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.points_a, self.points_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_delta_accepts_only_unit_values() {
        assert!(PointDelta::new(1).is_ok());
        assert!(PointDelta::new(0).is_ok());
        assert!(PointDelta::new(-1).is_ok());
        assert_eq!(
            PointDelta::new(2).unwrap_err(),
            TypeError::PointDeltaOutOfRange(2)
        );
        assert_eq!(
            PointDelta::new(-3).unwrap_err(),
            TypeError::PointDeltaOutOfRange(-3)
        );
    }

    #[test]
    fn point_delta_serde_rejects_out_of_range() {
        let parsed: Result<PointDelta, _> = serde_json::from_str("5");
        assert!(parsed.is_err());

        let ok: PointDelta = serde_json::from_str("-1").unwrap();
        assert_eq!(ok, PointDelta::LOST);
    }

    #[test]
    fn score_awards_per_side() {
        let mut score = Score::default();
        score.award(TeamSide::A);
        score.award(TeamSide::B);
        score.award(TeamSide::A);
        assert_eq!(score, Score::new(2, 1));
        assert_eq!(score.total(), 3);
        assert_eq!(score.for_side(TeamSide::A), 2);
        assert_eq!(score.for_side(TeamSide::B), 1);
    }

    #[test]
    fn sides_are_symmetric() {
        assert_eq!(TeamSide::A.opposite(), TeamSide::B);
        assert_eq!(TeamSide::B.opposite(), TeamSide::A);
        assert_eq!(TeamSide::A.opposite().opposite(), TeamSide::A);
    }

    #[test]
    fn display_formats() {
        assert_eq!(Score::new(25, 23).to_string(), "25:23");
        assert_eq!(PointDelta::WON.to_string(), "+1");
        assert_eq!(format!("{}", TeamSide::B), "B");
    }
}
