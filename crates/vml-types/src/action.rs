use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The closed action vocabulary.
///
/// Every ledger entry carries exactly one of these. The serialized form is
/// the dotted wire string (`"earned.spike"`, `"fault.net"`, ...) and must
/// round-trip exactly; scoreboards and recorded exports depend on the
/// literal values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionType {
    // In-rally contacts that keep the ball alive.
    #[serde(rename = "inRally.overPassInPlay")]
    InRallyOverPassInPlay,
    #[serde(rename = "inRally.oneServe")]
    InRallyOneServe,
    #[serde(rename = "inRally.twoServe")]
    InRallyTwoServe,
    #[serde(rename = "inRally.threeServe")]
    InRallyThreeServe,
    #[serde(rename = "inRally.dig")]
    InRallyDig,
    #[serde(rename = "inRally.hitStillInPlay")]
    InRallyHitStillInPlay,
    #[serde(rename = "inRally.blockStillInPlay")]
    InRallyBlockStillInPlay,

    // Serve-receive graded passes.
    #[serde(rename = "receive.one")]
    ReceiveOne,
    #[serde(rename = "receive.two")]
    ReceiveTwo,
    #[serde(rename = "receive.three")]
    ReceiveThree,
    #[serde(rename = "receive.overpass")]
    ReceiveOverpass,

    // Point-earning plays.
    #[serde(rename = "earned.ace")]
    EarnedAce,
    #[serde(rename = "earned.spike")]
    EarnedSpike,
    #[serde(rename = "earned.tip")]
    EarnedTip,
    #[serde(rename = "earned.dump")]
    EarnedDump,
    #[serde(rename = "earned.downBallHit")]
    EarnedDownBallHit,
    #[serde(rename = "earned.block")]
    EarnedBlock,
    #[serde(rename = "earned.assist")]
    EarnedAssist,

    // Errors charged to the acting team.
    #[serde(rename = "error.serve")]
    ErrorServe,
    #[serde(rename = "error.spike")]
    ErrorSpike,
    #[serde(rename = "error.tip")]
    ErrorTip,
    #[serde(rename = "error.dump")]
    ErrorDump,
    #[serde(rename = "error.downBallHit")]
    ErrorDownBallHit,
    #[serde(rename = "error.block")]
    ErrorBlock,
    #[serde(rename = "error.whoseBall")]
    ErrorWhoseBall,
    #[serde(rename = "error.receive")]
    ErrorReceive,
    #[serde(rename = "error.dig")]
    ErrorDig,
    #[serde(rename = "error.set")]
    ErrorSet,
    #[serde(rename = "error.freeBallReceive")]
    ErrorFreeBallReceive,
    #[serde(rename = "error.secondBallReturn")]
    ErrorSecondBallReturn,
    #[serde(rename = "error.thirdBallReturn")]
    ErrorThirdBallReturn,

    // Rule faults.
    #[serde(rename = "fault.net")]
    FaultNet,
    #[serde(rename = "fault.ballHandling")]
    FaultBallHandling,
    #[serde(rename = "fault.under")]
    FaultUnder,
    #[serde(rename = "fault.overTheNet")]
    FaultOverTheNet,
    #[serde(rename = "fault.footFault")]
    FaultFootFault,
    #[serde(rename = "fault.outOfRotation")]
    FaultOutOfRotation,
    #[serde(rename = "fault.backRowAttack")]
    FaultBackRowAttack,
}

/// The dotted-prefix group an action type belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionGroup {
    InRally,
    Receive,
    Earned,
    Error,
    Fault,
}

impl ActionType {
    /// Every action type, in wire-vocabulary order.
    pub const ALL: [ActionType; 38] = [
        Self::InRallyOverPassInPlay,
        Self::InRallyOneServe,
        Self::InRallyTwoServe,
        Self::InRallyThreeServe,
        Self::InRallyDig,
        Self::InRallyHitStillInPlay,
        Self::InRallyBlockStillInPlay,
        Self::ReceiveOne,
        Self::ReceiveTwo,
        Self::ReceiveThree,
        Self::ReceiveOverpass,
        Self::EarnedAce,
        Self::EarnedSpike,
        Self::EarnedTip,
        Self::EarnedDump,
        Self::EarnedDownBallHit,
        Self::EarnedBlock,
        Self::EarnedAssist,
        Self::ErrorServe,
        Self::ErrorSpike,
        Self::ErrorTip,
        Self::ErrorDump,
        Self::ErrorDownBallHit,
        Self::ErrorBlock,
        Self::ErrorWhoseBall,
        Self::ErrorReceive,
        Self::ErrorDig,
        Self::ErrorSet,
        Self::ErrorFreeBallReceive,
        Self::ErrorSecondBallReturn,
        Self::ErrorThirdBallReturn,
        Self::FaultNet,
        Self::FaultBallHandling,
        Self::FaultUnder,
        Self::FaultOverTheNet,
        Self::FaultFootFault,
        Self::FaultOutOfRotation,
        Self::FaultBackRowAttack,
    ];

    /// Attack contacts that win the rally outright.
    pub const ATTACK_SCORES: &'static [ActionType] = &[
        Self::EarnedSpike,
        Self::EarnedTip,
        Self::EarnedDownBallHit,
        Self::EarnedDump,
    ];

    /// Attack and handling mistakes charged against the hitter.
    pub const ATTACK_ERRORS: &'static [ActionType] = &[
        Self::ErrorSpike,
        Self::ErrorTip,
        Self::ErrorDownBallHit,
        Self::ErrorDump,
        Self::FaultBallHandling,
        Self::FaultFootFault,
        Self::FaultBackRowAttack,
    ];

    /// The exact wire string for this action type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InRallyOverPassInPlay => "inRally.overPassInPlay",
            Self::InRallyOneServe => "inRally.oneServe",
            Self::InRallyTwoServe => "inRally.twoServe",
            Self::InRallyThreeServe => "inRally.threeServe",
            Self::InRallyDig => "inRally.dig",
            Self::InRallyHitStillInPlay => "inRally.hitStillInPlay",
            Self::InRallyBlockStillInPlay => "inRally.blockStillInPlay",
            Self::ReceiveOne => "receive.one",
            Self::ReceiveTwo => "receive.two",
            Self::ReceiveThree => "receive.three",
            Self::ReceiveOverpass => "receive.overpass",
            Self::EarnedAce => "earned.ace",
            Self::EarnedSpike => "earned.spike",
            Self::EarnedTip => "earned.tip",
            Self::EarnedDump => "earned.dump",
            Self::EarnedDownBallHit => "earned.downBallHit",
            Self::EarnedBlock => "earned.block",
            Self::EarnedAssist => "earned.assist",
            Self::ErrorServe => "error.serve",
            Self::ErrorSpike => "error.spike",
            Self::ErrorTip => "error.tip",
            Self::ErrorDump => "error.dump",
            Self::ErrorDownBallHit => "error.downBallHit",
            Self::ErrorBlock => "error.block",
            Self::ErrorWhoseBall => "error.whoseBall",
            Self::ErrorReceive => "error.receive",
            Self::ErrorDig => "error.dig",
            Self::ErrorSet => "error.set",
            Self::ErrorFreeBallReceive => "error.freeBallReceive",
            Self::ErrorSecondBallReturn => "error.secondBallReturn",
            Self::ErrorThirdBallReturn => "error.thirdBallReturn",
            Self::FaultNet => "fault.net",
            Self::FaultBallHandling => "fault.ballHandling",
            Self::FaultUnder => "fault.under",
            Self::FaultOverTheNet => "fault.overTheNet",
            Self::FaultFootFault => "fault.footFault",
            Self::FaultOutOfRotation => "fault.outOfRotation",
            Self::FaultBackRowAttack => "fault.backRowAttack",
        }
    }

    /// The dotted-prefix group.
    pub fn group(&self) -> ActionGroup {
        match self.as_str().split_once('.') {
            Some(("inRally", _)) => ActionGroup::InRally,
            Some(("receive", _)) => ActionGroup::Receive,
            Some(("earned", _)) => ActionGroup::Earned,
            Some(("error", _)) => ActionGroup::Error,
            _ => ActionGroup::Fault,
        }
    }

    /// Human-readable label derived from the wire string
    /// (`"earned.downBallHit"` → `"Down Ball Hit"`).
    pub fn label(&self) -> String {
        let core = self
            .as_str()
            .split_once('.')
            .map(|(_, rest)| rest)
            .unwrap_or_else(|| self.as_str());

        let mut label = String::with_capacity(core.len() + 4);
        for (i, ch) in core.chars().enumerate() {
            if i == 0 {
                label.push(ch.to_ascii_uppercase());
            } else if ch.is_ascii_uppercase() {
                label.push(' ');
                label.push(ch);
            } else {
                label.push(ch);
            }
        }
        label
    }
}

impl FromStr for ActionType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| TypeError::UnknownActionType(s.to_string()))
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statistics category for the read-side totals view.
///
/// Each category has a static membership table over [`ActionType`]; one
/// action type may belong to several categories (none do today, but the
/// tables are independent by construction).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatCategory {
    Attack,
    Serve,
    Block,
    Reception,
}

impl StatCategory {
    pub const ALL: [StatCategory; 4] = [Self::Attack, Self::Serve, Self::Block, Self::Reception];

    /// The action types counted toward this category.
    pub fn members(&self) -> &'static [ActionType] {
        match self {
            Self::Attack => &[
                ActionType::EarnedSpike,
                ActionType::EarnedTip,
                ActionType::EarnedDump,
                ActionType::EarnedDownBallHit,
                ActionType::ErrorSpike,
                ActionType::ErrorTip,
                ActionType::ErrorDump,
                ActionType::ErrorDownBallHit,
                ActionType::InRallyHitStillInPlay,
            ],
            Self::Serve => &[
                ActionType::EarnedAce,
                ActionType::ErrorServe,
                ActionType::InRallyOneServe,
                ActionType::InRallyTwoServe,
                ActionType::InRallyThreeServe,
            ],
            Self::Block => &[
                ActionType::EarnedBlock,
                ActionType::ErrorBlock,
                ActionType::InRallyBlockStillInPlay,
            ],
            Self::Reception => &[
                ActionType::ErrorReceive,
                ActionType::ErrorDig,
                ActionType::ErrorFreeBallReceive,
                ActionType::ErrorWhoseBall,
            ],
        }
    }

    /// Returns `true` if the action type counts toward this category.
    pub fn contains(&self, action: ActionType) -> bool {
        self.members().contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_roundtrip_via_from_str() {
        for action in ActionType::ALL {
            let parsed: ActionType = action.as_str().parse().unwrap();
            assert_eq!(action, parsed);
        }
    }

    #[test]
    fn wire_strings_roundtrip_via_serde() {
        for action in ActionType::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
            let parsed: ActionType = serde_json::from_str(&json).unwrap();
            assert_eq!(action, parsed);
        }
    }

    #[test]
    fn unknown_string_is_rejected() {
        let err = "earned.megaSpike".parse::<ActionType>().unwrap_err();
        assert_eq!(err, TypeError::UnknownActionType("earned.megaSpike".into()));
    }

    #[test]
    fn groups_match_prefixes() {
        assert_eq!(ActionType::InRallyDig.group(), ActionGroup::InRally);
        assert_eq!(ActionType::ReceiveTwo.group(), ActionGroup::Receive);
        assert_eq!(ActionType::EarnedAce.group(), ActionGroup::Earned);
        assert_eq!(ActionType::ErrorSet.group(), ActionGroup::Error);
        assert_eq!(ActionType::FaultNet.group(), ActionGroup::Fault);
    }

    #[test]
    fn labels_split_camel_case() {
        assert_eq!(ActionType::EarnedDownBallHit.label(), "Down Ball Hit");
        assert_eq!(ActionType::InRallyOverPassInPlay.label(), "Over Pass In Play");
        assert_eq!(ActionType::ReceiveOne.label(), "One");
    }

    #[test]
    fn category_tables_are_disjoint_today() {
        for action in ActionType::ALL {
            let hits = StatCategory::ALL
                .iter()
                .filter(|c| c.contains(action))
                .count();
            assert!(hits <= 1, "{action} appears in {hits} categories");
        }
    }

    #[test]
    fn serve_category_contains_graded_serves() {
        assert!(StatCategory::Serve.contains(ActionType::InRallyTwoServe));
        assert!(StatCategory::Serve.contains(ActionType::EarnedAce));
        assert!(!StatCategory::Serve.contains(ActionType::EarnedSpike));
    }
}
