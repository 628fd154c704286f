//! Rotation-state replay: a pure fold from starting lineups and the
//! ordered ledger to current on-court positions and the serving team.
//!
//! State is `(positions_a, positions_b, serving_team)`; the transition at
//! each point-deciding entry depends only on which side scored and which
//! side was serving. Nothing incremental is persisted — every read replays
//! the full stream, so the result is the same no matter how many times it
//! is computed.

use serde::{Deserialize, Serialize};
use vml_directory::MatchRecord;
use vml_types::{PlayerId, TeamId, TeamSide};

use crate::lineup::StartingLineup;
use crate::records::{scoring_side, RecordedAction};

/// One team's on-court arrangement after replay.
///
/// `positions[0]` is position 1, the current server when this team holds
/// serve. The libero is carried alongside and never enters the rotating
/// array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub team_id: TeamId,
    pub positions: [PlayerId; 6],
    /// Serving slot; always 1, the array itself rotates.
    pub server_position: u8,
    pub libero: PlayerId,
}

/// Replay output for one set: both teams' positions plus serve state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSnapshot {
    pub team_a: RotationState,
    pub team_b: RotationState,
    pub serving_team: TeamId,
    pub initial_serving_team: TeamId,
}

/// Fold a set's ledger into the current rotation state.
///
/// `initial_serving_team` is the explicitly recorded first server;
/// `None` resolves to team A — the single place that default lives.
pub fn derive_rotation(
    match_record: &MatchRecord,
    lineup_a: &StartingLineup,
    lineup_b: &StartingLineup,
    initial_serving_team: Option<TeamId>,
    actions: &[RecordedAction],
) -> RotationSnapshot {
    let initial = initial_serving_team.unwrap_or(match_record.team_a);
    let mut serving = match_record.side_of(initial).unwrap_or(TeamSide::A);

    let mut positions_a = lineup_a.positions;
    let mut positions_b = lineup_b.positions;

    for action in actions {
        let Some(acting) = match_record.side_of(action.team_id) else {
            continue;
        };
        let Some(scoring) = scoring_side(acting, action.point_delta) else {
            continue;
        };

        // Side-out: the receiving side won the rally, rotates one step
        // forward (position 2 steps into position 1; the old server wraps
        // to position 6) and takes over serve. A side that scores on its
        // own serve neither rotates nor yields the ball.
        let receiving = serving.opposite();
        if scoring == receiving {
            match scoring {
                TeamSide::A => positions_a.rotate_left(1),
                TeamSide::B => positions_b.rotate_left(1),
            }
            serving = scoring;
        }
    }

    RotationSnapshot {
        team_a: RotationState {
            team_id: match_record.team_a,
            positions: positions_a,
            server_position: 1,
            libero: lineup_a.libero,
        },
        team_b: RotationState {
            team_id: match_record.team_b,
            positions: positions_b,
            server_position: 1,
            libero: lineup_b.libero,
        },
        serving_team: match_record.team_on(serving),
        initial_serving_team: initial,
    }
}
