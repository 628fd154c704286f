//! Starting lineups: the six on-court positions and the libero for one
//! team in one set.
//!
//! A lineup gates the start of play and becomes immutable the moment any
//! action lands in the set's ledger (enforced at the store, match-wide for
//! the set). The libero holds a separate slot and never takes part in
//! rotation.

use serde::{Deserialize, Serialize};
use vml_types::{PlayerId, TeamId};

use crate::error::{LedgerError, Result};

/// The locked starting positions for one (set, team) pair.
///
/// `positions[0]` is position 1, the first server. Invariants, checked at
/// construction: all seven players are pairwise distinct and the libero
/// does not occupy position 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingLineup {
    pub team_id: TeamId,
    pub positions: [PlayerId; 6],
    pub libero: PlayerId,
}

impl StartingLineup {
    /// Build a lineup, enforcing the slot invariants.
    pub fn new(team_id: TeamId, positions: [PlayerId; 6], libero: PlayerId) -> Result<Self> {
        let mut all = positions.to_vec();
        all.push(libero);
        all.sort();
        all.dedup();
        if all.len() != 7 {
            return Err(LedgerError::LineupPlayersNotDistinct);
        }
        if positions[0] == libero {
            return Err(LedgerError::LiberoCannotServe);
        }
        Ok(Self {
            team_id,
            positions,
            libero,
        })
    }

    /// All seven rostered ids: the six positions followed by the libero.
    pub fn players(&self) -> [PlayerId; 7] {
        let mut players = [self.libero; 7];
        players[..6].copy_from_slice(&self.positions);
        players[6] = self.libero;
        players
    }
}
