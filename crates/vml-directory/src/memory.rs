//! In-memory directory for tests and embedding.
//!
//! [`InMemoryDirectory`] keeps all rosters and match registrations in
//! `HashMap`s behind a single `RwLock`. Data is lost when the directory is
//! dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use vml_types::{MatchId, PlayerId, SetId, TeamId};

use crate::error::{DirectoryError, Result};
use crate::traits::Directory;
use crate::types::{MatchRecord, Player, SetRecord, Team, SETS_PER_MATCH};

/// An in-memory implementation of [`Directory`] with registration helpers.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<DirectoryState>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    teams: HashMap<TeamId, Team>,
    players: HashMap<PlayerId, Player>,
    matches: HashMap<MatchId, MatchRecord>,
    sets: HashMap<SetId, SetRecord>,
}

impl InMemoryDirectory {
    /// Create a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a team.
    pub fn create_team(&self, name: &str) -> Result<Team> {
        let mut state = self.write_state()?;
        let team = Team {
            id: TeamId::new(),
            name: name.to_string(),
        };
        state.teams.insert(team.id, team.clone());
        Ok(team)
    }

    /// Register a player on a team.
    ///
    /// Fails if the team is unknown or the jersey number is already taken
    /// on that roster.
    pub fn create_player(&self, team_id: TeamId, name: &str, number: u8) -> Result<Player> {
        let mut state = self.write_state()?;
        if !state.teams.contains_key(&team_id) {
            return Err(DirectoryError::TeamNotFound);
        }
        let taken = state
            .players
            .values()
            .any(|p| p.team_id == team_id && p.number == number);
        if taken {
            return Err(DirectoryError::NumberTaken { number });
        }

        let player = Player {
            id: PlayerId::new(),
            team_id,
            name: name.to_string(),
            number,
        };
        state.players.insert(player.id, player.clone());
        Ok(player)
    }

    /// Register a match between two distinct teams and seed its five sets.
    pub fn create_match(&self, team_a: TeamId, team_b: TeamId) -> Result<MatchRecord> {
        let mut state = self.write_state()?;
        if team_a == team_b {
            return Err(DirectoryError::TeamsMustDiffer);
        }
        if !state.teams.contains_key(&team_a) || !state.teams.contains_key(&team_b) {
            return Err(DirectoryError::TeamNotFound);
        }

        let record = MatchRecord {
            id: MatchId::new(),
            team_a,
            team_b,
            created_at: Utc::now(),
        };

        for ordinal in 0..SETS_PER_MATCH {
            let set = SetRecord {
                id: SetId::new(),
                match_id: record.id,
                ordinal,
            };
            state.sets.insert(set.id, set);
        }
        state.matches.insert(record.id, record.clone());
        Ok(record)
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, DirectoryState>> {
        self.inner.write().map_err(|_| DirectoryError::LockPoisoned)
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, DirectoryState>> {
        self.inner.read().map_err(|_| DirectoryError::LockPoisoned)
    }
}

impl Directory for InMemoryDirectory {
    fn team_exists(&self, team_id: TeamId) -> Result<bool> {
        Ok(self.read_state()?.teams.contains_key(&team_id))
    }

    fn player_belongs_to_team(&self, player_id: PlayerId, team_id: TeamId) -> Result<bool> {
        Ok(self
            .read_state()?
            .players
            .get(&player_id)
            .is_some_and(|p| p.team_id == team_id))
    }

    fn get_match(&self, match_id: MatchId) -> Result<Option<MatchRecord>> {
        Ok(self.read_state()?.matches.get(&match_id).cloned())
    }

    fn get_set(&self, set_id: SetId) -> Result<Option<SetRecord>> {
        Ok(self.read_state()?.sets.get(&set_id).cloned())
    }

    fn sets_of_match(&self, match_id: MatchId) -> Result<Vec<SetRecord>> {
        let state = self.read_state()?;
        let mut sets: Vec<SetRecord> = state
            .sets
            .values()
            .filter(|s| s.match_id == match_id)
            .cloned()
            .collect();
        sets.sort_by_key(|s| s.ordinal);
        Ok(sets)
    }

    fn players_of_team(&self, team_id: TeamId) -> Result<Vec<Player>> {
        let state = self.read_state()?;
        let mut players: Vec<Player> = state
            .players
            .values()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect();
        players.sort_by_key(|p| p.number);
        Ok(players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory_with_two_teams() -> (InMemoryDirectory, TeamId, TeamId) {
        let dir = InMemoryDirectory::new();
        let home = dir.create_team("Harbor Hawks").unwrap();
        let away = dir.create_team("Valley Vipers").unwrap();
        (dir, home.id, away.id)
    }

    #[test]
    fn create_match_seeds_five_sets() {
        let (dir, home, away) = directory_with_two_teams();
        let m = dir.create_match(home, away).unwrap();

        let sets = dir.sets_of_match(m.id).unwrap();
        assert_eq!(sets.len(), SETS_PER_MATCH as usize);
        let ordinals: Vec<u8> = sets.iter().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3, 4]);
        assert!(sets.iter().all(|s| s.match_id == m.id));
    }

    #[test]
    fn match_requires_distinct_teams() {
        let (dir, home, _) = directory_with_two_teams();
        let err = dir.create_match(home, home).unwrap_err();
        assert_eq!(err, DirectoryError::TeamsMustDiffer);
    }

    #[test]
    fn match_requires_registered_teams() {
        let (dir, home, _) = directory_with_two_teams();
        let err = dir.create_match(home, TeamId::new()).unwrap_err();
        assert_eq!(err, DirectoryError::TeamNotFound);
    }

    #[test]
    fn player_membership() {
        let (dir, home, away) = directory_with_two_teams();
        let libero = dir.create_player(home, "Mara", 7).unwrap();

        assert!(dir.player_belongs_to_team(libero.id, home).unwrap());
        assert!(!dir.player_belongs_to_team(libero.id, away).unwrap());
        assert!(!dir.player_belongs_to_team(PlayerId::new(), home).unwrap());
    }

    #[test]
    fn jersey_numbers_unique_per_team() {
        let (dir, home, away) = directory_with_two_teams();
        dir.create_player(home, "Mara", 7).unwrap();

        let err = dir.create_player(home, "Iris", 7).unwrap_err();
        assert_eq!(err, DirectoryError::NumberTaken { number: 7 });

        // Same number on the other team is fine.
        dir.create_player(away, "Iris", 7).unwrap();
    }

    #[test]
    fn roster_is_number_ordered() {
        let (dir, home, _) = directory_with_two_teams();
        dir.create_player(home, "Nine", 9).unwrap();
        dir.create_player(home, "Two", 2).unwrap();
        dir.create_player(home, "Five", 5).unwrap();

        let numbers: Vec<u8> = dir
            .players_of_team(home)
            .unwrap()
            .iter()
            .map(|p| p.number)
            .collect();
        assert_eq!(numbers, vec![2, 5, 9]);
    }

    #[test]
    fn lookups_miss_cleanly() {
        let dir = InMemoryDirectory::new();
        assert!(dir.get_match(MatchId::new()).unwrap().is_none());
        assert!(dir.get_set(SetId::new()).unwrap().is_none());
        assert!(!dir.team_exists(TeamId::new()).unwrap());
        assert!(dir.sets_of_match(MatchId::new()).unwrap().is_empty());
    }
}
