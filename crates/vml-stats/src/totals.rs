//! Read-side aggregation: on-demand folds of a ledger slice into category
//! totals and team player summaries.
//!
//! Nothing in this module is persisted. Callers pass the (already
//! filtered) actions they care about — a whole match, one set, one player —
//! and get category totals computed from the static membership tables in
//! [`StatCategory`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vml_directory::Player;
use vml_ledger::RecordedAction;
use vml_types::{ActionType, PlayerId, StatCategory, TeamId};

/// Attempt/score/error tally for one category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub attempts: u32,
    pub scored: u32,
    pub errors: u32,
}

impl CategoryTotals {
    fn apply(&mut self, delta: i8) {
        self.attempts += 1;
        if delta > 0 {
            self.scored += 1;
        }
        if delta < 0 {
            self.errors += 1;
        }
    }

    /// Scored-per-attempt ratio, rounded to two decimals; 0 with no attempts.
    pub fn success_rate(&self) -> f64 {
        ratio(self.scored, self.attempts)
    }

    /// Errors-per-attempt ratio, rounded to two decimals; 0 with no attempts.
    pub fn error_rate(&self) -> f64 {
        ratio(self.errors, self.attempts)
    }
}

fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (f64::from(part) / f64::from(whole) * 100.0).round() / 100.0
    }
}

/// The four fixed categories of the totals view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub attack: CategoryTotals,
    pub serve: CategoryTotals,
    pub block: CategoryTotals,
    pub reception: CategoryTotals,
}

impl CategoryBreakdown {
    /// The totals bucket for a category.
    pub fn get(&self, category: StatCategory) -> &CategoryTotals {
        match category {
            StatCategory::Attack => &self.attack,
            StatCategory::Serve => &self.serve,
            StatCategory::Block => &self.block,
            StatCategory::Reception => &self.reception,
        }
    }

    fn get_mut(&mut self, category: StatCategory) -> &mut CategoryTotals {
        match category {
            StatCategory::Attack => &mut self.attack,
            StatCategory::Serve => &mut self.serve,
            StatCategory::Block => &mut self.block,
            StatCategory::Reception => &mut self.reception,
        }
    }
}

/// Raw per-action-type tally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTotals {
    pub attempts: u32,
    pub scored: u32,
    pub errors: u32,
}

/// One player's category and per-type totals over the folded slice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub categories: CategoryBreakdown,
    pub by_type: BTreeMap<ActionType, TypeTotals>,
}

/// Fold a ledger slice into per-player category totals.
///
/// Each action lands in every category whose membership table contains its
/// type, plus the per-type map. Output is ordered by player id.
pub fn fold_player_totals(actions: &[RecordedAction]) -> Vec<PlayerTotals> {
    let mut totals: BTreeMap<PlayerId, PlayerTotals> = BTreeMap::new();

    for action in actions {
        let entry = totals.entry(action.player_id).or_insert_with(|| PlayerTotals {
            player_id: action.player_id,
            team_id: action.team_id,
            categories: CategoryBreakdown::default(),
            by_type: BTreeMap::new(),
        });

        let delta = action.point_delta.value();
        for category in StatCategory::ALL {
            if category.contains(action.action_type) {
                entry.categories.get_mut(category).apply(delta);
            }
        }

        let by_type = entry.by_type.entry(action.action_type).or_default();
        by_type.attempts += 1;
        if delta > 0 {
            by_type.scored += 1;
        }
        if delta < 0 {
            by_type.errors += 1;
        }
    }

    totals.into_values().collect()
}

/// Attack/block sub-aggregate of the team summary view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLine {
    pub total: u32,
    pub scored: u32,
    pub errors: u32,
}

/// Serve-receive sub-aggregate with graded pass counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveLine {
    pub total: u32,
    pub errors: u32,
    pub one: u32,
    pub two: u32,
    pub three: u32,
}

/// One roster player's summary for the match/set stats views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPlayerStats {
    pub player_id: PlayerId,
    pub name: String,
    pub number: u8,
    pub total: u32,
    pub scored: u32,
    pub errors: u32,
    pub attack: ContactLine,
    pub block: ContactLine,
    pub receive: ReceiveLine,
}

impl TeamPlayerStats {
    fn empty(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            number: player.number,
            total: 0,
            scored: 0,
            errors: 0,
            attack: ContactLine::default(),
            block: ContactLine::default(),
            receive: ReceiveLine::default(),
        }
    }

    fn apply(&mut self, action: &RecordedAction) {
        let delta = action.point_delta.value();
        self.total += 1;
        if delta > 0 {
            self.scored += 1;
        }
        if delta < 0 {
            self.errors += 1;
        }

        let ty = action.action_type;
        if ActionType::ATTACK_SCORES.contains(&ty) {
            self.attack.scored += 1;
            self.attack.total += 1;
        } else if ActionType::ATTACK_ERRORS.contains(&ty) {
            // Errors are charged without counting as an attempt here; the
            // category totals view counts them differently on purpose.
            self.attack.errors += 1;
        } else if ty == ActionType::InRallyHitStillInPlay {
            self.attack.total += 1;
        }

        match ty {
            ActionType::EarnedBlock => {
                self.block.scored += 1;
                self.block.total += 1;
            }
            ActionType::ErrorBlock => {
                self.block.errors += 1;
                self.block.total += 1;
            }
            ActionType::InRallyBlockStillInPlay => {
                self.block.total += 1;
            }
            _ => {}
        }

        match ty {
            ActionType::ReceiveOne => {
                self.receive.one += 1;
                self.receive.total += 1;
            }
            ActionType::ReceiveTwo => {
                self.receive.two += 1;
                self.receive.total += 1;
            }
            ActionType::ReceiveThree => {
                self.receive.three += 1;
                self.receive.total += 1;
            }
            ActionType::ReceiveOverpass => {
                self.receive.total += 1;
                self.receive.errors += 1;
            }
            ActionType::ErrorReceive | ActionType::ErrorWhoseBall => {
                self.receive.errors += 1;
                self.receive.total += 1;
            }
            _ => {}
        }
    }
}

/// Build the per-player team summary for a (possibly set-filtered) slice.
///
/// Every roster player gets a row, including players with no actions.
pub fn team_player_stats(roster: &[Player], actions: &[RecordedAction]) -> Vec<TeamPlayerStats> {
    roster
        .iter()
        .map(|player| {
            let mut stats = TeamPlayerStats::empty(player);
            for action in actions.iter().filter(|a| a.player_id == player.id) {
                stats.apply(action);
            }
            stats
        })
        .collect()
}
