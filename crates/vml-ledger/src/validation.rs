use vml_types::SetId;

use crate::error::Result;
use crate::records::{fold_score, next_rally};
use crate::traits::LedgerReader;

/// Result of validating one set's stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub set_id: SetId,
    pub action_count: usize,
    pub sequences_dense: bool,
    pub rallies_consistent: bool,
    pub score_matches_fold: bool,
    pub stream_attributed: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub sequence: u32,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    SequenceGap,
    RallyMismatch,
    ScoreDrift,
    ForeignEntry,
}

/// Stream integrity validator.
///
/// The engine can only produce streams that pass; the validator exists for
/// diagnostics and for tests that corrupt a stream on purpose.
pub struct LedgerValidator;

impl LedgerValidator {
    /// Validate one set's stream for all ledger invariants.
    pub fn validate_set<R: LedgerReader>(reader: &R, set_id: SetId) -> Result<ValidationReport> {
        let actions = reader.actions_for_set(set_id)?;
        let context = reader.set_context(set_id)?;
        let cached_score = reader.set_score(set_id)?;

        let mut violations = Vec::new();
        let mut sequences_dense = true;
        let mut rallies_consistent = true;
        let mut stream_attributed = true;

        let mut last_rally = 0u32;
        for (index, action) in actions.iter().enumerate() {
            let expected_seq = (index + 1) as u32;
            if action.sequence != expected_seq {
                sequences_dense = false;
                violations.push(Violation {
                    sequence: action.sequence,
                    kind: ViolationKind::SequenceGap,
                    description: format!(
                        "expected sequence {expected_seq}, found {}",
                        action.sequence
                    ),
                });
            }

            let expected_rally = next_rally(last_rally, action.point_delta);
            if action.rally != expected_rally {
                rallies_consistent = false;
                violations.push(Violation {
                    sequence: action.sequence,
                    kind: ViolationKind::RallyMismatch,
                    description: format!(
                        "expected rally {expected_rally}, found {}",
                        action.rally
                    ),
                });
            }
            last_rally = expected_rally;

            if let Some(ctx) = &context {
                let known_team =
                    action.team_id == ctx.team_a || action.team_id == ctx.team_b;
                if action.set_id != ctx.set_id || action.match_id != ctx.match_id || !known_team {
                    stream_attributed = false;
                    violations.push(Violation {
                        sequence: action.sequence,
                        kind: ViolationKind::ForeignEntry,
                        description: "entry does not belong to this stream".into(),
                    });
                }
            }
        }

        let score_matches_fold = match &context {
            Some(ctx) => {
                let folded = fold_score(ctx.team_a, &actions);
                if folded != cached_score {
                    violations.push(Violation {
                        sequence: 0,
                        kind: ViolationKind::ScoreDrift,
                        description: format!(
                            "cached score {cached_score} differs from fold {folded}"
                        ),
                    });
                    false
                } else {
                    true
                }
            }
            // No stream yet: the zero score is trivially correct.
            None => true,
        };

        Ok(ValidationReport {
            set_id,
            action_count: actions.len(),
            sequences_dense,
            rallies_consistent,
            score_matches_fold,
            stream_attributed,
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use vml_types::{ActionType, MatchId, PlayerId, PointDelta, TeamId};

    use crate::memory::InMemoryLedger;
    use crate::records::{ActionDraft, SetContext};
    use crate::traits::{LedgerReader as _, LedgerWriter};

    use super::*;

    fn context() -> SetContext {
        SetContext::new(SetId::new(), MatchId::new(), TeamId::new(), TeamId::new())
    }

    fn draft(team_id: TeamId, delta: i8) -> ActionDraft {
        ActionDraft {
            team_id,
            player_id: PlayerId::new(),
            action_type: if delta > 0 {
                ActionType::EarnedSpike
            } else if delta < 0 {
                ActionType::ErrorSpike
            } else {
                ActionType::InRallyDig
            },
            outcome: "validated".into(),
            point_delta: PointDelta::new(delta).unwrap(),
            occurred_at: None,
            metadata: None,
        }
    }

    #[test]
    fn engine_produced_streams_pass() {
        let ledger = InMemoryLedger::new();
        let ctx = context();
        for delta in [0, 1, 0, -1, 1] {
            ledger.append_action(&ctx, draft(ctx.team_a, delta)).unwrap();
        }

        let report = LedgerValidator::validate_set(&ledger, ctx.set_id).unwrap();
        assert!(report.is_valid(), "violations: {:?}", report.violations);
        assert_eq!(report.action_count, 5);
    }

    #[test]
    fn stream_survives_interior_delete() {
        let ledger = InMemoryLedger::new();
        let ctx = context();
        let mut ids = Vec::new();
        for delta in [1, 1, -1, 0, 1] {
            let (action, _) = ledger.append_action(&ctx, draft(ctx.team_b, delta)).unwrap();
            ids.push(action.id);
        }
        ledger.delete_action(ids[1]).unwrap();

        let report = LedgerValidator::validate_set(&ledger, ctx.set_id).unwrap();
        assert!(report.is_valid(), "violations: {:?}", report.violations);
    }

    #[test]
    fn empty_set_is_valid() {
        let ledger = InMemoryLedger::new();
        let report = LedgerValidator::validate_set(&ledger, SetId::new()).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.action_count, 0);
    }

    #[test]
    fn point_total_equals_nonzero_entries() {
        let ledger = InMemoryLedger::new();
        let ctx = context();
        let deltas = [1, 0, -1, 1, 0, 0, -1];
        for delta in deltas {
            ledger.append_action(&ctx, draft(ctx.team_a, delta)).unwrap();
        }

        let report = LedgerValidator::validate_set(&ledger, ctx.set_id).unwrap();
        assert!(report.is_valid());

        let score = ledger.set_score(ctx.set_id).unwrap();
        let nonzero = deltas.iter().filter(|d| **d != 0).count() as u32;
        assert_eq!(score.total(), nonzero);
    }
}
