//! Event notifications emitted after successful ledger mutations.
//!
//! Events exist for observability and cache invalidation only; no core
//! logic depends on a subscriber having seen one. A sink that drops every
//! event ([`NullSink`]) is a correct sink.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use vml_types::{ActionId, MatchId, PlayerId, Score, SetId, TeamId};

use crate::records::RecordedAction;

/// Notification of one committed ledger mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// An action was appended; `score` is the set score after the append.
    ActionRecorded {
        action: RecordedAction,
        score: Score,
    },
    /// An action was removed; `score` is the fully recomputed set score.
    ActionDeleted {
        action_id: ActionId,
        match_id: MatchId,
        set_id: SetId,
        team_id: TeamId,
        player_id: PlayerId,
        score: Score,
    },
    StartingRotationSet {
        set_id: SetId,
        team_id: TeamId,
        positions: [PlayerId; 6],
        libero: PlayerId,
    },
    StartingRotationDeleted {
        set_id: SetId,
        team_id: TeamId,
    },
}

/// Receiver of committed-mutation notifications.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &MatchEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &MatchEvent) {}
}

/// Sink that captures events in memory, for tests and local inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<MatchEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    pub fn events(&self) -> Vec<MatchEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Drain and return everything published so far.
    pub fn take(&self) -> Vec<MatchEvent> {
        self.events
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &MatchEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_captures_in_order() {
        let sink = RecordingSink::new();
        let set_id = SetId::new();
        let team_id = TeamId::new();

        sink.publish(&MatchEvent::StartingRotationDeleted { set_id, team_id });
        sink.publish(&MatchEvent::StartingRotationDeleted {
            set_id,
            team_id: TeamId::new(),
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            MatchEvent::StartingRotationDeleted { team_id: t, .. } if t == team_id
        ));

        let drained = sink.take();
        assert_eq!(drained.len(), 2);
        assert!(sink.events().is_empty());
    }
}
