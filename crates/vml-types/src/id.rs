use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new time-ordered id (UUID v7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// Create from an existing UUID.
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// Short representation (first 8 characters of the UUID).
            pub fn short_id(&self) -> String {
                self.0.to_string()[..8].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| TypeError::InvalidId(s.to_string()))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({}:{})"), $prefix, self.short_id())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier for a match (two teams, five sets).
    MatchId,
    "match"
);

entity_id!(
    /// Identifier for one set within a match.
    SetId,
    "set"
);

entity_id!(
    /// Identifier for a team.
    TeamId,
    "team"
);

entity_id!(
    /// Identifier for a player on a team's roster.
    PlayerId,
    "player"
);

entity_id!(
    /// Identifier for a single ledger entry (recorded action).
    ActionId,
    "action"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(MatchId::new(), MatchId::new());
        assert_ne!(PlayerId::new(), PlayerId::new());
    }

    #[test]
    fn uuid_roundtrip() {
        let raw = uuid::Uuid::now_v7();
        let id = ActionId::from_uuid(raw);
        assert_eq!(id.as_uuid(), &raw);
    }

    #[test]
    fn short_id_format() {
        let id = TeamId::new();
        assert_eq!(id.short_id().len(), 8);
    }

    #[test]
    fn parse_roundtrip() {
        let id = SetId::new();
        let parsed: SetId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "not-a-uuid".parse::<MatchId>().unwrap_err();
        assert_eq!(err, TypeError::InvalidId("not-a-uuid".into()));
    }

    #[test]
    fn serde_roundtrip() {
        let id = PlayerId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
