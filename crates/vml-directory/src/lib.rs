//! Team/player/match/set directory for the Volleyball Match Ledger.
//!
//! The scoring core treats rosters and match registration as an external
//! collaborator with a narrow interface: the [`Directory`] trait answers
//! membership and lookup questions, nothing more. [`InMemoryDirectory`] is
//! the reference implementation for tests and embedding.
//!
//! Creating a match seeds its five sets (ordinals 0..4) in the same call;
//! sets are never created or deleted individually afterwards.

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{DirectoryError, Result};
pub use memory::InMemoryDirectory;
pub use traits::Directory;
pub use types::{MatchRecord, Player, SetRecord, Team, SETS_PER_MATCH};
