//! High-level scoring API for the Volleyball Match Ledger (VML).
//!
//! [`Scorekeeper`] wires the in-memory directory, ledger, statistics
//! projection and event sink into one object exposing the full operation
//! surface: roster/match registration, action append/delete, starting
//! lineups, rotation replay, and every statistics view.
//!
//! # Example
//!
//! ```
//! use vml_sdk::Scorekeeper;
//!
//! let keeper = Scorekeeper::new();
//! let home = keeper.create_team("Harbor Hawks").unwrap();
//! let away = keeper.create_team("Valley Vipers").unwrap();
//! let match_record = keeper.create_match(home.id, away.id).unwrap();
//! assert_eq!(keeper.sets(match_record.id).unwrap().len(), 5);
//! ```

pub mod error;
pub mod scorekeeper;

pub use error::{SdkError, SdkResult};
pub use scorekeeper::Scorekeeper;
