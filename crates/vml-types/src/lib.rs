//! Foundation types for the Volleyball Match Ledger (VML).
//!
//! This crate provides the identity, vocabulary, and scoring types used
//! throughout the VML system. Every other VML crate depends on `vml-types`.
//!
//! # Key Types
//!
//! - [`MatchId`], [`SetId`], [`TeamId`], [`PlayerId`], [`ActionId`] — UUID v7
//!   entity identifiers
//! - [`ActionType`] — the closed, dot-grouped action vocabulary that must
//!   round-trip exactly on the wire
//! - [`StatCategory`] — static action-type → category membership tables
//! - [`PointDelta`] — validated rally outcome in {-1, 0, +1}
//! - [`Score`] — a set's point pair
//! - [`TeamSide`] — which of a match's two teams (A or B)

pub mod action;
pub mod error;
pub mod id;
pub mod score;

pub use action::{ActionGroup, ActionType, StatCategory};
pub use error::TypeError;
pub use id::{ActionId, MatchId, PlayerId, SetId, TeamId};
pub use score::{PointDelta, Score, TeamSide};
