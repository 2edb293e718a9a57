//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`MerchantConfig`] - A merchant, its keywords and brand pattern
//! - [`Mirror`] - A persisted mirror finding
//! - [`Resolution`] - Where a candidate URL ended up
//! - [`RunSummary`] - Totals of one collection run
//!
//! Creation and update inputs live next to their entity (`NewMirror`,
//! `MirrorKey`, `UpsertOutcome`).

pub mod merchant;
pub mod mirror;
pub mod resolution;
pub mod run_summary;

pub use merchant::{MerchantConfig, default_merchants};
pub use mirror::{
    MerchantCount, Mirror, MirrorFilter, MirrorKey, MirrorStats, NewMirror, UpsertOutcome,
};
pub use resolution::{Resolution, ResolveStrategy};
pub use run_summary::{MerchantTally, RunMode, RunSummary};
