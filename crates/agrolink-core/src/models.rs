//! Domain models for Agrolink.
//!
//! These are the core types shared across all crates.

pub mod activity;
pub mod badge;
pub mod search;
pub mod user;
