//! Headless reference arena for CORSAIR agents.
//!
//! Owns a hecs world of ships, asteroids and missiles, adapts it to the
//! core's sensor traits, actuates the commands agents produce, and emits
//! serializable snapshots. Completely headless and deterministic for a
//! given seed, which is what the integration tests rely on.

pub mod arena;
pub mod components;
pub mod engine;
pub mod sensors;
pub mod snapshot;

pub use engine::{ArenaConfig, ArenaEngine};

#[cfg(test)]
mod tests;
