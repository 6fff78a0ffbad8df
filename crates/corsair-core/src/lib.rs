//! Core data model for CORSAIR combat-ship agents.
//!
//! Leaf types shared by the navigation and agent crates: kinematic
//! snapshots, the per-tick decision context, steering/fire commands,
//! utility curves, and the sensor trait boundary to the host environment.
//! No ECS dependency — everything here operates on plain data.

pub mod constants;
pub mod context;
pub mod curves;
pub mod enums;
pub mod geom;
pub mod sensors;
pub mod types;
