//! Serializable per-tick arena snapshots.
//!
//! The observation surface for telemetry and tests: ship status with the
//! active behavior and last utility scores, plus missiles in flight.
//! Determinism tests compare serialized snapshots byte for byte.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use corsair_core::enums::{MissileLockState, StateKind};

use crate::components::Team;

/// One ship's externally visible state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipStatus {
    pub id: u32,
    pub team: Team,
    pub position: Vec2,
    pub velocity: Vec2,
    pub heading_deg: f32,
    pub health: f32,
    pub shield: f32,
    pub weapon_heat: f32,
    pub missile_ammo: u32,
    pub missile_lock: MissileLockState,
    /// Active behavior, from the agent's read-only accessors.
    pub active_state: StateKind,
    /// Last utility scores in declaration order.
    pub utility_scores: [f32; 6],
}

/// One missile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileStatus {
    pub position: Vec2,
    pub target_ship: u32,
}

/// One obstacle (static once spawned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidStatus {
    pub position: Vec2,
    pub radius: f32,
}

/// Full arena state for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub tick: u64,
    pub elapsed_secs: f32,
    pub ships: Vec<ShipStatus>,
    pub missiles: Vec<MissileStatus>,
    pub asteroids: Vec<AsteroidStatus>,
}
