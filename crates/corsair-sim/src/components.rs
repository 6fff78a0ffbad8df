//! ECS components for the reference arena.
//!
//! Components are plain data structs with no game logic; the engine's
//! systems do the work.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use corsair_core::enums::MissileLockState;

/// Side a ship fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Crimson,
    Azure,
}

impl Team {
    pub fn opposes(self, other: Team) -> bool {
        self != other
    }
}

/// Stable ship identifier, independent of entity generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipId(pub u32);

/// Marker + team for combat ships.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ship {
    pub team: Team,
}

/// Planar rigid-body state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub heading_deg: f32,
    pub angular_rate_deg: f32,
}

/// Hull and shield pools.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hull {
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
    /// Seconds since the last point of damage, for regen gating.
    pub since_damage_secs: f32,
}

impl Hull {
    pub fn new(max_health: f32, max_shield: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            shield: max_shield,
            max_shield,
            since_damage_secs: f32::MAX,
        }
    }

    pub fn health_frac(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn shield_frac(&self) -> f32 {
        (self.shield / self.max_shield).clamp(0.0, 1.0)
    }

    pub fn alive(&self) -> bool {
        self.health > 0.0
    }

    /// Shield soaks damage first; overflow bleeds into the hull.
    pub fn apply_damage(&mut self, amount: f32) {
        let soaked = amount.min(self.shield);
        self.shield -= soaked;
        self.health = (self.health - (amount - soaked)).max(0.0);
        self.since_damage_secs = 0.0;
    }
}

/// Weapon rig: primary heat plus the secondary seeker state machine.
/// Lock transitions are owned here; agents only read them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeaponRig {
    pub heat: f32,
    pub missile_ammo: u32,
    pub lock: MissileLockState,
    pub lock_progress_secs: f32,
    pub cooldown_secs: f32,
    /// Set when the armament is knocked out entirely.
    pub disabled: bool,
}

impl WeaponRig {
    pub fn new(missile_ammo: u32) -> Self {
        Self {
            heat: 0.0,
            missile_ammo,
            lock: MissileLockState::Idle,
            lock_progress_secs: 0.0,
            cooldown_secs: 0.0,
            disabled: false,
        }
    }

    pub fn armed(&self) -> bool {
        !self.disabled
    }
}

/// Inert obstacle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Asteroid {
    pub radius: f32,
}

/// Secondary round in flight, chasing a ship by id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Missile {
    pub target_ship: ShipId,
    pub fuel_secs: f32,
}
