//! Per-tick decision context.
//!
//! A read-only snapshot of self/enemy/environment facts, constructed
//! fresh each tick from environment queries and consumed by every
//! utility function and the gunner. Percentage fields are clamped to
//! `[0,1]` at construction; when no enemy exists every enemy-derived
//! field holds a defined neutral value instead of garbage.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::ENGAGEMENT_RANGE;
use crate::enums::MissileLockState;
use crate::types::{heading_delta_deg, heading_from_vec, Kinematics};

/// Own-ship status inputs reported by the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SelfStatus {
    /// Hull fraction `[0,1]`.
    pub health: f32,
    /// Shield fraction `[0,1]`.
    pub shield: f32,
    /// Primary weapon heat fraction `[0,1]`.
    pub weapon_heat: f32,
    /// Secondary rounds remaining.
    pub missile_ammo: u32,
    /// Secondary seeker state (owned by the weapon rig).
    pub missile_lock: MissileLockState,
    /// A hostile missile is tracking this ship.
    pub incoming_missile: bool,
}

/// Snapshot of the nearest enemy ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyContact {
    pub kinematics: Kinematics,
    /// Enemy hull fraction `[0,1]`.
    pub health: f32,
    /// Enemy shield fraction `[0,1]`.
    pub shield: f32,
    /// False once the enemy has exhausted its armament.
    pub armed: bool,
}

/// The per-tick decision context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub kinematics: Kinematics,
    pub health: f32,
    pub shield: f32,
    pub weapon_heat: f32,
    pub missile_ammo: u32,
    pub missile_lock: MissileLockState,
    pub incoming_missile: bool,

    /// Nearest live enemy, if any.
    pub enemy: Option<EnemyContact>,
    /// Vector from self to the enemy; zero when no enemy.
    pub to_enemy: Vec2,
    /// Distance to the enemy in meters; zero when no enemy.
    pub enemy_distance: f32,
    /// Absolute off-boresight angle to the enemy in degrees `[0,180]`.
    pub enemy_bearing_deg: f32,
    /// Unobstructed straight line to the enemy.
    pub has_los: bool,
    /// Rate of range closure in m/s (positive when converging).
    pub closing_speed: f32,

    /// Enemy ships within the sensing radius.
    pub enemies_nearby: u32,
    /// Friendly ships within the sensing radius.
    pub friends_nearby: u32,
    /// Enemy present and active.
    pub in_combat: bool,
}

fn frac(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl Context {
    /// Context with no enemy in play: all enemy-derived fields neutral.
    pub fn without_enemy(kinematics: Kinematics, status: SelfStatus, friends_nearby: u32) -> Self {
        Self {
            kinematics,
            health: frac(status.health),
            shield: frac(status.shield),
            weapon_heat: frac(status.weapon_heat),
            missile_ammo: status.missile_ammo,
            missile_lock: status.missile_lock,
            incoming_missile: status.incoming_missile,
            enemy: None,
            to_enemy: Vec2::ZERO,
            enemy_distance: 0.0,
            enemy_bearing_deg: 0.0,
            has_los: false,
            closing_speed: 0.0,
            enemies_nearby: 0,
            friends_nearby,
            in_combat: false,
        }
    }

    /// Context with the nearest enemy resolved.
    pub fn with_enemy(
        kinematics: Kinematics,
        status: SelfStatus,
        enemy: EnemyContact,
        has_los: bool,
        enemies_nearby: u32,
        friends_nearby: u32,
    ) -> Self {
        let to_enemy = enemy.kinematics.position - kinematics.position;
        let enemy_distance = to_enemy.length();
        let bearing = heading_from_vec(to_enemy);
        let enemy_bearing_deg = heading_delta_deg(kinematics.heading_deg, bearing).abs();
        // Positive when the gap is shrinking.
        let closing_speed = if enemy_distance > f32::EPSILON {
            -(enemy.kinematics.velocity - kinematics.velocity).dot(to_enemy / enemy_distance)
        } else {
            0.0
        };

        let enemy = EnemyContact {
            health: frac(enemy.health),
            shield: frac(enemy.shield),
            ..enemy
        };

        Self {
            kinematics,
            health: frac(status.health),
            shield: frac(status.shield),
            weapon_heat: frac(status.weapon_heat),
            missile_ammo: status.missile_ammo,
            missile_lock: status.missile_lock,
            incoming_missile: status.incoming_missile,
            enemy: Some(enemy),
            to_enemy,
            enemy_distance,
            enemy_bearing_deg,
            has_los,
            closing_speed,
            enemies_nearby: enemies_nearby.max(1),
            friends_nearby,
            in_combat: true,
        }
    }

    /// Enemy distance normalized by the engagement range, clamped `[0,1]`.
    /// 1.0 when no enemy (maximally far).
    pub fn range_frac(&self) -> f32 {
        if self.enemy.is_none() {
            return 1.0;
        }
        (self.enemy_distance / ENGAGEMENT_RANGE).clamp(0.0, 1.0)
    }

    /// Facing quality toward the enemy: 1 nose-on, 0 tail-on.
    pub fn facing_frac(&self) -> f32 {
        1.0 - (self.enemy_bearing_deg / 180.0).clamp(0.0, 1.0)
    }

    /// More hostile than friendly hulls in sensor range.
    pub fn outnumbered(&self) -> bool {
        self.enemies_nearby > self.friends_nearby + 1
    }
}
