//! Entity spawn factories for setting up the arena world.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use corsair_core::constants::*;

use crate::components::{Asteroid, Body, Hull, Ship, ShipId, Team, WeaponRig};

/// Default hull pool sizes for arena ships.
pub const SHIP_MAX_HEALTH: f32 = 100.0;
pub const SHIP_MAX_SHIELD: f32 = 60.0;
pub const SHIP_MISSILE_LOADOUT: u32 = 4;

/// Spawn one combat ship and return its entity.
pub fn spawn_ship(
    world: &mut World,
    id: ShipId,
    team: Team,
    position: Vec2,
    heading_deg: f32,
) -> Entity {
    world.spawn((
        id,
        Ship { team },
        Body {
            position,
            velocity: Vec2::ZERO,
            heading_deg: heading_deg.rem_euclid(360.0),
            angular_rate_deg: 0.0,
        },
        Hull::new(SHIP_MAX_HEALTH, SHIP_MAX_SHIELD),
        WeaponRig::new(SHIP_MISSILE_LOADOUT),
    ))
}

/// Scatter asteroids across an annulus around the arena center,
/// leaving the spawn lanes near the middle clear.
pub fn spawn_asteroid_field(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    count: usize,
    arena_radius: f32,
) {
    for _ in 0..count {
        let bearing: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
        let range: f32 = rng.gen_range(0.25..0.95) * arena_radius;
        let radius: f32 = rng.gen_range(15.0..45.0);
        world.spawn((
            Body {
                position: Vec2::new(bearing.sin(), bearing.cos()) * range,
                velocity: Vec2::ZERO,
                heading_deg: 0.0,
                angular_rate_deg: 0.0,
            },
            Asteroid { radius },
        ));
    }
}

/// Two opposing ships facing each other across the arena, outside
/// engagement range so the opening moves are observable.
pub fn spawn_duel(world: &mut World) -> (Entity, Entity) {
    let south = spawn_ship(
        world,
        ShipId(0),
        Team::Crimson,
        Vec2::new(0.0, -ENGAGEMENT_RANGE),
        0.0,
    );
    let north = spawn_ship(
        world,
        ShipId(1),
        Team::Azure,
        Vec2::new(0.0, ENGAGEMENT_RANGE),
        180.0,
    );
    (south, north)
}
