//! Arena engine — drives agents and actuates their commands.
//!
//! Owns the hecs world and one `ShipAgent` per ship, runs the full tick
//! pipeline (context → decisions → movement → weapons → missiles →
//! rigs → cleanup), and produces `ArenaSnapshot`s. Deterministic for a
//! given seed: ships are processed in stable id order and all randomness
//! flows from seeded ChaCha8 streams.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use corsair_core::constants::*;
use corsair_core::context::{Context, EnemyContact, SelfStatus};
use corsair_core::enums::MissileLockState;
use corsair_core::sensors::VisibilityProbe;
use corsair_core::types::{
    heading_delta_deg, heading_from_vec, vec_from_heading, Command, Kinematics, SimTime,
    SteeringTuning,
};
use corsair_agent::{AgentConfig, ConfigError, ShipAgent};

use crate::arena;
use crate::components::{Asteroid, Body, Hull, Missile, Ship, ShipId, Team, WeaponRig};
use crate::sensors::WorldSensors;
use crate::snapshot::{ArenaSnapshot, AsteroidStatus, MissileStatus, ShipStatus};

/// Configuration for starting a new arena.
#[derive(Debug, Clone, Copy)]
pub struct ArenaConfig {
    /// RNG seed for determinism. Same seed = same arena.
    pub seed: u64,
    /// Asteroids scattered at setup.
    pub asteroid_count: usize,
    /// Field radius for asteroid placement (meters).
    pub arena_radius: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            asteroid_count: 12,
            arena_radius: 1_600.0,
        }
    }
}

/// The reference arena. Owns the world and every ship's agent.
pub struct ArenaEngine {
    world: World,
    agents: HashMap<u32, ShipAgent>,
    time: SimTime,
    rng: ChaCha8Rng,
    seed: u64,
    next_ship_id: u32,
    despawn_buffer: Vec<Entity>,
}

impl ArenaEngine {
    /// Set up an arena with an asteroid field and a two-ship duel.
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        let mut engine = Self::empty(config)?;
        arena::spawn_asteroid_field(
            &mut engine.world,
            &mut engine.rng,
            config.asteroid_count,
            config.arena_radius,
        );
        let duel = arena::spawn_duel(&mut engine.world);
        engine.register_agent(duel)?;
        engine.next_ship_id = 2;
        Ok(engine)
    }

    /// An arena with no entities, for tests that place their own.
    pub fn empty(config: ArenaConfig) -> Result<Self, ConfigError> {
        // Validate the shared agent config once up front: a bad arena
        // setup should fail here, not on the first spawn.
        Self::agent_config(config.seed, 0).validate()?;
        Ok(Self {
            world: World::new(),
            agents: HashMap::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            seed: config.seed,
            next_ship_id: 0,
            despawn_buffer: Vec::new(),
        })
    }

    fn agent_config(seed: u64, ship_id: u32) -> AgentConfig {
        AgentConfig {
            tuning: SteeringTuning::from_engine(
                SHIP_MASS,
                SHIP_FORWARD_FORCE,
                SHIP_REVERSE_FORCE,
                SHIP_STRAFE_FORCE,
                SHIP_DEAD_ZONE,
            ),
            // Decorrelate per-ship streams without losing determinism.
            seed: seed.wrapping_add(ship_id as u64).wrapping_mul(0x9E37_79B9),
            ..AgentConfig::default()
        }
    }

    fn register_agent(&mut self, (a, b): (Entity, Entity)) -> Result<(), ConfigError> {
        for entity in [a, b] {
            let id = self
                .world
                .get::<&ShipId>(entity)
                .map(|id| id.0)
                .unwrap_or_default();
            self.agents
                .insert(id, ShipAgent::new(Self::agent_config(self.seed, id))?);
        }
        Ok(())
    }

    /// Spawn an additional ship with its own agent.
    pub fn spawn_ship(
        &mut self,
        team: Team,
        position: Vec2,
        heading_deg: f32,
    ) -> Result<ShipId, ConfigError> {
        let id = ShipId(self.next_ship_id);
        self.next_ship_id += 1;
        arena::spawn_ship(&mut self.world, id, team, position, heading_deg);
        self.agents
            .insert(id.0, ShipAgent::new(Self::agent_config(self.seed, id.0))?);
        Ok(id)
    }

    /// Place an inert obstacle.
    pub fn spawn_obstacle(&mut self, position: Vec2, radius: f32) {
        self.world.spawn((
            Body {
                position,
                ..Body::default()
            },
            Asteroid { radius },
        ));
    }

    /// Apply direct damage to a ship (for tests and scripted scenarios).
    #[cfg(test)]
    pub fn damage_ship(&mut self, id: ShipId, amount: f32) {
        for (_entity, (ship_id, hull)) in self.world.query_mut::<(&ShipId, &mut Hull)>() {
            if *ship_id == id {
                hull.apply_damage(amount);
            }
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn agent(&self, id: ShipId) -> Option<&ShipAgent> {
        self.agents.get(&id.0)
    }

    /// Advance the arena by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> ArenaSnapshot {
        let dt = DT;

        // Live ships in stable id order — the decision order contract.
        let mut roster: Vec<(ShipId, Entity, Team)> = {
            let mut q = self.world.query::<(&ShipId, &Ship, &Hull)>();
            q.iter()
                .filter(|(_, (_, _, hull))| hull.alive())
                .map(|(e, (id, ship, _))| (*id, e, ship.team))
                .collect()
        };
        roster.sort_by_key(|(id, _, _)| id.0);

        let targeted: HashSet<u32> = {
            let mut q = self.world.query::<&Missile>();
            q.iter().map(|(_, m)| m.target_ship.0).collect()
        };

        // 1. Decisions: context in, command out, world untouched.
        let mut commands: Vec<(Entity, ShipId, Team, Command)> = Vec::new();
        for &(id, entity, team) in &roster {
            let Some(ctx) =
                build_context(&self.world, entity, team, targeted.contains(&id.0))
            else {
                continue;
            };
            let Some(agent) = self.agents.get_mut(&id.0) else {
                continue;
            };
            let sensors = WorldSensors::new(&self.world, entity, team);
            let cmd = agent.tick(&ctx, &sensors, &sensors, dt);
            commands.push((entity, id, team, cmd));
        }

        // 2. Movement actuation.
        for &(entity, _, _, cmd) in &commands {
            apply_movement(&mut self.world, entity, &cmd, dt);
        }

        // 3. Weapon actuation.
        let mut damage: Vec<(Entity, f32)> = Vec::new();
        let mut launches: Vec<(Vec2, f32, ShipId)> = Vec::new();
        for &(entity, _, team, cmd) in &commands {
            self.fire_weapons(entity, team, &cmd, &mut damage, &mut launches);
        }
        for (position, heading_deg, target) in launches {
            self.world.spawn((
                Body {
                    position,
                    velocity: vec_from_heading(heading_deg) * MISSILE_SPEED,
                    heading_deg,
                    angular_rate_deg: 0.0,
                },
                Missile {
                    target_ship: target,
                    fuel_secs: MISSILE_FUEL_SECS,
                },
            ));
        }

        // 4. Missile flight and proximity kills.
        self.fly_missiles(dt, &mut damage);

        // 5. Damage application.
        for (entity, amount) in damage {
            if let Ok(mut hull) = self.world.get::<&mut Hull>(entity) {
                hull.apply_damage(amount);
            }
        }

        // 6. Weapon rigs and shield regeneration.
        self.update_rigs(&roster, dt);

        // 7. Cleanup.
        self.cleanup();

        self.time.advance();
        self.build_snapshot()
    }

    /// Resolve one ship's fire flags against the world.
    ///
    /// The environment re-checks the gunner's envelope before spending
    /// heat or ammo — a stale command must not fire through a rock.
    fn fire_weapons(
        &mut self,
        entity: Entity,
        team: Team,
        cmd: &Command,
        damage: &mut Vec<(Entity, f32)>,
        launches: &mut Vec<(Vec2, f32, ShipId)>,
    ) {
        if !cmd.fire_primary && !cmd.fire_secondary {
            return;
        }
        let Ok(body) = self.world.get::<&Body>(entity).map(|b| *b) else {
            return;
        };
        let Some((target_entity, target_id, target_pos)) =
            nearest_enemy(&self.world, entity, team, body.position)
        else {
            return;
        };

        let distance = (target_pos - body.position).length();
        let off_deg = heading_delta_deg(
            body.heading_deg,
            heading_from_vec(target_pos - body.position),
        )
        .abs();
        let clear = WorldSensors::new(&self.world, entity, team)
            .segment_clear(body.position, target_pos);

        let Ok(mut rig) = self.world.get::<&mut WeaponRig>(entity) else {
            return;
        };

        if cmd.fire_primary && rig.heat < 1.0 && !rig.disabled {
            rig.heat = (rig.heat + PRIMARY_HEAT_PER_SHOT).min(1.0);
            let on_target = distance <= PRIMARY_FIRE_RANGE
                && off_deg <= PRIMARY_FIRE_ANGLE_DEG * 1.5
                && clear;
            if on_target {
                damage.push((target_entity, PRIMARY_DAMAGE));
            }
        }

        if cmd.fire_secondary && rig.missile_ammo > 0 && !rig.disabled {
            let permitted = match rig.lock {
                MissileLockState::Locked => true,
                MissileLockState::Idle | MissileLockState::Locking => {
                    distance <= MISSILE_DUMBFIRE_RANGE && clear
                }
                MissileLockState::Cooldown => false,
            };
            if permitted {
                rig.missile_ammo -= 1;
                rig.lock = MissileLockState::Cooldown;
                rig.lock_progress_secs = 0.0;
                rig.cooldown_secs = MISSILE_COOLDOWN_SECS;
                launches.push((body.position, body.heading_deg, target_id));
            }
        }
    }

    /// Pure-pursuit missile guidance with proximity detonation.
    fn fly_missiles(&mut self, dt: f32, damage: &mut Vec<(Entity, f32)>) {
        let ship_positions: HashMap<u32, (Entity, Vec2)> = {
            let mut q = self.world.query::<(&ShipId, &Body, &Hull)>();
            q.iter()
                .filter(|(_, (_, _, hull))| hull.alive())
                .map(|(e, (id, body, _))| (id.0, (e, body.position)))
                .collect()
        };
        let rocks: Vec<(Vec2, f32)> = {
            let mut q = self.world.query::<(&Body, &Asteroid)>();
            q.iter()
                .map(|(_, (body, rock))| (body.position, rock.radius))
                .collect()
        };

        let mut detonations: Vec<Entity> = Vec::new();
        for (entity, (body, missile)) in self.world.query_mut::<(&mut Body, &mut Missile)>() {
            missile.fuel_secs -= dt;
            match ship_positions.get(&missile.target_ship.0) {
                Some(&(_, target_pos)) => {
                    let to_target = target_pos - body.position;
                    let distance = to_target.length();
                    if distance > 1.0 {
                        body.velocity = to_target / distance * MISSILE_SPEED;
                        body.heading_deg = heading_from_vec(body.velocity);
                    }
                    body.position += body.velocity * dt;
                    if distance <= MISSILE_LETHAL_RADIUS {
                        // Kill roll happens below, once the query borrow ends.
                        detonations.push(entity);
                    }
                }
                None => self.despawn_buffer.push(entity),
            }
            // Rounds that plow into a rock are lost.
            if rocks
                .iter()
                .any(|&(pos, radius)| (body.position - pos).length() <= radius)
            {
                self.despawn_buffer.push(entity);
            }
            if missile.fuel_secs <= 0.0 {
                self.despawn_buffer.push(entity);
            }
        }

        for missile_entity in detonations {
            let target = self
                .world
                .get::<&Missile>(missile_entity)
                .ok()
                .and_then(|m| ship_positions.get(&m.target_ship.0).copied());
            if let Some((target_entity, _)) = target {
                if self.rng.gen_bool(MISSILE_PK) {
                    damage.push((target_entity, MISSILE_DAMAGE));
                }
            }
            self.despawn_buffer.push(missile_entity);
        }
    }

    /// Seeker lock transitions, heat dissipation, shield regeneration.
    /// The lock state machine lives here — agents only read it.
    fn update_rigs(&mut self, roster: &[(ShipId, Entity, Team)], dt: f32) {
        for &(_, entity, team) in roster {
            let Ok(body) = self.world.get::<&Body>(entity).map(|b| *b) else {
                continue;
            };
            let seeker_hold = nearest_enemy(&self.world, entity, team, body.position)
                .map(|(_, _, target_pos)| {
                    let distance = (target_pos - body.position).length();
                    let off_deg = heading_delta_deg(
                        body.heading_deg,
                        heading_from_vec(target_pos - body.position),
                    )
                    .abs();
                    distance <= MISSILE_LOCK_RANGE && off_deg <= MISSILE_LOCK_ANGLE_DEG
                })
                .unwrap_or(false);

            let Ok(mut rig) = self.world.get::<&mut WeaponRig>(entity) else {
                continue;
            };
            rig.heat = (rig.heat - HEAT_DISSIPATION_PER_SEC * dt).max(0.0);

            match rig.lock {
                MissileLockState::Idle => {
                    if seeker_hold && rig.missile_ammo > 0 {
                        rig.lock = MissileLockState::Locking;
                        rig.lock_progress_secs = 0.0;
                    }
                }
                MissileLockState::Locking => {
                    if !seeker_hold {
                        rig.lock = MissileLockState::Idle;
                        rig.lock_progress_secs = 0.0;
                    } else {
                        rig.lock_progress_secs += dt;
                        if rig.lock_progress_secs >= MISSILE_LOCK_SECS {
                            rig.lock = MissileLockState::Locked;
                        }
                    }
                }
                MissileLockState::Locked => {
                    if !seeker_hold {
                        rig.lock = MissileLockState::Idle;
                        rig.lock_progress_secs = 0.0;
                    }
                }
                MissileLockState::Cooldown => {
                    rig.cooldown_secs -= dt;
                    if rig.cooldown_secs <= 0.0 {
                        rig.lock = MissileLockState::Idle;
                        rig.cooldown_secs = 0.0;
                    }
                }
            }
        }

        for (_entity, hull) in self.world.query_mut::<&mut Hull>() {
            if !hull.alive() {
                continue;
            }
            if hull.since_damage_secs < f32::MAX {
                hull.since_damage_secs += dt;
            }
            if hull.since_damage_secs >= SHIELD_REGEN_DELAY_SECS {
                hull.shield =
                    (hull.shield + SHIELD_REGEN_PER_SEC * hull.max_shield * dt).min(hull.max_shield);
            }
        }
    }

    /// Despawn dead ships (and retire their agents) plus expired missiles.
    fn cleanup(&mut self) {
        let dead: Vec<(Entity, u32)> = {
            let mut q = self.world.query::<(&ShipId, &Hull)>();
            q.iter()
                .filter(|(_, (_, hull))| !hull.alive())
                .map(|(e, (id, _))| (e, id.0))
                .collect()
        };
        for (entity, id) in dead {
            self.agents.remove(&id);
            self.despawn_buffer.push(entity);
        }

        for entity in self.despawn_buffer.drain(..) {
            let _ = self.world.despawn(entity);
        }
    }

    fn build_snapshot(&self) -> ArenaSnapshot {
        let mut ships: Vec<ShipStatus> = {
            let mut q = self.world.query::<(&ShipId, &Ship, &Body, &Hull, &WeaponRig)>();
            q.iter()
                .map(|(_, (id, ship, body, hull, rig))| {
                    let (active_state, utility_scores) = self
                        .agents
                        .get(&id.0)
                        .map(|a| (a.active_state(), *a.utility_scores()))
                        .unwrap_or_default();
                    ShipStatus {
                        id: id.0,
                        team: ship.team,
                        position: body.position,
                        velocity: body.velocity,
                        heading_deg: body.heading_deg,
                        health: hull.health_frac(),
                        shield: hull.shield_frac(),
                        weapon_heat: rig.heat,
                        missile_ammo: rig.missile_ammo,
                        missile_lock: rig.lock,
                        active_state,
                        utility_scores,
                    }
                })
                .collect()
        };
        ships.sort_by_key(|s| s.id);

        let missiles: Vec<MissileStatus> = {
            let mut q = self.world.query::<(&Body, &Missile)>();
            let mut list: Vec<MissileStatus> = q
                .iter()
                .map(|(_, (body, missile))| MissileStatus {
                    position: body.position,
                    target_ship: missile.target_ship.0,
                })
                .collect();
            list.sort_by_key(|m| m.target_ship);
            list
        };

        let mut asteroids: Vec<AsteroidStatus> = {
            let mut q = self.world.query::<(&Body, &Asteroid)>();
            q.iter()
                .map(|(_, (body, rock))| AsteroidStatus {
                    position: body.position,
                    radius: rock.radius,
                })
                .collect()
        };
        asteroids.sort_by(|a, b| {
            a.position
                .x
                .total_cmp(&b.position.x)
                .then(a.position.y.total_cmp(&b.position.y))
        });

        ArenaSnapshot {
            tick: self.time.tick,
            elapsed_secs: self.time.elapsed_secs,
            ships,
            missiles,
            asteroids,
        }
    }
}

/// Nearest live opposing ship to `from`, if any.
fn nearest_enemy(
    world: &World,
    self_entity: Entity,
    team: Team,
    from: Vec2,
) -> Option<(Entity, ShipId, Vec2)> {
    let mut best: Option<(f32, Entity, ShipId, Vec2)> = None;
    let mut q = world.query::<(&ShipId, &Ship, &Body, &Hull)>();
    for (entity, (id, ship, body, hull)) in q.iter() {
        if entity == self_entity || !hull.alive() || !ship.team.opposes(team) {
            continue;
        }
        let d = (body.position - from).length();
        if best.map_or(true, |(bd, ..)| d < bd) {
            best = Some((d, entity, *id, body.position));
        }
    }
    best.map(|(_, e, id, pos)| (e, id, pos))
}

/// Build one ship's decision context from the world.
fn build_context(world: &World, entity: Entity, team: Team, incoming: bool) -> Option<Context> {
    let body = *world.get::<&Body>(entity).ok()?;
    let hull = *world.get::<&Hull>(entity).ok()?;
    let rig = *world.get::<&WeaponRig>(entity).ok()?;

    let kinematics = Kinematics {
        position: body.position,
        velocity: body.velocity,
        heading_deg: body.heading_deg,
        angular_rate_deg: body.angular_rate_deg,
        bank_deg: None,
    };
    let status = SelfStatus {
        health: hull.health_frac(),
        shield: hull.shield_frac(),
        weapon_heat: rig.heat,
        missile_ammo: rig.missile_ammo,
        missile_lock: rig.lock,
        incoming_missile: incoming,
    };

    let mut nearest: Option<(f32, Body, Hull, WeaponRig)> = None;
    let mut enemies_nearby = 0;
    let mut friends_nearby = 0;
    {
        let mut q = world.query::<(&Body, &Ship, &Hull, &WeaponRig)>();
        for (other, (b, s, h, r)) in q.iter() {
            if other == entity || !h.alive() {
                continue;
            }
            let d = (b.position - body.position).length();
            if s.team.opposes(team) {
                if d <= SENSE_RADIUS {
                    enemies_nearby += 1;
                }
                if nearest.map_or(true, |(nd, ..)| d < nd) {
                    nearest = Some((d, *b, *h, *r));
                }
            } else if d <= SENSE_RADIUS {
                friends_nearby += 1;
            }
        }
    }

    let ctx = match nearest {
        Some((_, enemy_body, enemy_hull, enemy_rig)) => {
            let contact = EnemyContact {
                kinematics: Kinematics {
                    position: enemy_body.position,
                    velocity: enemy_body.velocity,
                    heading_deg: enemy_body.heading_deg,
                    angular_rate_deg: enemy_body.angular_rate_deg,
                    bank_deg: None,
                },
                health: enemy_hull.health_frac(),
                shield: enemy_hull.shield_frac(),
                armed: enemy_rig.armed(),
            };
            let has_los = WorldSensors::new(world, entity, team)
                .segment_clear(body.position, enemy_body.position);
            Context::with_enemy(kinematics, status, contact, has_los, enemies_nearby, friends_nearby)
        }
        None => Context::without_enemy(kinematics, status, friends_nearby),
    };
    Some(ctx)
}

/// Integrate one ship's command: heading tracking with a turn-rate cap,
/// per-axis thrust mapping, then velocity/position integration.
fn apply_movement(world: &mut World, entity: Entity, cmd: &Command, dt: f32) {
    let Ok(mut body_ref) = world.get::<&mut Body>(entity) else {
        return;
    };
    let mut body = *body_ref;

    if cmd.rotate_to_target {
        let delta = heading_delta_deg(body.heading_deg, cmd.target_heading_deg);
        let step = SHIP_TURN_RATE_DEG * dt;
        let turn = delta.clamp(-step, step);
        body.heading_deg = (body.heading_deg + turn).rem_euclid(360.0);
        body.angular_rate_deg = turn / dt;
    } else if cmd.yaw_torque != 0.0 {
        let turn = cmd.yaw_torque.clamp(-1.0, 1.0) * SHIP_TURN_RATE_DEG * dt;
        body.heading_deg = (body.heading_deg + turn).rem_euclid(360.0);
        body.angular_rate_deg = turn / dt;
    } else {
        body.angular_rate_deg = 0.0;
    }

    let forward = vec_from_heading(body.heading_deg);
    let right = Vec2::new(forward.y, -forward.x);
    let thrust = cmd.thrust.clamp(-1.0, 1.0);
    let strafe = cmd.strafe.clamp(-1.0, 1.0);
    let forward_accel = if thrust >= 0.0 {
        SHIP_FORWARD_FORCE / SHIP_MASS
    } else {
        SHIP_REVERSE_FORCE / SHIP_MASS
    };
    let strafe_accel = SHIP_STRAFE_FORCE / SHIP_MASS;

    let accel = forward * (thrust * forward_accel) + right * (strafe * strafe_accel);
    // Avoidance is allowed to push past nominal max speed, but the hull
    // still has a hard ceiling.
    body.velocity = (body.velocity + accel * dt).clamp_length_max(NAV_MAX_SPEED * 1.25);
    body.position += body.velocity * dt;

    *body_ref = body;
}
