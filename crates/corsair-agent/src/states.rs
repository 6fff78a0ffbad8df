//! Behavior states and their utility scoring.
//!
//! Six closed variants dispatched through `Behavior`. Each holds only
//! behavior-local working data; physics and weapon state live with the
//! environment. Utility functions are pure reads of the `Context` —
//! they must not mutate anything, and the machine relies on that.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use corsair_core::constants::*;
use corsair_core::context::Context;
use corsair_core::curves::{desire, fear};
use corsair_core::enums::StateKind;
use corsair_core::sensors::VisibilityProbe;
use corsair_core::types::{heading_from_vec, Command, Waypoint};
use corsair_nav::Navigator;

use crate::gunner::{attack_desirability, Gunner};

/// Mutable surfaces a behavior drives during its tick.
pub struct Actuators<'a> {
    pub navigator: &'a mut Navigator,
    pub gunner: &'a mut Gunner,
    pub command: &'a mut Command,
    pub probe: &'a dyn VisibilityProbe,
    /// Current simulation tick, for the gunner's LOS cache.
    pub tick: u64,
}

/// Aim at the enemy's predicted position and latch fire permissions.
/// Shared by the engaging behaviors (attack, orbit, kite).
fn aim_and_fire(ctx: &Context, act: &mut Actuators) -> Option<f32> {
    let enemy = ctx.enemy?;
    let ek = enemy.kinematics;
    act.gunner.set_target(ek.position, ek.velocity);
    let aim = act
        .gunner
        .intercept_point(&ctx.kinematics, ek.position, ek.velocity);
    let fire = act.gunner.decide_fire(ctx, act.tick, act.probe);
    act.command.fire_primary = fire.primary;
    act.command.fire_secondary = fire.secondary;
    Some(heading_from_vec(aim - ctx.kinematics.position))
}

// ---- Idle ----

/// Hold position and conserve everything.
#[derive(Debug, Default)]
pub struct IdleState;

impl IdleState {
    fn enter(&mut self, act: &mut Actuators) {
        act.navigator.clear_navigation_point();
        act.navigator.clear_facing_override();
        act.gunner.clear_target();
    }

    fn utility(ctx: &Context) -> f32 {
        let mut score = 0.05;
        if ctx.enemies_nearby == 0 {
            score += 0.1;
        }
        // Defensive freeze: both pools low at once.
        score += fear(ctx.health, 0.1) * fear(ctx.shield, 1.0);
        score
    }
}

// ---- Patrol ----

/// Wander between random points while out of combat.
#[derive(Debug, Default)]
pub struct PatrolState {
    target: Option<Vec2>,
}

impl PatrolState {
    fn pick_point(&mut self, ctx: &Context, act: &mut Actuators, rng: &mut ChaCha8Rng) {
        let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
        let range: f32 = rng.gen_range(0.3..1.0) * PATROL_RADIUS;
        let point =
            ctx.kinematics.position + Vec2::new(angle.sin(), angle.cos()) * range;
        self.target = Some(point);
        act.navigator.set_navigation_point(Waypoint::fixed(point), true);
    }

    fn enter(&mut self, ctx: &Context, act: &mut Actuators, rng: &mut ChaCha8Rng) {
        self.pick_point(ctx, act, rng);
    }

    fn tick(&mut self, ctx: &Context, act: &mut Actuators, rng: &mut ChaCha8Rng) {
        let reached = match self.target {
            Some(point) => (point - ctx.kinematics.position).length() <= NAV_ARRIVAL_RADIUS,
            None => true,
        };
        if reached || !act.navigator.has_waypoint() {
            self.pick_point(ctx, act, rng);
        }
    }

    fn exit(&mut self, act: &mut Actuators) {
        self.target = None;
        act.navigator.clear_navigation_point();
    }

    fn utility(ctx: &Context) -> f32 {
        // Binary gate, not a blend: patrol owns peacetime outright.
        if ctx.in_combat {
            0.0
        } else {
            0.95
        }
    }
}

// ---- Evade ----

/// Run directly away from the nearest threat.
#[derive(Debug, Default)]
pub struct EvadeState {
    /// Direction used when no enemy exists to flee from.
    fallback_dir: Option<Vec2>,
}

impl EvadeState {
    fn enter(&mut self, _ctx: &Context, rng: &mut ChaCha8Rng) {
        let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
        self.fallback_dir = Some(Vec2::new(angle.sin(), angle.cos()));
    }

    fn tick(&mut self, ctx: &Context, act: &mut Actuators) {
        let away = match ctx.enemy {
            Some(enemy) => {
                let v = ctx.kinematics.position - enemy.kinematics.position;
                if v.length_squared() > f32::EPSILON {
                    v.normalize()
                } else {
                    self.fallback_dir.unwrap_or(Vec2::new(0.0, 1.0))
                }
            }
            None => self.fallback_dir.unwrap_or(Vec2::new(0.0, 1.0)),
        };
        let flee_point = ctx.kinematics.position + away * FLEE_DISTANCE;
        act.navigator
            .set_navigation_point(Waypoint::fixed(flee_point), true);
        act.navigator.clear_facing_override();
        act.gunner.clear_target();
    }

    fn exit(&mut self, act: &mut Actuators) {
        self.fallback_dir = None;
        act.navigator.clear_navigation_point();
    }

    fn utility(ctx: &Context) -> f32 {
        if !ctx.in_combat && !ctx.incoming_missile {
            return 0.0;
        }
        // Baseline dread scales with how hurt we are.
        let mut score = fear(ctx.health, 0.45) + fear(ctx.shield, 0.25);
        if ctx.outnumbered() {
            score += 0.15;
        }
        if ctx.incoming_missile {
            score += 0.25;
        }
        // Fighting retreat: hull is gone but the shield still holds.
        score += fear(ctx.health, 0.2) * desire(ctx.shield, 1.0);
        // Fleeing nose-first into the enemy is not fleeing.
        score -= 0.15 * ctx.facing_frac();
        score.max(0.0)
    }
}

// ---- Attack ----

/// Close on the enemy and bring weapons to bear.
#[derive(Debug, Default)]
pub struct AttackState;

impl AttackState {
    fn tick(&mut self, ctx: &Context, act: &mut Actuators) {
        let Some(enemy) = ctx.enemy else {
            act.navigator.clear_navigation_point();
            act.navigator.clear_facing_override();
            act.gunner.clear_target();
            return;
        };
        let Some(aim_heading) = aim_and_fire(ctx, act) else {
            return;
        };

        // Hard-face the intercept only when the merge is imminent;
        // otherwise let the nose follow the velocity vector.
        if ctx.enemy_distance <= ATTACK_CLOSE_RANGE || ctx.closing_speed >= ATTACK_CLOSING_FAST {
            act.navigator.set_facing_override(aim_heading);
        } else {
            act.navigator.clear_facing_override();
        }

        let ek = enemy.kinematics;
        act.navigator
            .set_navigation_point(Waypoint::moving(ek.position, ek.velocity), true);
    }

    fn exit(&mut self, act: &mut Actuators) {
        act.navigator.clear_navigation_point();
        act.navigator.clear_facing_override();
        act.gunner.clear_target();
    }

    fn utility(ctx: &Context) -> f32 {
        let Some(enemy) = ctx.enemy else {
            return 0.0;
        };
        let mut score = attack_desirability(ctx);
        // Finish them: weakened pools invite the commit.
        score += fear(0.5 * (enemy.health + enemy.shield), 0.25);
        // Push in when loitering outside the orbit band.
        if ctx.enemy_distance > ORBIT_RADIUS + ORBIT_BAND {
            score += 0.1;
        }
        // Desperation: nothing left to protect.
        score += fear(ctx.health, 0.08);
        score.max(0.0)
    }
}

// ---- Orbit ----

/// Circle the enemy at the preferred radius band.
#[derive(Debug, Default)]
pub struct OrbitState {
    clockwise: bool,
}

impl OrbitState {
    fn enter(&mut self, ctx: &Context, rng: &mut ChaCha8Rng) {
        // Keep turning the way the engagement is already rotating:
        // sign of the planar cross of relative position and velocity.
        self.clockwise = match ctx.enemy {
            Some(enemy) => {
                let rel_vel = ctx.kinematics.velocity - enemy.kinematics.velocity;
                let cross = ctx.to_enemy.x * rel_vel.y - ctx.to_enemy.y * rel_vel.x;
                if cross.abs() < 1e-3 {
                    rng.gen_bool(0.5)
                } else {
                    cross > 0.0
                }
            }
            None => rng.gen_bool(0.5),
        };
    }

    fn tick(&mut self, ctx: &Context, act: &mut Actuators, rng: &mut ChaCha8Rng, dt: f32) {
        let Some(enemy) = ctx.enemy else {
            act.navigator.clear_navigation_point();
            act.navigator.clear_facing_override();
            act.gunner.clear_target();
            return;
        };

        // Occasional stochastic direction flip keeps the orbit unpredictable.
        if rng.gen_bool((dt / ORBIT_FLIP_MEAN_SECS).clamp(0.0, 1.0) as f64) {
            self.clockwise = !self.clockwise;
        }

        if let Some(aim_heading) = aim_and_fire(ctx, act) {
            // Strafing past the target: always face it.
            act.navigator.set_facing_override(aim_heading);
        }

        let wp = act.navigator.compute_orbit_point(
            enemy.kinematics.position,
            ctx.kinematics.position,
            ctx.kinematics.velocity,
            self.clockwise,
            ORBIT_RADIUS,
            ORBIT_LEAD_SECS,
        );
        act.navigator.set_navigation_point(wp, true);
    }

    fn exit(&mut self, act: &mut Actuators) {
        act.navigator.clear_navigation_point();
        act.navigator.clear_facing_override();
        act.gunner.clear_target();
    }

    fn utility(ctx: &Context) -> f32 {
        if ctx.enemy.is_none() {
            return 0.0;
        }
        let mut score = attack_desirability(ctx);
        // Strong pull while inside the good band.
        if (ctx.enemy_distance - ORBIT_RADIUS).abs() <= ORBIT_BAND {
            score += 0.25;
        }
        // No line of sight rewards circling into a flank.
        if !ctx.has_los {
            score += 0.15;
        }
        // Critically hurt ships should pick a committal answer instead.
        score -= fear(ctx.health, 0.2);
        score.max(0.0)
    }
}

// ---- Kite ----

/// Retreat while keeping weapons on the enemy.
#[derive(Debug, Default)]
pub struct KiteState;

impl KiteState {
    fn tick(&mut self, ctx: &Context, act: &mut Actuators) {
        let Some(enemy) = ctx.enemy else {
            act.navigator.clear_navigation_point();
            act.navigator.clear_facing_override();
            act.gunner.clear_target();
            return;
        };

        let pos = ctx.kinematics.position;
        let away_dir = {
            let v = pos - enemy.kinematics.position;
            if v.length_squared() > f32::EPSILON {
                v.normalize()
            } else {
                Vec2::new(0.0, 1.0)
            }
        };
        // Retreat along the blend of "away from the enemy" and
        // "opposite the enemy's velocity" so the leg cuts across its nose.
        let enemy_flow = enemy.kinematics.velocity.normalize_or_zero();
        let mut dir = (away_dir - enemy_flow).normalize_or(away_dir);

        if ctx.enemy_distance < KITE_MIN_RANGE {
            // Too close: double the outward weight.
            dir = (dir + away_dir).normalize_or(away_dir);
        } else if ctx.enemy_distance > KITE_MAX_RANGE {
            // Too far to stay engaged: ease the leg back toward the enemy.
            dir = (dir - away_dir * 1.5).normalize_or(-away_dir);
        }

        act.navigator
            .set_navigation_point(Waypoint::fixed(pos + dir * KITE_STEP), true);

        if let Some(aim_heading) = aim_and_fire(ctx, act) {
            act.navigator.set_facing_override(aim_heading);
        }
    }

    fn exit(&mut self, act: &mut Actuators) {
        act.navigator.clear_navigation_point();
        act.navigator.clear_facing_override();
        act.gunner.clear_target();
    }

    fn utility(ctx: &Context) -> f32 {
        if ctx.enemy.is_none() {
            return 0.0;
        }
        let mut score = 0.5 * (attack_desirability(ctx) + EvadeState::utility(ctx));
        if ctx.enemy_distance < KITE_MIN_RANGE {
            score += 0.2;
        }
        // Cool guns on a hurting ship: shoot while backing off.
        score += fear(ctx.weapon_heat, 0.1) * fear(ctx.health, 1.0);
        // Shield tank posture.
        score += fear(ctx.health, 0.15) * desire(ctx.shield, 1.0);
        // Kiting means guns stay on target.
        score -= 0.1 * (1.0 - ctx.facing_frac());
        score.max(0.0)
    }
}

// ---- Dispatch ----

/// Closed set of behaviors, dispatched by tag.
pub enum Behavior {
    Idle(IdleState),
    Patrol(PatrolState),
    Evade(EvadeState),
    Attack(AttackState),
    Orbit(OrbitState),
    Kite(KiteState),
}

impl Behavior {
    /// All behaviors in declaration (tie-break) order.
    pub fn roster() -> [Behavior; 6] {
        [
            Behavior::Idle(IdleState),
            Behavior::Patrol(PatrolState::default()),
            Behavior::Evade(EvadeState::default()),
            Behavior::Attack(AttackState),
            Behavior::Orbit(OrbitState::default()),
            Behavior::Kite(KiteState),
        ]
    }

    pub fn kind(&self) -> StateKind {
        match self {
            Behavior::Idle(_) => StateKind::Idle,
            Behavior::Patrol(_) => StateKind::Patrol,
            Behavior::Evade(_) => StateKind::Evade,
            Behavior::Attack(_) => StateKind::Attack,
            Behavior::Orbit(_) => StateKind::Orbit,
            Behavior::Kite(_) => StateKind::Kite,
        }
    }

    /// Pure scoring: reads the context, touches nothing.
    pub fn compute_utility(&self, ctx: &Context) -> f32 {
        match self {
            Behavior::Idle(_) => IdleState::utility(ctx),
            Behavior::Patrol(_) => PatrolState::utility(ctx),
            Behavior::Evade(_) => EvadeState::utility(ctx),
            Behavior::Attack(_) => AttackState::utility(ctx),
            Behavior::Orbit(_) => OrbitState::utility(ctx),
            Behavior::Kite(_) => KiteState::utility(ctx),
        }
    }

    pub fn enter(&mut self, ctx: &Context, act: &mut Actuators, rng: &mut ChaCha8Rng) {
        match self {
            Behavior::Idle(s) => s.enter(act),
            Behavior::Patrol(s) => s.enter(ctx, act, rng),
            Behavior::Evade(s) => s.enter(ctx, rng),
            Behavior::Attack(_) | Behavior::Kite(_) => {}
            Behavior::Orbit(s) => s.enter(ctx, rng),
        }
    }

    pub fn exit(&mut self, act: &mut Actuators) {
        match self {
            Behavior::Idle(_) => {}
            Behavior::Patrol(s) => s.exit(act),
            Behavior::Evade(s) => s.exit(act),
            Behavior::Attack(s) => s.exit(act),
            Behavior::Orbit(s) => s.exit(act),
            Behavior::Kite(s) => s.exit(act),
        }
    }

    pub fn tick(&mut self, ctx: &Context, act: &mut Actuators, rng: &mut ChaCha8Rng, dt: f32) {
        match self {
            Behavior::Idle(_) => {}
            Behavior::Patrol(s) => s.tick(ctx, act, rng),
            Behavior::Evade(s) => s.tick(ctx, act),
            Behavior::Attack(s) => s.tick(ctx, act),
            Behavior::Orbit(s) => s.tick(ctx, act, rng, dt),
            Behavior::Kite(s) => s.tick(ctx, act),
        }
    }
}
