//! Targeting and weapons arbitration.
//!
//! Holds the current target, evaluates line-of-sight through a cached
//! probe, predicts intercept points for ballistic lead, and grants fire
//! permission across the primary (instant, heat-limited) and secondary
//! (lock-then-fire, cooldown-gated) weapons.

use glam::Vec2;

use corsair_core::constants::*;
use corsair_core::context::Context;
use corsair_core::curves::{desire, fear};
use corsair_core::enums::MissileLockState;
use corsair_core::sensors::VisibilityProbe;
use corsair_core::types::{heading_delta_deg, heading_from_vec, Kinematics};

/// Leading coefficient below which the intercept quadratic degenerates.
const QUADRATIC_EPSILON: f32 = 1e-4;

/// Gunner tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GunnerConfig {
    /// Maximum primary fire distance (meters).
    pub primary_range: f32,
    /// Primary off-boresight tolerance (degrees).
    pub primary_angle_deg: f32,
    /// Heat fraction at which primary fire is withheld.
    pub primary_heat_limit: f32,
    /// Range inside which an unlocked missile may be dumb-fired (meters).
    pub dumbfire_range: f32,
    /// Dumb-fire off-boresight tolerance (degrees).
    pub dumbfire_angle_deg: f32,
    /// Primary projectile speed for lead prediction (m/s).
    pub projectile_speed: f32,
    /// Ticks a cached LOS result stays fresh.
    pub los_cache_ticks: u64,
    /// Endpoint displacement that invalidates the LOS cache (meters).
    pub los_move_threshold: f32,
    /// Off-boresight angle beyond which no probe is attempted (degrees).
    pub los_angle_gate_deg: f32,
}

impl Default for GunnerConfig {
    fn default() -> Self {
        Self {
            primary_range: PRIMARY_FIRE_RANGE,
            primary_angle_deg: PRIMARY_FIRE_ANGLE_DEG,
            primary_heat_limit: PRIMARY_HEAT_LIMIT,
            dumbfire_range: MISSILE_DUMBFIRE_RANGE,
            dumbfire_angle_deg: MISSILE_DUMBFIRE_ANGLE_DEG,
            projectile_speed: PROJECTILE_SPEED,
            los_cache_ticks: LOS_CACHE_TICKS,
            los_move_threshold: LOS_MOVE_THRESHOLD,
            los_angle_gate_deg: LOS_ANGLE_GATE_DEG,
        }
    }
}

/// Tracked aim point: a position with the velocity it is moving at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetTrack {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Fire permissions for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FireDecision {
    pub primary: bool,
    pub secondary: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct LosCache {
    valid: bool,
    result: bool,
    tick: u64,
    from: Vec2,
    to: Vec2,
}

/// Per-ship targeting component.
pub struct Gunner {
    config: GunnerConfig,
    target: Option<TargetTrack>,
    cache: LosCache,
}

impl Gunner {
    pub fn new(config: GunnerConfig) -> Self {
        Self {
            config,
            target: None,
            cache: LosCache::default(),
        }
    }

    /// Track a moving target.
    pub fn set_target(&mut self, position: Vec2, velocity: Vec2) {
        self.target = Some(TargetTrack { position, velocity });
    }

    /// Track a fixed point.
    pub fn set_point_target(&mut self, position: Vec2) {
        self.set_target(position, Vec2::ZERO);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<TargetTrack> {
        self.target
    }

    /// Cached line-of-sight evaluation.
    ///
    /// The probe runs only when the cache is stale: older than the
    /// configured tick window, or either endpoint has moved past the
    /// displacement threshold. Targets far off boresight are reported
    /// not-visible without probing at all.
    pub fn line_of_sight(
        &mut self,
        from: Vec2,
        to: Vec2,
        off_boresight_deg: f32,
        tick: u64,
        probe: &dyn VisibilityProbe,
    ) -> bool {
        if off_boresight_deg > self.config.los_angle_gate_deg {
            return false;
        }

        let c = &self.cache;
        if c.valid
            && tick.saturating_sub(c.tick) < self.config.los_cache_ticks
            && (from - c.from).length() <= self.config.los_move_threshold
            && (to - c.to).length() <= self.config.los_move_threshold
        {
            return c.result;
        }

        let result = probe.segment_clear(from, to);
        self.cache = LosCache {
            valid: true,
            result,
            tick,
            from,
            to,
        };
        result
    }

    /// Predicted intercept point for the primary projectile.
    ///
    /// Shooter velocity is restricted to its forward-axis component so
    /// lateral drift does not bias the lead.
    pub fn intercept_point(&self, kin: &Kinematics, target_pos: Vec2, target_vel: Vec2) -> Vec2 {
        let shooter_vel = kin.forward() * kin.forward_speed();
        let t = solve_intercept_time(
            target_pos - kin.position,
            target_vel - shooter_vel,
            self.config.projectile_speed,
        );
        target_pos + target_vel * t
    }

    /// Fire permissions for this tick.
    ///
    /// With no target or no enemy in play, both flags are false before
    /// any distance or angle math runs.
    pub fn decide_fire(
        &mut self,
        ctx: &Context,
        tick: u64,
        probe: &dyn VisibilityProbe,
    ) -> FireDecision {
        let Some(target) = self.target else {
            return FireDecision::default();
        };
        if ctx.enemy.is_none() {
            return FireDecision::default();
        }

        let kin = ctx.kinematics;
        let to_target = target.position - kin.position;
        let distance = to_target.length();
        let off_deg =
            heading_delta_deg(kin.heading_deg, heading_from_vec(to_target)).abs();
        let los = self.line_of_sight(kin.position, target.position, off_deg, tick, probe);

        let mut secondary = false;
        let mut locked_pending = false;
        match ctx.missile_lock {
            MissileLockState::Locked => {
                if ctx.missile_ammo > 0 {
                    // A locked missile takes firing priority for the tick.
                    secondary = true;
                    locked_pending = true;
                }
            }
            MissileLockState::Idle | MissileLockState::Locking => {
                // Opportunistic dumb-fire: very close, tight angle only.
                secondary = ctx.missile_ammo > 0
                    && distance <= self.config.dumbfire_range
                    && off_deg <= self.config.dumbfire_angle_deg
                    && los;
            }
            MissileLockState::Cooldown => {}
        }

        let primary = !locked_pending
            && ctx.weapon_heat < self.config.primary_heat_limit
            && distance <= self.config.primary_range
            && off_deg <= self.config.primary_angle_deg
            && los;

        FireDecision { primary, secondary }
    }
}

/// Time-to-impact for a constant-speed projectile against a linearly
/// moving target, from the relative-motion quadratic
/// `(|v|² − s²)·t² + 2(p·v)·t + |p|² = 0`.
///
/// Degenerate leading coefficient falls back to the linear solution;
/// a negative discriminant or no strictly-positive root yields `t = 0`
/// (aim at the current position).
pub fn solve_intercept_time(rel_pos: Vec2, rel_vel: Vec2, projectile_speed: f32) -> f32 {
    let a = rel_vel.length_squared() - projectile_speed * projectile_speed;
    let b = 2.0 * rel_pos.dot(rel_vel);
    let c = rel_pos.length_squared();

    let t = if a.abs() < QUADRATIC_EPSILON {
        if b.abs() < QUADRATIC_EPSILON {
            0.0
        } else {
            -c / b
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            0.0
        } else {
            let root = disc.sqrt();
            let t1 = (-b - root) / (2.0 * a);
            let t2 = (-b + root) / (2.0 * a);
            // Smallest strictly-positive root, else no forward intercept.
            match (t1 > 0.0, t2 > 0.0) {
                (true, true) => t1.min(t2),
                (true, false) => t1,
                (false, true) => t2,
                (false, false) => 0.0,
            }
        }
    };

    t.max(0.0)
}

/// How appealing a straight fight looks right now. Shared by the
/// attack, orbit, and kite utilities.
pub fn attack_desirability(ctx: &Context) -> f32 {
    let Some(enemy) = ctx.enemy else {
        return 0.0;
    };

    let mut score = 0.0;
    // Healthy pools make a fight appealing.
    score += desire(ctx.health, 0.25);
    score += desire(ctx.shield, 0.15);
    // A weakened enemy invites the kill.
    score += fear(enemy.health, 0.2);
    score += fear(enemy.shield, 0.1);
    if !enemy.armed {
        score += 0.25;
    }
    if ctx.has_los {
        score += 0.1;
    }
    // Closer targets and cool guns score higher.
    score += fear(ctx.range_frac(), 0.15);
    score += fear(ctx.weapon_heat, 0.1);
    if ctx.outnumbered() {
        score -= 0.3;
    }
    score.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stationary_target_returns_current_position() {
        let gunner = Gunner::new(GunnerConfig::default());
        // Shooter moving fast; target parked. Lead must be the target itself.
        let kin = Kinematics::new(Vec2::ZERO, Vec2::new(0.0, 120.0), 0.0);
        let aim = gunner.intercept_point(&kin, Vec2::new(300.0, 40.0), Vec2::ZERO);
        assert!((aim - Vec2::new(300.0, 40.0)).length() < 1e-3);
    }

    #[test]
    fn test_crossing_target_leads_positive() {
        // Shooter at rest, target east at 100 m crossing north at 10 m/s,
        // projectile 50 m/s: lead lands north of the current position.
        let t = solve_intercept_time(
            Vec2::new(100.0, 0.0),
            Vec2::new(0.0, 10.0),
            50.0,
        );
        assert!(t > 0.0);
        let lead_y = 10.0 * t;
        assert!(lead_y > 0.0);
        // Sanity bound: flight time can't be wildly past the naive range/speed time.
        assert!(lead_y < 10.0 * 2.0 * (100.0 / 50.0), "lead_y={lead_y}");
    }

    #[test]
    fn test_unreachable_target_falls_back_to_zero() {
        // Crossing target faster than the round: negative discriminant.
        // Must return t=0, not NaN or panic.
        let t = solve_intercept_time(Vec2::new(100.0, 0.0), Vec2::new(0.0, 60.0), 50.0);
        assert_eq!(t, 0.0);

        // Receding target faster than the round: both roots negative.
        let t = solve_intercept_time(Vec2::new(1_000.0, 0.0), Vec2::new(500.0, 0.0), 50.0);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_degenerate_leading_coefficient_linear_fallback() {
        // Relative speed equal to projectile speed: a ~ 0, linear branch.
        let t = solve_intercept_time(
            Vec2::new(100.0, 0.0),
            Vec2::new(-50.0, 0.0),
            50.0,
        );
        assert!(t.is_finite());
        assert!(t >= 0.0);
        // Head-on closure at 50 m/s with a 50 m/s round halves the time: 1s.
        assert!((t - 1.0).abs() < 1e-2, "t={t}");
    }

    #[test]
    fn test_tail_chase_picks_positive_root() {
        // Target receding along the line of sight slower than the round:
        // one root is negative, the other is the 5s stern chase.
        let t = solve_intercept_time(
            Vec2::new(-100.0, 0.0),
            Vec2::new(-30.0, 0.0),
            50.0,
        );
        assert!((t - 5.0).abs() < 1e-3, "t={t}");
    }

    #[test]
    fn test_result_never_negative() {
        // Degenerate linear branch with the target opening the range:
        // -c/b goes negative and must clamp to zero.
        let t = solve_intercept_time(
            Vec2::new(100.0, 0.0),
            Vec2::new(50.0, 0.0),
            50.0,
        );
        assert_eq!(t, 0.0);
    }
}
