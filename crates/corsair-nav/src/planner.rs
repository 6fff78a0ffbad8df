//! Path planner — pure seek/arrive steering with predictive avoidance.
//!
//! Maps (current kinematics, goal, nearby obstacles, tuning) to a desired
//! velocity and acceleration. No clamping of the final acceleration
//! happens here; per-axis mapping is the pilot's job.

use glam::Vec2;

use corsair_core::geom::closest_point_on_segment;
use corsair_core::types::{Kinematics, SteeringTuning};

/// Weight floor for repulsion accumulation (squared meters).
const AVOID_EPSILON: f32 = 1e-3;

/// One obstacle sample for avoidance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

/// Input to one planning call.
pub struct PlanRequest<'a> {
    pub kinematics: Kinematics,
    pub goal_position: Vec2,
    pub goal_velocity: Vec2,
    /// Radius inside which approach speed ramps to zero (meters).
    pub arrival_radius: f32,
    /// Nominal speed cap for the seek component (m/s).
    pub max_speed: f32,
    /// Own clearance radius (meters).
    pub avoid_radius: f32,
    /// Motion projection horizon for avoidance (seconds).
    pub look_ahead_secs: f32,
    /// Extra clearance margin (meters).
    pub safe_margin: f32,
    pub obstacles: &'a [Obstacle],
    pub tuning: SteeringTuning,
    /// Fill the `debug` bundle of the result. Never affects control output.
    pub capture_debug: bool,
}

/// Diagnostic bundle; optional, control output is identical without it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanDebug {
    pub future_position: Vec2,
    pub seek_velocity: Vec2,
    pub avoid_velocity: Vec2,
    pub desired_accel: Vec2,
    /// Indices into the request's obstacle slice that contributed repulsion.
    pub contributing: Vec<usize>,
}

/// Output of one planning call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanResult {
    pub desired_velocity: Vec2,
    pub desired_accel: Vec2,
    pub debug: Option<PlanDebug>,
}

/// Compute the desired velocity and acceleration for this tick.
pub fn plan(req: &PlanRequest) -> PlanResult {
    let kin = req.kinematics;

    // -- Seek/arrive --
    let to_goal = req.goal_position - kin.position;
    let distance = to_goal.length();
    let dir = if distance > f32::EPSILON {
        to_goal / distance
    } else {
        Vec2::ZERO
    };

    // Fastest relative speed that max forward accel can still cancel
    // over the remaining distance.
    let brake_speed = (2.0 * req.tuning.forward_accel * distance).sqrt();
    let mut rel_speed = brake_speed.min(req.max_speed);
    if req.arrival_radius > f32::EPSILON && distance < req.arrival_radius {
        // Inside the arrival radius, ramp linearly to rest on the point.
        rel_speed *= distance / req.arrival_radius;
    }
    let seek_velocity =
        (req.goal_velocity + dir * rel_speed).clamp_length_max(req.max_speed.max(0.0));

    // -- Predictive avoidance --
    let future_position = kin.position + kin.velocity * req.look_ahead_secs;
    let mut repulsion = Vec2::ZERO;
    let mut total_weight = 0.0;
    let mut contributing = Vec::new();

    for (idx, obs) in req.obstacles.iter().enumerate() {
        let obs_future = obs.position + obs.velocity * req.look_ahead_secs;
        let near = closest_point_on_segment(kin.position, future_position, obs_future);
        let away = near - obs_future;
        let dist_sq = away.length_squared();
        let clear = req.avoid_radius + obs.radius + req.safe_margin;
        if dist_sq >= clear * clear {
            continue;
        }

        let weight = 1.0 / dist_sq.max(AVOID_EPSILON);
        let away_dir = if dist_sq > f32::EPSILON {
            away / dist_sq.sqrt()
        } else if dir.length_squared() > f32::EPSILON {
            // Obstacle dead-center on the path: push perpendicular to it.
            Vec2::new(-dir.y, dir.x)
        } else {
            Vec2::new(1.0, 0.0)
        };
        repulsion += away_dir * weight;
        total_weight += weight;
        if req.capture_debug {
            contributing.push(idx);
        }
    }

    let avoid_velocity = if total_weight > 0.0 {
        (repulsion / total_weight) * req.max_speed
    } else {
        Vec2::ZERO
    };

    // Un-clamped sum: avoidance is allowed to push past nominal max speed.
    let desired_velocity = seek_velocity + avoid_velocity;
    let desired_accel = desired_velocity - kin.velocity;

    let debug = req.capture_debug.then(|| PlanDebug {
        future_position,
        seek_velocity,
        avoid_velocity,
        desired_accel,
        contributing,
    });

    PlanResult {
        desired_velocity,
        desired_accel,
        debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corsair_core::constants::*;

    fn tuning() -> SteeringTuning {
        SteeringTuning {
            forward_accel: 80.0,
            reverse_accel: 40.0,
            strafe_accel: 50.0,
            dead_zone: 1.5,
        }
    }

    fn request<'a>(kin: Kinematics, goal: Vec2, obstacles: &'a [Obstacle]) -> PlanRequest<'a> {
        PlanRequest {
            kinematics: kin,
            goal_position: goal,
            goal_velocity: Vec2::ZERO,
            arrival_radius: NAV_ARRIVAL_RADIUS,
            max_speed: NAV_MAX_SPEED,
            avoid_radius: NAV_AVOID_RADIUS,
            look_ahead_secs: NAV_LOOK_AHEAD_SECS,
            safe_margin: NAV_SAFE_MARGIN,
            obstacles,
            tuning: tuning(),
            capture_debug: false,
        }
    }

    #[test]
    fn test_arrive_speed_monotonic_to_zero() {
        // Stationary goal, approach from inside the arrival radius:
        // desired speed must shrink monotonically and hit zero at d=0.
        let mut prev = f32::MAX;
        for i in (0..=10).rev() {
            let d = NAV_ARRIVAL_RADIUS * i as f32 / 10.0;
            let kin = Kinematics::new(Vec2::new(0.0, -d), Vec2::ZERO, 0.0);
            let out = plan(&request(kin, Vec2::ZERO, &[]));
            let speed = out.desired_velocity.length();
            assert!(
                speed <= prev + 1e-4,
                "speed increased approaching goal: {speed} > {prev} at d={d}"
            );
            prev = speed;
        }
        assert!(prev.abs() < 1e-4, "nonzero desired speed at the goal: {prev}");
    }

    #[test]
    fn test_seek_caps_at_max_speed() {
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let out = plan(&request(kin, Vec2::new(0.0, 10_000.0), &[]));
        assert!((out.desired_velocity.length() - NAV_MAX_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_goal_velocity_matched() {
        // Sitting on a moving goal: desired velocity is the goal's own.
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let mut req = request(kin, Vec2::ZERO, &[]);
        req.goal_velocity = Vec2::new(12.0, 0.0);
        let out = plan(&req);
        assert!((out.desired_velocity - Vec2::new(12.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_obstacle_on_path_repels() {
        // Flying north at speed; a rock sits on the projected path.
        let kin = Kinematics::new(Vec2::ZERO, Vec2::new(0.0, 100.0), 0.0);
        let rock = Obstacle {
            position: Vec2::new(0.0, 100.0),
            velocity: Vec2::ZERO,
            radius: 20.0,
        };
        let out = plan(&request(kin, Vec2::new(0.0, 1_000.0), &[rock]));
        let no_rock = plan(&request(kin, Vec2::new(0.0, 1_000.0), &[]));
        let avoid = out.desired_velocity - no_rock.desired_velocity;
        assert!(
            avoid.length() > 1.0,
            "on-path obstacle produced no repulsion"
        );
        // Repulsion points away from the rock, never toward it.
        assert!(avoid.dot(rock.position - kin.position) <= 0.0);
    }

    #[test]
    fn test_far_obstacle_ignored() {
        let kin = Kinematics::new(Vec2::ZERO, Vec2::new(0.0, 100.0), 0.0);
        let rock = Obstacle {
            position: Vec2::new(2_000.0, 0.0),
            velocity: Vec2::ZERO,
            radius: 20.0,
        };
        let with = plan(&request(kin, Vec2::new(0.0, 1_000.0), &[rock]));
        let without = plan(&request(kin, Vec2::new(0.0, 1_000.0), &[]));
        assert_eq!(with.desired_velocity, without.desired_velocity);
    }

    #[test]
    fn test_zero_to_goal_degenerate() {
        // Already on the goal with no obstacles: nothing to do.
        let kin = Kinematics::new(Vec2::new(7.0, 7.0), Vec2::ZERO, 0.0);
        let out = plan(&request(kin, Vec2::new(7.0, 7.0), &[]));
        assert!(out.desired_velocity.length() < 1e-5);
        assert!(out.desired_accel.length() < 1e-5);
    }

    #[test]
    fn test_debug_bundle_does_not_change_output() {
        let kin = Kinematics::new(Vec2::ZERO, Vec2::new(0.0, 80.0), 0.0);
        let rock = Obstacle {
            position: Vec2::new(5.0, 90.0),
            velocity: Vec2::ZERO,
            radius: 15.0,
        };
        let mut req = request(kin, Vec2::new(0.0, 500.0), std::slice::from_ref(&rock));
        let plain = plan(&req);
        req.capture_debug = true;
        let debugged = plan(&req);
        assert_eq!(plain.desired_velocity, debugged.desired_velocity);
        assert_eq!(plain.desired_accel, debugged.desired_accel);
        let dbg = debugged.debug.expect("debug bundle requested");
        assert_eq!(dbg.contributing, vec![0]);
    }
}
