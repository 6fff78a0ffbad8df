//! Steering command mapper — desired acceleration to thrust/strafe/heading.
//!
//! Forward and reverse authority are separate limits; the mapping divides
//! by whichever one applies.

use glam::Vec2;

use corsair_core::constants::PILOT_TILT_MIN_STRAFE;
use corsair_core::types::{heading_from_vec, Kinematics, SteeringTuning};

/// Input to one steering-map call.
pub struct SteerRequest {
    pub kinematics: Kinematics,
    pub desired_velocity: Vec2,
    pub desired_accel: Vec2,
    /// Direction to face when the desired velocity is degenerate
    /// (typically the direction to the goal).
    pub fallback_facing: Vec2,
    pub tuning: SteeringTuning,
    /// Hold the current heading instead of computing one.
    pub lock_rotation: bool,
    /// Offset the nose to exploit combined forward+strafe thrust.
    pub tilted_heading: bool,
}

/// Output of one steering-map call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteerResult {
    /// Normalized forward thrust `[-1, 1]`.
    pub thrust: f32,
    /// Normalized strafe `[-1, 1]`, positive right.
    pub strafe: f32,
    /// Target heading in degrees `[0, 360)`.
    pub heading_deg: f32,
}

/// Map a desired acceleration onto actuator commands and a heading.
pub fn steer(req: &SteerRequest) -> SteerResult {
    let kin = req.kinematics;
    let forward = kin.forward();
    let right = kin.right();

    let a_forward = req.desired_accel.dot(forward);
    let a_right = req.desired_accel.dot(right);

    let (thrust, strafe) = if req.desired_accel.length() < req.tuning.dead_zone {
        // Quiet zone: suppress actuator jitter at rest.
        (0.0, 0.0)
    } else {
        let axis = if a_forward >= 0.0 {
            req.tuning.forward_accel
        } else {
            req.tuning.reverse_accel
        };
        let thrust = (a_forward / axis.max(f32::EPSILON)).clamp(-1.0, 1.0);
        let strafe = (a_right / req.tuning.strafe_accel.max(f32::EPSILON)).clamp(-1.0, 1.0);
        (thrust, strafe)
    };

    let heading_deg = if req.lock_rotation {
        kin.heading_deg
    } else {
        let facing = if req.desired_velocity.length_squared() > f32::EPSILON {
            req.desired_velocity
        } else if req.fallback_facing.length_squared() > f32::EPSILON {
            req.fallback_facing
        } else {
            forward
        };
        let base = heading_from_vec(facing);
        if req.tilted_heading && strafe.abs() >= PILOT_TILT_MIN_STRAFE {
            // Offset the nose opposite the strafe so the combined
            // forward+strafe thrust vector lines up with the desired
            // direction. Full tilt is the engine-geometry boost angle.
            let full_tilt = req
                .tuning
                .strafe_accel
                .atan2(req.tuning.forward_accel)
                .to_degrees();
            (base - full_tilt * strafe).rem_euclid(360.0)
        } else {
            base
        }
    };

    SteerResult {
        thrust,
        strafe,
        heading_deg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> SteeringTuning {
        SteeringTuning {
            forward_accel: 80.0,
            reverse_accel: 40.0,
            strafe_accel: 50.0,
            dead_zone: 1.5,
        }
    }

    fn request(kin: Kinematics, accel: Vec2) -> SteerRequest {
        SteerRequest {
            kinematics: kin,
            desired_velocity: accel,
            desired_accel: accel,
            fallback_facing: Vec2::ZERO,
            tuning: tuning(),
            lock_rotation: false,
            tilted_heading: false,
        }
    }

    #[test]
    fn test_dead_zone_exact_zero() {
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let out = steer(&request(kin, Vec2::new(0.4, 0.9)));
        assert_eq!(out.thrust, 0.0);
        assert_eq!(out.strafe, 0.0);
    }

    #[test]
    fn test_forward_limit_clamps_to_one() {
        // Facing north, accel due north at exactly the forward limit.
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let out = steer(&request(kin, Vec2::new(0.0, 80.0)));
        assert_eq!(out.thrust, 1.0);
        assert_eq!(out.strafe, 0.0);
    }

    #[test]
    fn test_reverse_uses_reverse_limit() {
        // Braking at the reverse limit maps to thrust -1, not -0.5.
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let out = steer(&request(kin, Vec2::new(0.0, -40.0)));
        assert_eq!(out.thrust, -1.0);
    }

    #[test]
    fn test_strafe_projection() {
        // Facing north, accel due east at half the strafe limit.
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let out = steer(&request(kin, Vec2::new(25.0, 0.0)));
        assert!((out.strafe - 0.5).abs() < 1e-5);
        assert!(out.thrust.abs() < 1e-5);
    }

    #[test]
    fn test_lock_rotation_holds_heading() {
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 123.0);
        let mut req = request(kin, Vec2::new(0.0, 50.0));
        req.lock_rotation = true;
        assert_eq!(steer(&req).heading_deg, 123.0);
    }

    #[test]
    fn test_heading_faces_desired_velocity() {
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let mut req = request(kin, Vec2::new(10.0, 0.0));
        req.desired_velocity = Vec2::new(10.0, 0.0);
        let out = steer(&req);
        assert!((out.heading_deg - 90.0).abs() < 1e-3, "east is 90 degrees");
    }

    #[test]
    fn test_degenerate_velocity_falls_back_to_goal_direction() {
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 45.0);
        let mut req = request(kin, Vec2::new(0.0, 30.0));
        req.desired_velocity = Vec2::ZERO;
        req.fallback_facing = Vec2::new(-1.0, 0.0);
        let out = steer(&req);
        assert!((out.heading_deg - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_tilted_heading_offsets_against_strafe() {
        // Facing north, pushing east: with tilt enabled the nose ends up
        // west of the desired-velocity heading, by the geometry angle
        // scaled by the strafe command.
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let mut req = request(kin, Vec2::new(50.0, 10.0));
        req.tilted_heading = true;
        let base = heading_from_vec(req.desired_velocity);
        let out = steer(&req);
        assert!(out.strafe > PILOT_TILT_MIN_STRAFE);
        let expected_tilt = 50.0_f32.atan2(80.0).to_degrees() * out.strafe;
        let got = (base - out.heading_deg).rem_euclid(360.0);
        assert!(
            (got - expected_tilt).abs() < 1e-2,
            "tilt was {got}, expected {expected_tilt}"
        );
    }

    #[test]
    fn test_tiny_strafe_disables_tilt() {
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        // Accel almost dead ahead: strafe below the tilt threshold.
        let mut req = request(kin, Vec2::new(0.5, 70.0));
        req.tilted_heading = true;
        let out = steer(&req);
        assert!(out.strafe.abs() < PILOT_TILT_MIN_STRAFE);
        assert!((out.heading_deg - heading_from_vec(req.desired_velocity)).abs() < 1e-3);
    }
}
