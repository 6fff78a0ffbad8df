#[cfg(test)]
mod tests {
    use glam::Vec2;

    use corsair_core::constants::DT;
    use corsair_core::sensors::{BodyKind, SensedBody, SpatialQuery};
    use corsair_core::types::{Command, Kinematics, SteeringTuning, Waypoint};

    use crate::navigator::{NavConfig, Navigator};

    /// Environment stub with a fixed obstacle field.
    struct StubSensors {
        obstacles: Vec<SensedBody>,
    }

    impl StubSensors {
        fn empty() -> Self {
            Self {
                obstacles: Vec::new(),
            }
        }
    }

    impl SpatialQuery for StubSensors {
        fn bodies_within(&self, kind: BodyKind, center: Vec2, radius: f32) -> Vec<SensedBody> {
            if kind != BodyKind::Obstacle {
                return Vec::new();
            }
            self.obstacles
                .iter()
                .copied()
                .filter(|b| (b.position - center).length() <= radius)
                .collect()
        }
    }

    fn tuning() -> SteeringTuning {
        SteeringTuning {
            forward_accel: 80.0,
            reverse_accel: 40.0,
            strafe_accel: 50.0,
            dead_zone: 1.5,
        }
    }

    fn navigator() -> Navigator {
        Navigator::new(NavConfig::default(), tuning())
    }

    #[test]
    fn test_no_waypoint_neutral_command() {
        let mut nav = navigator();
        let kin = Kinematics::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 90.0);
        let mut cmd = Command::default();
        nav.tick(&kin, &StubSensors::empty(), DT, &mut cmd);
        assert_eq!(cmd.thrust, 0.0);
        assert_eq!(cmd.strafe, 0.0);
        assert!(!cmd.rotate_to_target, "heading held, no rotation request");
    }

    #[test]
    fn test_waypoint_drives_thrust() {
        let mut nav = navigator();
        nav.set_navigation_point(Waypoint::fixed(Vec2::new(0.0, 500.0)), false);
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let mut cmd = Command::default();
        // A few ticks for smoothing to build up.
        for _ in 0..30 {
            nav.tick(&kin, &StubSensors::empty(), DT, &mut cmd);
        }
        assert!(cmd.thrust > 0.5, "expected forward thrust, got {}", cmd.thrust);
        assert!(cmd.rotate_to_target);
        assert!(
            cmd.target_heading_deg < 1.0 || cmd.target_heading_deg > 359.0,
            "should face the waypoint due north, got {}",
            cmd.target_heading_deg
        );
    }

    #[test]
    fn test_smoothing_is_gradual_and_converges() {
        let mut nav = navigator();
        nav.set_navigation_point(Waypoint::fixed(Vec2::new(0.0, 5_000.0)), false);
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let mut cmd = Command::default();
        nav.tick(&kin, &StubSensors::empty(), DT, &mut cmd);
        let first = cmd.thrust;
        assert!(first > 0.0 && first < 1.0, "first tick is partial: {first}");
        for _ in 0..60 {
            nav.tick(&kin, &StubSensors::empty(), DT, &mut cmd);
        }
        assert!(cmd.thrust > 0.95, "smoothed thrust converges: {}", cmd.thrust);
    }

    #[test]
    fn test_zero_gain_disables_smoothing() {
        let mut nav = Navigator::new(
            NavConfig {
                smoothing_gain: 0.0,
                ..NavConfig::default()
            },
            tuning(),
        );
        nav.set_navigation_point(Waypoint::fixed(Vec2::new(0.0, 5_000.0)), false);
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let mut cmd = Command::default();
        nav.tick(&kin, &StubSensors::empty(), DT, &mut cmd);
        assert_eq!(cmd.thrust, 1.0, "raw command passes straight through");
    }

    #[test]
    fn test_facing_override_replaces_heading_only() {
        let mut nav = navigator();
        nav.set_navigation_point(Waypoint::fixed(Vec2::new(0.0, 500.0)), false);
        nav.set_facing_override(135.0);
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let mut cmd = Command::default();
        for _ in 0..10 {
            nav.tick(&kin, &StubSensors::empty(), DT, &mut cmd);
        }
        assert_eq!(cmd.target_heading_deg, 135.0);
        assert!(cmd.thrust > 0.0, "thrust unaffected by facing override");

        nav.clear_facing_override();
        nav.tick(&kin, &StubSensors::empty(), DT, &mut cmd);
        assert!(
            cmd.target_heading_deg < 1.0 || cmd.target_heading_deg > 359.0,
            "override cleared, back to velocity heading"
        );
    }

    #[test]
    fn test_clear_navigation_point_resets() {
        let mut nav = navigator();
        nav.set_navigation_point(Waypoint::fixed(Vec2::new(0.0, 500.0)), false);
        let kin = Kinematics::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        let mut cmd = Command::default();
        for _ in 0..10 {
            nav.tick(&kin, &StubSensors::empty(), DT, &mut cmd);
        }
        nav.clear_navigation_point();
        nav.tick(&kin, &StubSensors::empty(), DT, &mut cmd);
        assert_eq!(cmd.thrust, 0.0);
        assert!(!nav.has_waypoint());
    }

    #[test]
    fn test_obstacle_ahead_bends_course() {
        let mut nav = navigator();
        nav.set_navigation_point(Waypoint::fixed(Vec2::new(0.0, 2_000.0)), true);
        let kin = Kinematics::new(Vec2::ZERO, Vec2::new(0.0, 120.0), 0.0);
        let sensors = StubSensors {
            obstacles: vec![SensedBody {
                position: Vec2::new(4.0, 150.0),
                velocity: Vec2::ZERO,
                radius: 25.0,
            }],
        };
        let mut cmd = Command::default();
        for _ in 0..30 {
            nav.tick(&kin, &sensors, DT, &mut cmd);
        }
        assert!(
            cmd.strafe.abs() > 0.05,
            "rock dead ahead should produce lateral correction, strafe={}",
            cmd.strafe
        );
    }

    #[test]
    fn test_avoidance_disabled_ignores_obstacles() {
        let mut nav = navigator();
        nav.set_navigation_point(Waypoint::fixed(Vec2::new(0.0, 2_000.0)), false);
        let kin = Kinematics::new(Vec2::ZERO, Vec2::new(0.0, 120.0), 0.0);
        let sensors = StubSensors {
            obstacles: vec![SensedBody {
                position: Vec2::new(0.0, 150.0),
                velocity: Vec2::ZERO,
                radius: 25.0,
            }],
        };
        let mut cmd = Command::default();
        for _ in 0..30 {
            nav.tick(&kin, &sensors, DT, &mut cmd);
        }
        assert!(
            cmd.strafe.abs() < 1e-3,
            "avoidance off: no lateral correction, strafe={}",
            cmd.strafe
        );
    }

    #[test]
    fn test_orbit_point_leads_along_tangent() {
        let nav = navigator();
        let center = Vec2::ZERO;
        // Ship due north of center, orbiting clockwise: lead is east.
        let wp = nav.compute_orbit_point(
            center,
            Vec2::new(0.0, 300.0),
            Vec2::new(50.0, 0.0),
            true,
            300.0,
            1.0,
        );
        assert!(wp.position.x > 0.0, "clockwise lead points east");
        assert!(wp.velocity.x > 0.0, "waypoint velocity along tangent");

        let ccw = nav.compute_orbit_point(
            center,
            Vec2::new(0.0, 300.0),
            Vec2::new(-50.0, 0.0),
            false,
            300.0,
            1.0,
        );
        assert!(ccw.position.x < 0.0, "counter-clockwise lead points west");
    }

    #[test]
    fn test_orbit_point_corrects_radius() {
        let nav = navigator();
        let center = Vec2::ZERO;
        // Too close: waypoint pushed outward past our radius.
        let near = nav.compute_orbit_point(
            center,
            Vec2::new(0.0, 100.0),
            Vec2::ZERO,
            true,
            300.0,
            0.0,
        );
        assert!(near.position.y > 300.0, "pushed out, got {}", near.position.y);
        // Too far: waypoint pulled inside the ring.
        let far = nav.compute_orbit_point(
            center,
            Vec2::new(0.0, 600.0),
            Vec2::ZERO,
            true,
            300.0,
            0.0,
        );
        assert!(far.position.y < 300.0, "pulled in, got {}", far.position.y);
    }

    #[test]
    fn test_orbit_point_degenerate_center() {
        let nav = navigator();
        let wp = nav.compute_orbit_point(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, true, 300.0, 0.5);
        assert!(
            wp.position.length() > 1.0,
            "sitting on the center still yields an off-center waypoint"
        );
    }
}
