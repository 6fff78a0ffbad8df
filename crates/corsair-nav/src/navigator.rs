//! Stateful navigation orchestrator.
//!
//! Owns the current waypoint and facing override, senses obstacles along
//! a forward ray fan, runs planner then pilot, and applies first-order
//! smoothing to the thrust/strafe output. Behavior states drive it through
//! `set_navigation_point` / `set_facing_override`; the environment reads
//! the resulting fields out of the `Command`.

use glam::Vec2;

use corsair_core::constants::*;
use corsair_core::geom::segment_hits_circle;
use corsair_core::sensors::{BodyKind, SpatialQuery};
use corsair_core::types::{vec_from_heading, Command, Kinematics, SteeringTuning, Waypoint};

use crate::pilot::{steer, SteerRequest};
use crate::planner::{plan, Obstacle, PlanDebug, PlanRequest};

/// Navigator tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavConfig {
    pub arrival_radius: f32,
    pub max_speed: f32,
    pub avoid_radius: f32,
    pub look_ahead_secs: f32,
    pub safe_margin: f32,
    /// First-order smoothing gain (1/s); 0 disables smoothing.
    pub smoothing_gain: f32,
    /// Rays in the forward obstacle-scan fan.
    pub ray_count: u32,
    /// Total fan spread (degrees).
    pub ray_spread_deg: f32,
    /// Floor on the scan range (meters).
    pub min_scan_range: f32,
    /// Use the tilted-heading thrust geometry.
    pub tilted_heading: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            arrival_radius: NAV_ARRIVAL_RADIUS,
            max_speed: NAV_MAX_SPEED,
            avoid_radius: NAV_AVOID_RADIUS,
            look_ahead_secs: NAV_LOOK_AHEAD_SECS,
            safe_margin: NAV_SAFE_MARGIN,
            smoothing_gain: NAV_SMOOTHING_GAIN,
            ray_count: NAV_RAY_COUNT,
            ray_spread_deg: NAV_RAY_SPREAD_DEG,
            min_scan_range: NAV_MIN_SCAN_RANGE,
            tilted_heading: true,
        }
    }
}

/// Stateful navigator for one ship.
pub struct Navigator {
    config: NavConfig,
    tuning: SteeringTuning,
    waypoint: Option<Waypoint>,
    avoidance_enabled: bool,
    facing_override_deg: Option<f32>,
    smoothed_thrust: f32,
    smoothed_strafe: f32,
    /// Last planner debug bundle, when capture is enabled.
    last_debug: Option<PlanDebug>,
    capture_debug: bool,
}

impl Navigator {
    pub fn new(config: NavConfig, tuning: SteeringTuning) -> Self {
        Self {
            config,
            tuning,
            waypoint: None,
            avoidance_enabled: false,
            facing_override_deg: None,
            smoothed_thrust: 0.0,
            smoothed_strafe: 0.0,
            last_debug: None,
            capture_debug: false,
        }
    }

    /// Set the navigation goal. `avoid` enables predictive avoidance.
    pub fn set_navigation_point(&mut self, waypoint: Waypoint, avoid: bool) {
        self.waypoint = Some(waypoint);
        self.avoidance_enabled = avoid;
    }

    pub fn clear_navigation_point(&mut self) {
        self.waypoint = None;
        self.smoothed_thrust = 0.0;
        self.smoothed_strafe = 0.0;
    }

    /// Force the ship to face a specific heading, independent of the
    /// velocity-derived heading. Replaces the pilot's heading only —
    /// never the thrust/strafe values.
    pub fn set_facing_override(&mut self, heading_deg: f32) {
        self.facing_override_deg = Some(heading_deg.rem_euclid(360.0));
    }

    pub fn clear_facing_override(&mut self) {
        self.facing_override_deg = None;
    }

    pub fn waypoint(&self) -> Option<Waypoint> {
        self.waypoint
    }

    pub fn has_waypoint(&self) -> bool {
        self.waypoint.is_some()
    }

    /// Distance from `position` to the current waypoint; None without one.
    pub fn distance_to_waypoint(&self, position: Vec2) -> Option<f32> {
        self.waypoint.map(|w| (w.position - position).length())
    }

    /// Whether `position` is within the arrival radius of the waypoint.
    pub fn waypoint_reached(&self, position: Vec2) -> bool {
        self.distance_to_waypoint(position)
            .is_some_and(|d| d <= self.config.arrival_radius)
    }

    pub fn set_capture_debug(&mut self, capture: bool) {
        self.capture_debug = capture;
        if !capture {
            self.last_debug = None;
        }
    }

    pub fn last_debug(&self) -> Option<&PlanDebug> {
        self.last_debug.as_ref()
    }

    /// Run one navigation tick, writing steering into `cmd`.
    ///
    /// Without a valid waypoint the command stays neutral: zero thrust and
    /// strafe, heading held (unless a facing override is active).
    pub fn tick(&mut self, kin: &Kinematics, sensors: &dyn SpatialQuery, dt: f32, cmd: &mut Command) {
        let Some(wp) = self.waypoint else {
            cmd.thrust = 0.0;
            cmd.strafe = 0.0;
            if let Some(heading) = self.facing_override_deg {
                cmd.rotate_to_target = true;
                cmd.target_heading_deg = heading;
            } else {
                cmd.rotate_to_target = false;
            }
            return;
        };

        let obstacles = if self.avoidance_enabled {
            self.scan_obstacles(kin, sensors)
        } else {
            Vec::new()
        };

        let planned = plan(&PlanRequest {
            kinematics: *kin,
            goal_position: wp.position,
            goal_velocity: wp.velocity,
            arrival_radius: self.config.arrival_radius,
            max_speed: self.config.max_speed,
            avoid_radius: self.config.avoid_radius,
            look_ahead_secs: self.config.look_ahead_secs,
            safe_margin: self.config.safe_margin,
            obstacles: &obstacles,
            tuning: self.tuning,
            capture_debug: self.capture_debug,
        });
        if self.capture_debug {
            self.last_debug = planned.debug.clone();
        }

        let steered = steer(&SteerRequest {
            kinematics: *kin,
            desired_velocity: planned.desired_velocity,
            desired_accel: planned.desired_accel,
            fallback_facing: wp.position - kin.position,
            tuning: self.tuning,
            lock_rotation: false,
            tilted_heading: self.config.tilted_heading,
        });

        let gain = self.config.smoothing_gain;
        if gain <= 0.0 {
            self.smoothed_thrust = steered.thrust;
            self.smoothed_strafe = steered.strafe;
        } else {
            let alpha = (gain * dt).min(1.0);
            self.smoothed_thrust += (steered.thrust - self.smoothed_thrust) * alpha;
            self.smoothed_strafe += (steered.strafe - self.smoothed_strafe) * alpha;
        }

        cmd.thrust = self.smoothed_thrust;
        cmd.strafe = self.smoothed_strafe;
        cmd.rotate_to_target = true;
        cmd.target_heading_deg = self
            .facing_override_deg
            .unwrap_or(steered.heading_deg);
    }

    /// Obstacle scan: cast a fan of rays ahead of the ship out to braking
    /// distance and keep bodies any ray would clip. Bodies already inside
    /// the clearance radius are kept regardless of bearing.
    fn scan_obstacles(&self, kin: &Kinematics, sensors: &dyn SpatialQuery) -> Vec<Obstacle> {
        let speed = kin.speed();
        let braking = speed * speed / (2.0 * self.tuning.reverse_accel.max(f32::EPSILON));
        let scan_range = braking.max(self.config.min_scan_range);

        let bodies = sensors.bodies_within(
            BodyKind::Obstacle,
            kin.position,
            scan_range + self.config.avoid_radius + self.config.safe_margin,
        );
        if bodies.is_empty() {
            return Vec::new();
        }

        let rays = self.config.ray_count.max(1);
        let spread = self.config.ray_spread_deg;
        let mut kept = Vec::new();
        for body in bodies {
            let clearance = self.config.avoid_radius + body.radius + self.config.safe_margin;
            let point_blank =
                (body.position - kin.position).length_squared() <= clearance * clearance;
            let in_fan = (0..rays).any(|i| {
                let t = if rays == 1 {
                    0.5
                } else {
                    i as f32 / (rays - 1) as f32
                };
                let heading = kin.heading_deg - spread * 0.5 + spread * t;
                let tip = kin.position + vec_from_heading(heading) * scan_range;
                segment_hits_circle(kin.position, tip, body.position, clearance)
            });
            if point_blank || in_fan {
                kept.push(Obstacle {
                    position: body.position,
                    velocity: body.velocity,
                    radius: body.radius,
                });
            }
        }
        kept
    }

    /// Moving waypoint on a circle around `center` for orbit behaviors.
    ///
    /// Blends the ideal on-circle position, a tangential velocity lead,
    /// and a radial correction pulling back toward the target radius.
    pub fn compute_orbit_point(
        &self,
        center: Vec2,
        self_pos: Vec2,
        self_vel: Vec2,
        clockwise: bool,
        radius: f32,
        lead_secs: f32,
    ) -> Waypoint {
        let radial = self_pos - center;
        let current_radius = radial.length();
        let radial_dir = if current_radius > f32::EPSILON {
            radial / current_radius
        } else {
            // Sitting on the center: any radial works, pick north.
            Vec2::new(0.0, 1.0)
        };
        let tangent = if clockwise {
            Vec2::new(radial_dir.y, -radial_dir.x)
        } else {
            Vec2::new(-radial_dir.y, radial_dir.x)
        };

        // A stalled ship still needs a forward-moving target on the ring.
        let tangential_speed = self_vel.dot(tangent).abs().max(0.4 * self.config.max_speed);

        let on_circle = center + radial_dir * radius;
        let lead = tangent * tangential_speed * lead_secs;
        let correction = radial_dir * (radius - current_radius) * 0.5;

        Waypoint::moving(on_circle + lead + correction, tangent * tangential_speed)
    }
}
