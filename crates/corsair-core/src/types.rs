//! Fundamental kinematic and command types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-tick snapshot of a ship's motion state.
///
/// Headings are in degrees, 0 = +Y (north), increasing clockwise,
/// normalized to `[0, 360)`. Built once per tick by the environment
/// and never mutated; copied by value into every pure function call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    /// Plane position in meters.
    pub position: Vec2,
    /// Plane velocity in m/s.
    pub velocity: Vec2,
    /// Heading in degrees `[0, 360)`.
    pub heading_deg: f32,
    /// Angular rate in degrees per second (positive clockwise).
    pub angular_rate_deg: f32,
    /// Bank angle in degrees, when the hull model has one.
    pub bank_deg: Option<f32>,
}

impl Kinematics {
    pub fn new(position: Vec2, velocity: Vec2, heading_deg: f32) -> Self {
        Self {
            position,
            velocity,
            heading_deg: heading_deg.rem_euclid(360.0),
            angular_rate_deg: 0.0,
            bank_deg: None,
        }
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Unit vector along the current heading.
    pub fn forward(&self) -> Vec2 {
        vec_from_heading(self.heading_deg)
    }

    /// Unit vector 90° clockwise of the heading.
    pub fn right(&self) -> Vec2 {
        let f = self.forward();
        Vec2::new(f.y, -f.x)
    }

    /// Velocity component along the heading (m/s, negative when sliding backward).
    pub fn forward_speed(&self) -> f32 {
        self.velocity.dot(self.forward())
    }
}

/// Heading in degrees `[0, 360)` for a direction vector.
/// Zero-length input maps to 0 (north).
pub fn heading_from_vec(dir: Vec2) -> f32 {
    if dir.length_squared() < f32::EPSILON {
        return 0.0;
    }
    dir.x.atan2(dir.y).to_degrees().rem_euclid(360.0)
}

/// Unit vector for a heading in degrees (0 = +Y, clockwise).
pub fn vec_from_heading(heading_deg: f32) -> Vec2 {
    let rad = heading_deg.to_radians();
    Vec2::new(rad.sin(), rad.cos())
}

/// Signed smallest difference `b - a` in degrees, in `(-180, 180]`.
pub fn heading_delta_deg(a: f32, b: f32) -> f32 {
    let mut d = (b - a).rem_euclid(360.0);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f32,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f32 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Navigation goal: a point with the velocity it is moving at.
/// Owned exclusively by the Navigator; absent means "no goal".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Waypoint {
    pub fn fixed(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }

    pub fn moving(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }
}

/// Per-ship acceleration authority, derived from mass and engine
/// settings at initialization and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringTuning {
    /// Forward acceleration limit (m/s²).
    pub forward_accel: f32,
    /// Reverse (braking) acceleration limit (m/s²).
    pub reverse_accel: f32,
    /// Lateral acceleration limit (m/s²).
    pub strafe_accel: f32,
    /// Velocity-error magnitude below which steering goes quiet (m/s).
    pub dead_zone: f32,
}

impl SteeringTuning {
    /// Derive acceleration limits from engine forces (N) and hull mass (kg).
    pub fn from_engine(
        mass: f32,
        forward_force: f32,
        reverse_force: f32,
        strafe_force: f32,
        dead_zone: f32,
    ) -> Self {
        let m = mass.max(f32::EPSILON);
        Self {
            forward_accel: forward_force / m,
            reverse_accel: reverse_force / m,
            strafe_accel: strafe_force / m,
            dead_zone,
        }
    }
}

/// Actuation output for one tick: steering plus fire intents.
///
/// Consumed exactly once by the environment's movement/weapon actuation;
/// the core never reads a command back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Normalized forward thrust `[-1, 1]`.
    pub thrust: f32,
    /// Normalized strafe thrust `[-1, 1]` (positive = right).
    pub strafe: f32,
    /// Request afterburner from the hull, if fitted.
    pub boost: bool,
    /// When true the hull should rotate toward `target_heading_deg`.
    pub rotate_to_target: bool,
    /// Desired heading in degrees `[0, 360)`.
    pub target_heading_deg: f32,
    /// Raw yaw torque override, normalized `[-1, 1]`; used instead of
    /// heading tracking when `rotate_to_target` is false and nonzero.
    pub yaw_torque: f32,
    /// Discharge the primary weapon this tick.
    pub fire_primary: bool,
    /// Discharge the secondary weapon this tick.
    pub fire_secondary: bool,
}
