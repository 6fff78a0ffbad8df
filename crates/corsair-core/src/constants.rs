//! Tuning parameters and simulation constants.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Sensing ---

/// Radius within which nearby ships are counted for the context (meters).
pub const SENSE_RADIUS: f32 = 1_200.0;

/// Distance normalization reference for utility scoring (meters).
/// `Context::range_frac` is the enemy distance over this range, clamped.
pub const ENGAGEMENT_RANGE: f32 = 900.0;

// --- Navigator ---

/// Waypoint arrival radius (meters).
pub const NAV_ARRIVAL_RADIUS: f32 = 30.0;

/// Nominal speed cap for planned velocities (m/s). Avoidance may exceed it.
pub const NAV_MAX_SPEED: f32 = 160.0;

/// Clearance radius kept around own hull during avoidance (meters).
pub const NAV_AVOID_RADIUS: f32 = 40.0;

/// How far ahead the planner projects motion for avoidance (seconds).
pub const NAV_LOOK_AHEAD_SECS: f32 = 1.5;

/// Extra clearance margin added to combined avoidance radii (meters).
pub const NAV_SAFE_MARGIN: f32 = 15.0;

/// First-order smoothing gain for thrust/strafe commands (1/s). 0 disables.
pub const NAV_SMOOTHING_GAIN: f32 = 8.0;

/// Number of rays in the forward obstacle-scan fan.
pub const NAV_RAY_COUNT: u32 = 5;

/// Total angular spread of the obstacle-scan fan (degrees).
pub const NAV_RAY_SPREAD_DEG: f32 = 90.0;

/// Minimum obstacle-scan range regardless of braking distance (meters).
pub const NAV_MIN_SCAN_RANGE: f32 = 120.0;

// --- Pilot ---

/// Strafe-command magnitude below which tilted heading is not engaged.
pub const PILOT_TILT_MIN_STRAFE: f32 = 0.05;

// --- Gunner: primary weapon ---

/// Maximum primary-weapon fire distance (meters).
pub const PRIMARY_FIRE_RANGE: f32 = 600.0;

/// Off-boresight tolerance for primary fire (degrees).
pub const PRIMARY_FIRE_ANGLE_DEG: f32 = 6.0;

/// Heat fraction above which the gunner withholds primary fire.
pub const PRIMARY_HEAT_LIMIT: f32 = 0.9;

/// Primary projectile muzzle speed (m/s), for lead prediction.
pub const PROJECTILE_SPEED: f32 = 450.0;

// --- Gunner: secondary weapon ---

/// Range inside which an unlocked missile may be dumb-fired (meters).
pub const MISSILE_DUMBFIRE_RANGE: f32 = 250.0;

/// Off-boresight tolerance for a dumb-fired missile (degrees).
pub const MISSILE_DUMBFIRE_ANGLE_DEG: f32 = 3.0;

// --- Gunner: line-of-sight cache ---

/// Ticks a cached LOS result stays valid.
pub const LOS_CACHE_TICKS: u64 = 6;

/// Shooter/target displacement that invalidates the LOS cache (meters).
pub const LOS_MOVE_THRESHOLD: f32 = 8.0;

/// Off-boresight angle beyond which no LOS probe is attempted (degrees).
pub const LOS_ANGLE_GATE_DEG: f32 = 60.0;

// --- State machine ---

/// Minimum dwell time in a state before another switch (seconds).
pub const MIN_TIME_IN_STATE_SECS: f32 = 1.5;

// --- Behaviors ---

/// Radius around self within which patrol points are picked (meters).
pub const PATROL_RADIUS: f32 = 700.0;

/// Distance of the evade flee point from self (meters).
pub const FLEE_DISTANCE: f32 = 500.0;

/// Preferred orbit radius around the enemy (meters).
pub const ORBIT_RADIUS: f32 = 320.0;

/// Half-width of the "good orbit" radius band (meters).
pub const ORBIT_BAND: f32 = 120.0;

/// Seconds the orbit waypoint leads along the tangent.
pub const ORBIT_LEAD_SECS: f32 = 0.8;

/// Mean seconds between stochastic orbit-direction flips.
pub const ORBIT_FLIP_MEAN_SECS: f32 = 6.0;

/// Enemy distance that forces the attack facing override (meters).
pub const ATTACK_CLOSE_RANGE: f32 = 220.0;

/// Closing speed that forces the attack facing override (m/s).
pub const ATTACK_CLOSING_FAST: f32 = 80.0;

/// Kite pushes away harder inside this enemy distance (meters).
pub const KITE_MIN_RANGE: f32 = 260.0;

/// Kite eases back toward the enemy outside this distance (meters).
pub const KITE_MAX_RANGE: f32 = 650.0;

/// Length of one kite retreat leg (meters).
pub const KITE_STEP: f32 = 320.0;

// --- Reference arena ---

/// Default hull mass (kg).
pub const SHIP_MASS: f32 = 12_000.0;

/// Default forward engine force (N).
pub const SHIP_FORWARD_FORCE: f32 = 960_000.0;

/// Default reverse engine force (N).
pub const SHIP_REVERSE_FORCE: f32 = 480_000.0;

/// Default strafe engine force (N).
pub const SHIP_STRAFE_FORCE: f32 = 600_000.0;

/// Default steering dead zone (m/s).
pub const SHIP_DEAD_ZONE: f32 = 1.5;

/// Maximum hull turn rate (degrees/sec).
pub const SHIP_TURN_RATE_DEG: f32 = 180.0;

/// Primary shot damage per hit.
pub const PRIMARY_DAMAGE: f32 = 4.0;

/// Heat fraction added per primary shot.
pub const PRIMARY_HEAT_PER_SHOT: f32 = 0.08;

/// Heat fraction dissipated per second.
pub const HEAT_DISSIPATION_PER_SEC: f32 = 0.25;

/// Seconds of continuous aim needed to progress Locking -> Locked.
pub const MISSILE_LOCK_SECS: f32 = 1.2;

/// Range inside which the seeker will start locking (meters).
pub const MISSILE_LOCK_RANGE: f32 = 700.0;

/// Off-boresight tolerance for holding a lock (degrees).
pub const MISSILE_LOCK_ANGLE_DEG: f32 = 20.0;

/// Seconds of cooldown after a missile launch.
pub const MISSILE_COOLDOWN_SECS: f32 = 4.0;

/// Missile fly-out speed (m/s).
pub const MISSILE_SPEED: f32 = 280.0;

/// Missile damage on a successful proximity kill roll.
pub const MISSILE_DAMAGE: f32 = 35.0;

/// Missile proximity-detonation radius (meters).
pub const MISSILE_LETHAL_RADIUS: f32 = 12.0;

/// Probability a detonating missile damages its target.
pub const MISSILE_PK: f64 = 0.8;

/// Missile self-destruct fuel (seconds of flight).
pub const MISSILE_FUEL_SECS: f32 = 8.0;

/// Shield fraction regenerated per second while unhit.
pub const SHIELD_REGEN_PER_SEC: f32 = 0.02;

/// Seconds without damage before shield regeneration resumes.
pub const SHIELD_REGEN_DELAY_SECS: f32 = 3.0;
