//! The per-ship agent facade.
//!
//! Owns the state machine, navigator and gunner for one ship; the host
//! calls `tick(context, ...)` once per simulation step and actuates the
//! returned command. Construction validates configuration and fails
//! fast — a misconfigured agent never reaches its first tick.

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use corsair_core::constants::MIN_TIME_IN_STATE_SECS;
use corsair_core::context::Context;
use corsair_core::enums::StateKind;
use corsair_core::sensors::{SpatialQuery, VisibilityProbe};
use corsair_core::types::{Command, SteeringTuning};
use corsair_nav::{NavConfig, Navigator};

use crate::gunner::{Gunner, GunnerConfig};
use crate::machine::StateMachine;
use crate::states::Actuators;

/// Full configuration for one ship agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentConfig {
    pub nav: NavConfig,
    pub gunner: GunnerConfig,
    pub tuning: SteeringTuning,
    /// Minimum dwell time between behavior switches (seconds).
    pub min_time_in_state_secs: f32,
    /// Seed for the agent's behavioral randomness.
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            nav: NavConfig::default(),
            gunner: GunnerConfig::default(),
            tuning: SteeringTuning {
                forward_accel: 80.0,
                reverse_accel: 40.0,
                strafe_accel: 50.0,
                dead_zone: 1.5,
            },
            min_time_in_state_secs: MIN_TIME_IN_STATE_SECS,
            seed: 0,
        }
    }
}

/// Construction-time configuration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Dwell time must be positive for hysteresis to mean anything.
    NonPositiveDwell,
    /// A steering acceleration limit is zero or negative.
    NonPositiveAccel(&'static str),
    /// A navigator parameter is out of range.
    InvalidNav(&'static str),
    /// A gunner parameter is out of range.
    InvalidGunner(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveDwell => {
                write!(f, "min_time_in_state_secs must be positive")
            }
            ConfigError::NonPositiveAccel(which) => {
                write!(f, "steering tuning `{which}` must be positive")
            }
            ConfigError::InvalidNav(which) => write!(f, "nav config `{which}` is invalid"),
            ConfigError::InvalidGunner(which) => {
                write!(f, "gunner config `{which}` is invalid")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_time_in_state_secs <= 0.0 {
            return Err(ConfigError::NonPositiveDwell);
        }
        if self.tuning.forward_accel <= 0.0 {
            return Err(ConfigError::NonPositiveAccel("forward_accel"));
        }
        if self.tuning.reverse_accel <= 0.0 {
            return Err(ConfigError::NonPositiveAccel("reverse_accel"));
        }
        if self.tuning.strafe_accel <= 0.0 {
            return Err(ConfigError::NonPositiveAccel("strafe_accel"));
        }
        if self.nav.max_speed <= 0.0 {
            return Err(ConfigError::InvalidNav("max_speed"));
        }
        if self.nav.ray_count == 0 {
            return Err(ConfigError::InvalidNav("ray_count"));
        }
        if self.gunner.primary_range <= 0.0 {
            return Err(ConfigError::InvalidGunner("primary_range"));
        }
        if self.gunner.projectile_speed <= 0.0 {
            return Err(ConfigError::InvalidGunner("projectile_speed"));
        }
        Ok(())
    }
}

/// One ship's complete decision core.
pub struct ShipAgent {
    machine: StateMachine,
    navigator: Navigator,
    gunner: Gunner,
    rng: ChaCha8Rng,
    tick: u64,
    last_context: Option<Context>,
}

impl ShipAgent {
    pub fn new(config: AgentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            machine: StateMachine::new(config.min_time_in_state_secs),
            navigator: Navigator::new(config.nav, config.tuning),
            gunner: Gunner::new(config.gunner),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tick: 0,
            last_context: None,
        })
    }

    /// Run one decision tick: score and tick the active behavior, then
    /// let the navigator turn the chosen waypoint into steering.
    pub fn tick(
        &mut self,
        ctx: &Context,
        sensors: &dyn SpatialQuery,
        probe: &dyn VisibilityProbe,
        dt: f32,
    ) -> Command {
        let mut cmd = Command::default();
        {
            let mut act = Actuators {
                navigator: &mut self.navigator,
                gunner: &mut self.gunner,
                command: &mut cmd,
                probe,
                tick: self.tick,
            };
            self.machine.update(ctx, &mut act, &mut self.rng, dt);
        }
        self.navigator.tick(&ctx.kinematics, sensors, dt, &mut cmd);
        self.last_context = Some(*ctx);
        self.tick += 1;
        cmd
    }

    /// Identity of the active behavior, for telemetry/observation layers.
    pub fn active_state(&self) -> StateKind {
        self.machine.active_kind()
    }

    /// Utility scores from the last tick, in declaration order.
    pub fn utility_scores(&self) -> &[f32; 6] {
        self.machine.scores()
    }

    /// The context most recently fed to `tick`, for observation layers.
    pub fn last_context(&self) -> Option<&Context> {
        self.last_context.as_ref()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn gunner(&self) -> &Gunner {
        &self.gunner
    }
}
