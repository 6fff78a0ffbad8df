//! Enumeration types used throughout the agent core.

use serde::{Deserialize, Serialize};

/// Behavioral mode of a ship agent.
///
/// Declaration order is load-bearing: the state machine breaks exact
/// utility ties in favor of the earlier variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Hold position, no target, minimal activity.
    #[default]
    Idle,
    /// Wander between random points while out of combat.
    Patrol,
    /// Run directly away from the nearest threat.
    Evade,
    /// Close on the enemy and bring weapons to bear.
    Attack,
    /// Circle the enemy at the preferred radius band.
    Orbit,
    /// Retreat while keeping weapons on the enemy.
    Kite,
}

impl StateKind {
    /// All variants in declaration (tie-break) order.
    pub const ALL: [StateKind; 6] = [
        StateKind::Idle,
        StateKind::Patrol,
        StateKind::Evade,
        StateKind::Attack,
        StateKind::Orbit,
        StateKind::Kite,
    ];
}

/// Secondary-weapon lock progression.
///
/// Transitions are owned by the environment's weapon rig; the gunner
/// only reads the current value out of the context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissileLockState {
    /// No lock attempt in progress.
    #[default]
    Idle,
    /// Seeker is acquiring; dumb-fire only.
    Locking,
    /// Full lock held; a guided shot is available.
    Locked,
    /// Post-launch cooldown; no secondary fire.
    Cooldown,
}
