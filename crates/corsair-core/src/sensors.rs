//! Sensor trait boundary to the host environment.
//!
//! The core never owns spatial indexing or occlusion testing; it queries
//! them through these traits. Results are snapshots valid only for the
//! current tick — nothing here may be cached across ticks except through
//! the gunner's line-of-sight cache, which has its own staleness policy.

use glam::Vec2;

/// Kind of body a spatial query asks for, relative to the querying ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Inert collidable (asteroid, wreck, station hull).
    Obstacle,
    /// Ship on the querying ship's team.
    FriendlyShip,
    /// Ship on an opposing team.
    HostileShip,
}

/// One body returned by a spatial query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensedBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

/// "Find bodies of kind K within radius R of point P."
pub trait SpatialQuery {
    fn bodies_within(&self, kind: BodyKind, center: Vec2, radius: f32) -> Vec<SensedBody>;
}

/// "Is the straight segment between two points unobstructed?"
///
/// Probes are assumed expensive; callers are expected to gate and cache
/// (see the gunner's LOS cache).
pub trait VisibilityProbe {
    fn segment_clear(&self, from: Vec2, to: Vec2) -> bool;
}
