//! Sensor-trait adapters over the arena world.
//!
//! Implements the core's `SpatialQuery` and `VisibilityProbe` against the
//! hecs world: kind-filtered radius scans and segment-vs-asteroid
//! occlusion. Each adapter is built fresh for one ship for one tick.

use glam::Vec2;
use hecs::{Entity, World};

use corsair_core::geom::segment_hits_circle;
use corsair_core::sensors::{BodyKind, SensedBody, SpatialQuery, VisibilityProbe};

use crate::components::{Asteroid, Body, Hull, Ship, Team};

/// One ship's view of the world for the current tick.
pub struct WorldSensors<'a> {
    world: &'a World,
    self_entity: Entity,
    self_team: Team,
}

impl<'a> WorldSensors<'a> {
    pub fn new(world: &'a World, self_entity: Entity, self_team: Team) -> Self {
        Self {
            world,
            self_entity,
            self_team,
        }
    }
}

impl SpatialQuery for WorldSensors<'_> {
    fn bodies_within(&self, kind: BodyKind, center: Vec2, radius: f32) -> Vec<SensedBody> {
        let mut found = Vec::new();
        match kind {
            BodyKind::Obstacle => {
                for (_entity, (body, rock)) in self.world.query::<(&Body, &Asteroid)>().iter() {
                    if (body.position - center).length() <= radius + rock.radius {
                        found.push(SensedBody {
                            position: body.position,
                            velocity: body.velocity,
                            radius: rock.radius,
                        });
                    }
                }
            }
            BodyKind::FriendlyShip | BodyKind::HostileShip => {
                let want_hostile = kind == BodyKind::HostileShip;
                for (entity, (body, ship, hull)) in
                    self.world.query::<(&Body, &Ship, &Hull)>().iter()
                {
                    if entity == self.self_entity || !hull.alive() {
                        continue;
                    }
                    if ship.team.opposes(self.self_team) != want_hostile {
                        continue;
                    }
                    if (body.position - center).length() <= radius {
                        found.push(SensedBody {
                            position: body.position,
                            velocity: body.velocity,
                            radius: 0.0,
                        });
                    }
                }
            }
        }
        found
    }
}

impl VisibilityProbe for WorldSensors<'_> {
    fn segment_clear(&self, from: Vec2, to: Vec2) -> bool {
        for (_entity, (body, rock)) in self.world.query::<(&Body, &Asteroid)>().iter() {
            if segment_hits_circle(from, to, body.position, rock.radius) {
                return false;
            }
        }
        true
    }
}
