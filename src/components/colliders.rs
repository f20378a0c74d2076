use bevy::ecs::bundle::Bundle;
use bevy_rapier3d::prelude::*;

use crate::utils::collisions::{FIELD_REGION_GROUP, GRAVITY_FIELD_GROUP};

use super::gravity::{FieldRegion, GravityAffected, GravitySource};

/// A gravity source with a spherical range sensor the size of its range.
///
/// The surface itself is given by [`FieldRegionBundle`]s on this entity's children.
#[derive(Bundle)]
pub struct GravityFieldBundle {
    pub source: GravitySource,
    pub collider: Collider,
    pub sensor: Sensor,
    pub active_events: ActiveEvents,
    pub active_collision_types: ActiveCollisionTypes,
    pub collision_groups: CollisionGroups,
}

impl GravityFieldBundle {
    pub fn new(source: GravitySource) -> Self {
        Self {
            collider: Collider::ball(source.range),
            source,
            ..Self::default()
        }
    }

    /// Replaces the spherical range sensor, e.g. with a box around a long platform.
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = collider;
        self
    }
}

impl Default for GravityFieldBundle {
    fn default() -> Self {
        let source = GravitySource::default();
        Self {
            collider: Collider::ball(source.range),
            source,
            sensor: Sensor,
            active_events: ActiveEvents::COLLISION_EVENTS,
            active_collision_types: ActiveCollisionTypes::all(),
            collision_groups: CollisionGroups::new(GRAVITY_FIELD_GROUP, Group::ALL),
        }
    }
}

/// A probe-only surface shape.
#[derive(Bundle)]
pub struct FieldRegionBundle {
    pub region: FieldRegion,
    pub collider: Collider,
    pub sensor: Sensor,
    pub collision_groups: CollisionGroups,
}

impl FieldRegionBundle {
    pub fn new(collider: Collider) -> Self {
        Self {
            region: FieldRegion,
            collider,
            sensor: Sensor,
            collision_groups: CollisionGroups::new(FIELD_REGION_GROUP, Group::NONE),
        }
    }
}

#[derive(Bundle)]
pub struct GravityBodyBundle {
    pub affected: GravityAffected,
    pub collider: Collider,
    pub rigid_body: RigidBody,
    pub external_force: ExternalForce,
    pub mass_properties: ReadMassProperties,
    pub active_events: ActiveEvents,
    pub active_collision_types: ActiveCollisionTypes,
}

impl Default for GravityBodyBundle {
    fn default() -> Self {
        Self {
            affected: GravityAffected::default(),
            collider: Collider::default(),
            rigid_body: RigidBody::Dynamic,
            external_force: ExternalForce::default(),
            mass_properties: ReadMassProperties::default(),
            active_events: ActiveEvents::COLLISION_EVENTS,
            active_collision_types: ActiveCollisionTypes::all(),
        }
    }
}
