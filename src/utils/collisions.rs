use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::field::{ProbeHit, ProbeRay, ProbeShape};

/// Range sensors of gravity sources.
pub const GRAVITY_FIELD_GROUP: Group = Group::GROUP_10;
/// Probe-only shapes. They collide with nothing, so they never raise events.
pub const FIELD_REGION_GROUP: Group = Group::GROUP_11;

/// A Rapier collider placed in the world, probed on its own rather than through the
/// query pipeline.
#[derive(Clone, Copy, Debug)]
pub struct RapierShape<'a> {
    pub entity: Entity,
    pub collider: &'a Collider,
    pub transform: &'a GlobalTransform,
}

impl ProbeShape<Vec3> for RapierShape<'_> {
    fn center(&self) -> Vec3 {
        self.transform.translation()
    }

    fn cast_ray(&self, ray: &ProbeRay<Vec3>) -> Option<ProbeHit<Vec3>> {
        let (_, rotation, translation) = self.transform.to_scale_rotation_translation();
        // Parry reports the exit point for rays starting inside; those are misses.
        if self.collider.contains_point(translation, rotation, ray.origin) {
            return None;
        }
        let hit = self.collider.cast_ray_and_get_normal(
            translation,
            rotation,
            ray.origin,
            ray.direction,
            ray.max_distance,
            false,
        )?;
        Some(ProbeHit {
            point: hit.point,
            normal: hit.normal,
            distance: ray.origin.distance(hit.point),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(
        collider: &Collider,
        transform: &GlobalTransform,
        origin: Vec3,
        direction: Vec3,
    ) -> Option<ProbeHit<Vec3>> {
        let shape = RapierShape {
            entity: Entity::PLACEHOLDER,
            collider,
            transform,
        };
        shape.cast_ray(&ProbeRay {
            origin,
            direction,
            max_distance: 100.0,
        })
    }

    #[test]
    fn ray_from_outside_hits_the_near_side() {
        let hit = cast(
            &Collider::ball(2.0),
            &GlobalTransform::IDENTITY,
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::NEG_Y,
        )
        .unwrap();
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-4));
        assert!(hit.normal.abs_diff_eq(Vec3::Y, 1e-4));
        assert!((hit.distance - 3.0).abs() < 1e-4);
    }

    #[test]
    fn ray_from_inside_is_a_miss() {
        let ball = Collider::ball(2.0);
        assert!(cast(
            &ball,
            &GlobalTransform::IDENTITY,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::NEG_Y
        )
        .is_none());

        let cube = Collider::cuboid(1.0, 1.0, 1.0);
        let moved = GlobalTransform::from_xyz(10.0, 0.0, 0.0);
        assert!(cast(&cube, &moved, Vec3::new(10.5, 0.0, 0.0), Vec3::X).is_none());
        assert!(cast(&cube, &moved, Vec3::new(13.0, 0.0, 0.0), Vec3::NEG_X).is_some());
    }
}
