use crate::field::FieldSpace;

/// Distance along the ray to the first intersection with the sphere (a circle in 2D).
///
/// `direction` must be a unit vector. Returns `None` if the ray misses or starts inside.
pub fn sphere_intersection<V: FieldSpace>(
    center: V,
    radius: f32,
    origin: V,
    direction: V,
) -> Option<f32> {
    let oc = origin - center;
    let a = direction.dot(direction);
    let b = oc.dot(direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - a * c;

    if discriminant < 0. {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / a;
    if t > 0. {
        Some(t)
    } else {
        None
    }
}

/// Entry distance and entry axis normal of a ray against an axis-aligned box, using the
/// slab method.
///
/// `direction` must be a unit vector. Returns `None` if the ray misses or starts inside.
pub fn box_intersection<V: FieldSpace>(
    center: V,
    half_extents: V,
    origin: V,
    direction: V,
) -> Option<(f32, V)> {
    let local = origin - center;
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = V::ZERO;

    for &axis in V::AXES {
        let o = local.dot(axis);
        let d = direction.dot(axis);
        let h = half_extents.dot(axis).abs();

        if d.abs() < f32::EPSILON {
            if o.abs() > h {
                return None;
            }
            continue;
        }

        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
        if near > t_enter {
            t_enter = near;
            normal = if d > 0. { -axis } else { axis };
        }
        t_exit = t_exit.min(far);
    }

    if t_enter > t_exit || t_enter <= 0. {
        return None;
    }
    Some((t_enter, normal))
}

#[cfg(test)]
mod tests {
    use bevy::math::{Vec2, Vec3};

    use super::*;

    #[test]
    fn sphere_hit_from_outside() {
        let t = sphere_intersection(Vec3::ZERO, 1.0, Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(t, Some(4.0));
    }

    #[test]
    fn sphere_no_hit_from_inside() {
        assert_eq!(sphere_intersection(Vec2::ZERO, 2.0, Vec2::ZERO, Vec2::X), None);
    }

    #[test]
    fn box_hit_reports_entry_face() {
        let (t, normal) = box_intersection(
            Vec2::ZERO,
            Vec2::new(10.0, 0.5),
            Vec2::new(3.0, 4.5),
            Vec2::NEG_Y,
        )
        .unwrap();
        assert!((t - 4.0).abs() < 1e-6);
        assert_eq!(normal, Vec2::Y);
    }

    #[test]
    fn box_parallel_miss() {
        let hit = box_intersection(
            Vec3::ZERO,
            Vec3::ONE,
            Vec3::new(0.0, 3.0, -5.0),
            Vec3::Z,
        );
        assert!(hit.is_none());
    }
}
