use crate::error::ProbeError;

use super::space::FieldSpace;

/// A ray cast against a single shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeRay<V> {
    pub origin: V,
    /// Unit direction.
    pub direction: V,
    pub max_distance: f32,
}

/// Where a probe ray met a shape's surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeHit<V> {
    pub point: V,
    /// Outward unit normal at `point`.
    pub normal: V,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

/// A single shape that can be intersected by a ray, without consulting the rest of the
/// scene.
pub trait ProbeShape<V: FieldSpace> {
    /// Reference point used for the coarse guess of where the surface is.
    fn center(&self) -> V;

    /// First intersection of `ray` with this shape within `ray.max_distance`.
    ///
    /// `ray.direction` is always a unit vector when called through [`probe`].
    fn cast_ray(&self, ray: &ProbeRay<V>) -> Option<ProbeHit<V>>;
}

/// Casts a ray from `origin` along `direction` against `shape` only.
///
/// A miss is `Ok(None)`. A zero `direction` is a usage error.
pub fn probe<V, S>(
    shape: &S,
    origin: V,
    direction: V,
    max_distance: f32,
) -> Result<Option<ProbeHit<V>>, ProbeError>
where
    V: FieldSpace,
    S: ProbeShape<V> + ?Sized,
{
    let direction = direction.try_normalize().ok_or(ProbeError::ZeroDirection)?;
    let ray = ProbeRay {
        origin,
        direction,
        max_distance,
    };
    Ok(shape
        .cast_ray(&ray)
        .filter(|hit| hit.distance <= max_distance))
}
