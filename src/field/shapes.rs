use crate::utils::math::{box_intersection, sphere_intersection};

use super::probe::{ProbeHit, ProbeRay, ProbeShape};
use super::space::FieldSpace;

/// A circle in 2D, a sphere in 3D.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball<V> {
    pub center: V,
    pub radius: f32,
}

impl<V> Ball<V> {
    pub fn new(center: V, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl<V: FieldSpace> ProbeShape<V> for Ball<V> {
    fn center(&self) -> V {
        self.center
    }

    fn cast_ray(&self, ray: &ProbeRay<V>) -> Option<ProbeHit<V>> {
        let distance = sphere_intersection(self.center, self.radius, ray.origin, ray.direction)?;
        if distance > ray.max_distance {
            return None;
        }
        let point = ray.origin + ray.direction * distance;
        Some(ProbeHit {
            point,
            normal: (point - self.center).try_normalize()?,
            distance,
        })
    }
}

/// Axis-aligned rectangle (2D) or box (3D).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid<V> {
    pub center: V,
    pub half_extents: V,
}

impl<V> Cuboid<V> {
    pub fn new(center: V, half_extents: V) -> Self {
        Self {
            center,
            half_extents,
        }
    }
}

impl<V: FieldSpace> ProbeShape<V> for Cuboid<V> {
    fn center(&self) -> V {
        self.center
    }

    fn cast_ray(&self, ray: &ProbeRay<V>) -> Option<ProbeHit<V>> {
        let (distance, normal) =
            box_intersection(self.center, self.half_extents, ray.origin, ray.direction)?;
        if distance > ray.max_distance {
            return None;
        }
        Some(ProbeHit {
            point: ray.origin + ray.direction * distance,
            normal,
            distance,
        })
    }
}

/// Either analytic shape, so a source can mix them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape<V> {
    Ball(Ball<V>),
    Cuboid(Cuboid<V>),
}

impl<V: FieldSpace> ProbeShape<V> for Shape<V> {
    fn center(&self) -> V {
        match self {
            Shape::Ball(ball) => ball.center(),
            Shape::Cuboid(cuboid) => cuboid.center(),
        }
    }

    fn cast_ray(&self, ray: &ProbeRay<V>) -> Option<ProbeHit<V>> {
        match self {
            Shape::Ball(ball) => ball.cast_ray(ray),
            Shape::Cuboid(cuboid) => cuboid.cast_ray(ray),
        }
    }
}

impl<V> From<Ball<V>> for Shape<V> {
    fn from(ball: Ball<V>) -> Self {
        Shape::Ball(ball)
    }
}

impl<V> From<Cuboid<V>> for Shape<V> {
    fn from(cuboid: Cuboid<V>) -> Self {
        Shape::Cuboid(cuboid)
    }
}
