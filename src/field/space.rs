use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

use bevy::math::{Quat, Vec2, Vec3};

/// Vector space the gravity core runs in.
///
/// Implemented for `Vec2` (planar fields) and `Vec3` (volumetric fields). Everything in
/// [`crate::field`] is generic over this trait so both variants share one algorithm.
pub trait FieldSpace:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Orientation of a body in this space.
    type Rotation: Copy + Debug + Send + Sync + 'static;

    const ZERO: Self;
    const UP: Self;
    /// Unit vectors along the coordinate axes.
    const AXES: &'static [Self];

    fn dot(self, rhs: Self) -> f32;
    fn try_normalize(self) -> Option<Self>;
    fn lerp(self, rhs: Self, t: f32) -> Self;

    fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    fn distance(self, rhs: Self) -> f32 {
        (self - rhs).length()
    }

    /// The up axis of a body with the given orientation.
    fn up_of(rotation: Self::Rotation) -> Self;

    /// Rotates `rotation` along the shortest arc so that its up axis points along `up`.
    fn align_up(rotation: Self::Rotation, up: Self) -> Self::Rotation;
}

impl FieldSpace for Vec2 {
    /// Counter-clockwise angle in radians.
    type Rotation = f32;

    const ZERO: Self = Vec2::ZERO;
    const UP: Self = Vec2::Y;
    const AXES: &'static [Self] = &[Vec2::X, Vec2::Y];

    fn dot(self, rhs: Self) -> f32 {
        Vec2::dot(self, rhs)
    }

    fn try_normalize(self) -> Option<Self> {
        Vec2::try_normalize(self)
    }

    fn lerp(self, rhs: Self, t: f32) -> Self {
        Vec2::lerp(self, rhs, t)
    }

    fn up_of(rotation: f32) -> Self {
        Vec2::new(-rotation.sin(), rotation.cos())
    }

    fn align_up(_rotation: f32, up: Self) -> f32 {
        // A planar body has a single degree of freedom, so there is no heading to keep.
        (-up.x).atan2(up.y)
    }
}

impl FieldSpace for Vec3 {
    type Rotation = Quat;

    const ZERO: Self = Vec3::ZERO;
    const UP: Self = Vec3::Y;
    const AXES: &'static [Self] = &[Vec3::X, Vec3::Y, Vec3::Z];

    fn dot(self, rhs: Self) -> f32 {
        Vec3::dot(self, rhs)
    }

    fn try_normalize(self) -> Option<Self> {
        Vec3::try_normalize(self)
    }

    fn lerp(self, rhs: Self, t: f32) -> Self {
        Vec3::lerp(self, rhs, t)
    }

    fn up_of(rotation: Quat) -> Self {
        rotation * Vec3::Y
    }

    fn align_up(rotation: Quat, up: Self) -> Quat {
        let (Some(from), Some(to)) = (Self::up_of(rotation).try_normalize(), up.try_normalize())
        else {
            return rotation;
        };
        (Quat::from_rotation_arc(from, to) * rotation).normalize()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn planar_up_follows_angle() {
        assert!(<Vec2 as FieldSpace>::up_of(0.0).abs_diff_eq(Vec2::Y, 1e-6));
        assert!(<Vec2 as FieldSpace>::up_of(FRAC_PI_2).abs_diff_eq(Vec2::NEG_X, 1e-6));
    }

    #[test]
    fn planar_align_up_round_trips() {
        let up = Vec2::new(1.0, -1.0).normalize();
        let angle = <Vec2 as FieldSpace>::align_up(0.3, up);
        assert!(<Vec2 as FieldSpace>::up_of(angle).abs_diff_eq(up, 1e-5));
    }

    #[test]
    fn volumetric_align_up_keeps_heading_when_already_up() {
        let rotation = Quat::from_rotation_y(1.2);
        let aligned = <Vec3 as FieldSpace>::align_up(rotation, Vec3::Y);
        assert!(aligned.abs_diff_eq(rotation, 1e-5));
    }

    #[test]
    fn volumetric_align_up_handles_upside_down() {
        let aligned = <Vec3 as FieldSpace>::align_up(Quat::IDENTITY, Vec3::NEG_Y);
        assert!((aligned * Vec3::Y).abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn length_and_distance() {
        assert_eq!(FieldSpace::length(Vec3::new(3.0, 4.0, 0.0)), 5.0);
        assert_eq!(FieldSpace::distance(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0)), 5.0);
    }
}
