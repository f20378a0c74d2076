use bevy::log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

use super::probe::{probe, ProbeHit, ProbeRay, ProbeShape};
use super::space::FieldSpace;

/// Tunable parameters of a gravity source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceParams {
    /// Acceleration at the source's surface.
    pub strength: f32,
    /// Distance from the surface at which the distance ratio saturates.
    pub range: f32,
    /// A disabled source keeps tracking membership but never reports a field.
    pub enabled: bool,
}

impl Default for SourceParams {
    fn default() -> Self {
        Self {
            strength: 9.81,
            range: 10.0,
            enabled: true,
        }
    }
}

impl SourceParams {
    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(FieldError::InvalidRange(self.range));
        }
        if !self.strength.is_finite() {
            return Err(FieldError::NonFiniteStrength(self.strength));
        }
        Ok(())
    }

    /// `distance / range`, clamped to `[0, 1]`.
    pub fn distance_ratio(&self, distance: f32) -> f32 {
        (distance / self.range).clamp(0.0, 1.0)
    }

    /// Acceleration magnitude at `distance` from the surface.
    ///
    /// Grows with distance: `strength * (1 + ratio)`. This is intentional and not
    /// inverse-square.
    pub fn acceleration(&self, distance: f32) -> f32 {
        self.strength * (1.0 + self.distance_ratio(distance))
    }
}

/// Nearest-surface estimate for one source, as seen from a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample<V> {
    /// Unit vector from the body towards the surface ("down").
    pub direction: V,
    /// Distance from the body to the surface point.
    pub distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbePass {
    /// Cast towards the shape's center.
    Coarse,
    /// Cast along the normal found by the coarse pass.
    Refine,
}

/// One probe ray, reported to an optional observer such as a debug visualizer.
#[derive(Debug)]
pub struct ProbeTrace<'a, V, S: ?Sized> {
    pub shape: &'a S,
    pub pass: ProbePass,
    pub ray: ProbeRay<V>,
    pub hit: Option<ProbeHit<V>>,
}

/// Trace observer that ignores every probe.
pub fn no_trace<V, S: ?Sized>(_: &ProbeTrace<'_, V, S>) {}

/// Finds the nearest surface among `shapes` using two probes per shape.
///
/// The first probe aims at the shape's center; the second re-casts along the negated
/// normal found by the first, which walks the estimate towards the closest point on
/// elongated shapes. The smallest distance over all shapes wins, earlier shapes win ties.
pub fn evaluate_field<V, S, I, T>(
    params: &SourceParams,
    shapes: I,
    origin: V,
    max_probe_distance: f32,
    trace: &mut T,
) -> Option<FieldSample<V>>
where
    V: FieldSpace,
    S: ProbeShape<V>,
    I: IntoIterator<Item = S>,
    T: FnMut(&ProbeTrace<'_, V, S>) + ?Sized,
{
    if !params.enabled {
        return None;
    }

    let mut best: Option<FieldSample<V>> = None;
    for shape in shapes {
        let Some(coarse) = (shape.center() - origin).try_normalize() else {
            debug!("Body sits on a field shape's center, skipping shape");
            continue;
        };
        let Some(first) = cast(&shape, origin, coarse, max_probe_distance, ProbePass::Coarse, trace)
        else {
            continue;
        };
        let Some(surface) = (-first.normal).try_normalize() else {
            continue;
        };

        let mut candidate = FieldSample {
            direction: surface,
            distance: origin.distance(first.point),
        };

        if let Some(second) = cast(&shape, origin, surface, max_probe_distance, ProbePass::Refine, trace)
        {
            let distance = origin.distance(second.point);
            if distance < candidate.distance {
                if let Some(direction) = (-second.normal).try_normalize() {
                    candidate = FieldSample {
                        direction,
                        distance,
                    };
                }
            }
        }

        if best.map_or(true, |best| candidate.distance < best.distance) {
            best = Some(candidate);
        }
    }
    best
}

fn cast<V, S, T>(
    shape: &S,
    origin: V,
    direction: V,
    max_distance: f32,
    pass: ProbePass,
    trace: &mut T,
) -> Option<ProbeHit<V>>
where
    V: FieldSpace,
    S: ProbeShape<V>,
    T: FnMut(&ProbeTrace<'_, V, S>) + ?Sized,
{
    let hit = probe(shape, origin, direction, max_distance);
    debug_assert!(hit.is_ok(), "surface probe rejected: {:?}", hit);
    let hit = match hit {
        Ok(hit) => hit,
        Err(e) => {
            error!("Surface probe rejected: {}", e);
            return None;
        }
    };
    trace(&ProbeTrace {
        shape,
        pass,
        ray: ProbeRay {
            origin,
            direction,
            max_distance,
        },
        hit,
    });
    hit
}

/// A shape owned by a [`FieldSource`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldShape<S> {
    pub shape: S,
    /// Only field regions are probed; other shapes are carried for the host's benefit.
    pub field_region: bool,
}

impl<S> FieldShape<S> {
    pub fn region(shape: S) -> Self {
        Self {
            shape,
            field_region: true,
        }
    }

    pub fn solid(shape: S) -> Self {
        Self {
            shape,
            field_region: false,
        }
    }
}

/// A gravity source together with the shapes it owns.
#[derive(Clone, Debug)]
pub struct FieldSource<S> {
    pub params: SourceParams,
    shapes: Vec<FieldShape<S>>,
}

impl<S> FieldSource<S> {
    pub fn new(params: SourceParams, shapes: Vec<FieldShape<S>>) -> Result<Self, FieldError> {
        params.validate()?;
        Ok(Self { params, shapes })
    }

    pub fn shapes(&self) -> &[FieldShape<S>] {
        &self.shapes
    }

    pub fn field_regions(&self) -> impl Iterator<Item = &S> {
        self.shapes
            .iter()
            .filter(|shape| shape.field_region)
            .map(|shape| &shape.shape)
    }

    /// A source without field regions can never report a field.
    pub fn is_inert(&self) -> bool {
        self.field_regions().next().is_none()
    }

    pub fn evaluate<'a, V, T>(
        &'a self,
        origin: V,
        max_probe_distance: f32,
        trace: &mut T,
    ) -> Option<FieldSample<V>>
    where
        V: FieldSpace,
        S: ProbeShape<V>,
        T: FnMut(&ProbeTrace<'_, V, &'a S>) + ?Sized,
    {
        evaluate_field(
            &self.params,
            self.field_regions(),
            origin,
            max_probe_distance,
            trace,
        )
    }
}

impl<V: FieldSpace, S: ProbeShape<V> + ?Sized> ProbeShape<V> for &S {
    fn center(&self) -> V {
        (**self).center()
    }

    fn cast_ray(&self, ray: &ProbeRay<V>) -> Option<ProbeHit<V>> {
        (**self).cast_ray(ray)
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::{Vec2, Vec3};

    use super::*;
    use crate::field::shapes::{Ball, Cuboid, Shape};

    fn params(strength: f32, range: f32) -> SourceParams {
        SourceParams {
            strength,
            range,
            enabled: true,
        }
    }

    #[test]
    fn force_scales_with_distance_ratio() {
        let source = params(9.8, 5.0);
        assert!((source.acceleration(2.5) - 14.7).abs() < 1e-5);
        assert_eq!(source.acceleration(0.0), 9.8);
        assert!((source.acceleration(50.0) - 19.6).abs() < 1e-5);
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert_eq!(
            params(1.0, 0.0).validate(),
            Err(FieldError::InvalidRange(0.0))
        );
        assert_eq!(
            params(f32::NAN, 1.0).validate().unwrap_err().to_string(),
            "source strength must be finite, got NaN"
        );
    }

    #[test]
    fn sphere_field_points_at_center() {
        let source = FieldSource::new(
            params(9.8, 10.0),
            vec![FieldShape::region(Ball::new(Vec3::ZERO, 2.0))],
        )
        .unwrap();
        let sample = source
            .evaluate(Vec3::new(0.0, 5.0, 0.0), 100.0, &mut no_trace)
            .unwrap();
        assert!(sample.direction.abs_diff_eq(Vec3::NEG_Y, 1e-5));
        assert!((sample.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn refinement_finds_the_near_face_of_a_long_platform() {
        // Body hovers above the far end of a long platform. The coarse ray towards the
        // center hits the top face at a slant; the refined ray drops straight down.
        let platform = Cuboid::new(Vec2::ZERO, Vec2::new(20.0, 0.5));
        let origin = Vec2::new(15.0, 2.5);
        let mut passes = Vec::new();
        let sample = evaluate_field(
            &params(9.8, 10.0),
            [platform],
            origin,
            100.0,
            &mut |trace: &ProbeTrace<'_, Vec2, Cuboid<Vec2>>| {
                passes.push((trace.pass, trace.hit.is_some()))
            },
        )
        .unwrap();

        assert_eq!(
            passes,
            vec![(ProbePass::Coarse, true), (ProbePass::Refine, true)]
        );
        assert!(sample.direction.abs_diff_eq(Vec2::NEG_Y, 1e-5));
        assert!((sample.distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn refinement_miss_keeps_the_first_hit() {
        // Off the platform's corner: the coarse ray lands on the top face, the refined ray
        // drops straight down past the end of the platform.
        let platform = Cuboid::new(Vec2::ZERO, Vec2::new(1.0, 0.5));
        let mut passes = Vec::new();
        let sample = evaluate_field(
            &params(9.8, 10.0),
            [platform],
            Vec2::new(3.0, 3.0),
            100.0,
            &mut |trace: &ProbeTrace<'_, Vec2, Cuboid<Vec2>>| {
                passes.push((trace.pass, trace.hit.is_some()))
            },
        )
        .unwrap();

        assert_eq!(
            passes,
            vec![(ProbePass::Coarse, true), (ProbePass::Refine, false)]
        );
        assert!(sample.direction.abs_diff_eq(Vec2::NEG_Y, 1e-5));
        assert!((sample.distance - 2.5 * 2.0_f32.sqrt()).abs() < 1e-4);
    }

    /// Answers the coarse ray with `coarse` and every other ray with `refine`.
    struct Scripted {
        coarse: ProbeHit<Vec2>,
        refine: Option<ProbeHit<Vec2>>,
    }

    impl ProbeShape<Vec2> for Scripted {
        fn center(&self) -> Vec2 {
            Vec2::ZERO
        }

        fn cast_ray(&self, ray: &ProbeRay<Vec2>) -> Option<ProbeHit<Vec2>> {
            if ray.direction.abs_diff_eq((-ray.origin).normalize(), 1e-5) {
                Some(self.coarse)
            } else {
                self.refine
            }
        }
    }

    #[test]
    fn farther_refined_hit_is_ignored() {
        let origin = Vec2::new(0.0, 4.0);
        let shape = Scripted {
            coarse: ProbeHit {
                point: Vec2::new(0.0, 1.0),
                normal: Vec2::new(1.0, 1.0).normalize(),
                distance: 3.0,
            },
            refine: Some(ProbeHit {
                point: Vec2::new(-4.0, 0.0),
                normal: Vec2::Y,
                distance: 5.0,
            }),
        };

        let sample =
            evaluate_field(&params(9.8, 10.0), [shape], origin, 100.0, &mut no_trace).unwrap();
        assert!(sample
            .direction
            .abs_diff_eq(-Vec2::new(1.0, 1.0).normalize(), 1e-5));
        assert!((sample.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "surface probe rejected")]
    fn zero_direction_fails_loudly_in_debug_builds() {
        cast(
            &Ball::new(Vec2::ZERO, 1.0),
            Vec2::new(0.0, 5.0),
            Vec2::ZERO,
            10.0,
            ProbePass::Coarse,
            &mut no_trace,
        );
    }

    #[test]
    fn nearest_shape_wins() {
        let shapes: Vec<Shape<Vec2>> = vec![
            Ball::new(Vec2::new(0.0, -10.0), 1.0).into(),
            Ball::new(Vec2::new(4.0, 0.0), 1.0).into(),
        ];
        let sample = evaluate_field(&params(1.0, 5.0), &shapes, Vec2::ZERO, 100.0, &mut no_trace)
            .unwrap();
        assert!(sample.direction.abs_diff_eq(Vec2::X, 1e-5));
        assert!((sample.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn disabled_source_reports_nothing() {
        let mut source = FieldSource::new(
            params(9.8, 10.0),
            vec![FieldShape::region(Ball::new(Vec3::ZERO, 2.0))],
        )
        .unwrap();
        source.params.enabled = false;
        assert!(source
            .evaluate(Vec3::new(0.0, 5.0, 0.0), 100.0, &mut no_trace)
            .is_none());
    }

    #[test]
    fn solid_shapes_are_not_probed() {
        let source = FieldSource::new(
            params(9.8, 10.0),
            vec![FieldShape::solid(Ball::new(Vec3::ZERO, 2.0))],
        )
        .unwrap();
        assert!(source.is_inert());
        assert!(source
            .evaluate(Vec3::new(0.0, 5.0, 0.0), 100.0, &mut no_trace)
            .is_none());
    }

    #[test]
    fn shape_out_of_probe_reach_is_a_miss() {
        let sample = evaluate_field(
            &params(9.8, 10.0),
            [Ball::new(Vec3::ZERO, 1.0)],
            Vec3::new(0.0, 50.0, 0.0),
            10.0,
            &mut no_trace,
        );
        assert!(sample.is_none());
    }
}
