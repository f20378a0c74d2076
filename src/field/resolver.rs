use bevy::log::debug;

use super::body::AffectedBody;
use super::source::{FieldSample, SourceParams};
use super::space::FieldSpace;

/// What a candidate source reported this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceReading<V> {
    pub sample: FieldSample<V>,
    pub params: SourceParams,
}

/// Outcome of a resolution that changed the body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution<V: FieldSpace, K> {
    pub source: K,
    /// Unit vector towards the dominant surface.
    pub direction: V,
    pub distance: f32,
    /// Acceleration to apply. Multiply by the body's mass to get the force.
    pub acceleration: V,
    /// Smoothed up vector after this tick.
    pub local_up: V,
    /// Set when the body asked to be snapped to the surface; the new up axis.
    pub snap_up: Option<V>,
}

impl<V: FieldSpace, K> Resolution<V, K> {
    pub fn force(&self, mass: f32) -> V {
        self.acceleration * mass
    }
}

/// Runs one resolution pass for a body.
///
/// `read` evaluates a candidate source and returns `None` when the source reports no
/// field (disabled, missed, or removed by the host). The smallest distance wins; on a
/// tie the current dominant source is kept. The winner takes over only if it already is
/// dominant or it is strictly closer than the last recorded distance.
///
/// Returns `None` when nothing changed this tick.
pub fn resolve<V, K, R>(
    body: &mut AffectedBody<V, K>,
    mut read: R,
    delta_seconds: f32,
    reorient_rate: f32,
) -> Option<Resolution<V, K>>
where
    V: FieldSpace,
    K: Ord + Copy,
    R: FnMut(K) -> Option<SourceReading<V>>,
{
    let current = body.dominant();
    let mut winner: Option<(K, SourceReading<V>)> = None;

    for source in body.candidates().collect::<Vec<_>>() {
        let Some(reading) = read(source) else {
            continue;
        };
        let better = match &winner {
            None => true,
            Some((_, best)) => {
                reading.sample.distance < best.sample.distance
                    || (reading.sample.distance == best.sample.distance
                        && Some(source) == current)
            }
        };
        if better {
            winner = Some((source, reading));
        }
    }

    let (source, reading) = winner?;
    let FieldSample {
        direction,
        distance,
    } = reading.sample;

    if current != Some(source) && distance >= body.last_distance() {
        return None;
    }
    if current != Some(source) {
        debug!("Dominant gravity source changed at distance {:.2}", distance);
    }
    body.set_dominant(source, distance);

    let target = -direction;
    let t = (delta_seconds * reorient_rate).clamp(0.0, 1.0);
    let local_up = body
        .local_up()
        .lerp(target, t)
        .try_normalize()
        .unwrap_or(target);
    body.set_local_up(local_up);

    Some(Resolution {
        source,
        direction,
        distance,
        acceleration: direction * reading.params.acceleration(distance),
        local_up,
        snap_up: body.rotate_to_surface.then_some(target),
    })
}
