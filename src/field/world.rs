use std::collections::BTreeMap;

use bevy::log::{debug, info, warn};

use crate::error::FieldError;
use crate::model::config::GravityConfig;

use super::body::AffectedBody;
use super::probe::ProbeShape;
use super::resolver::{resolve, Resolution, SourceReading};
use super::source::{no_trace, FieldSource, ProbeTrace};
use super::space::FieldSpace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

/// What the host knows about a body at the start of a tick.
#[derive(Clone, Copy, Debug)]
pub struct BodyFrame<V: FieldSpace> {
    pub position: V,
    pub mass: f32,
    pub rotation: V::Rotation,
}

/// The simulation that owns the bodies.
pub trait SimulationHost<V: FieldSpace> {
    /// `None` if the body no longer exists on the host side.
    fn frame(&self, body: BodyId) -> Option<BodyFrame<V>>;

    /// Accumulates into the body's next integration step.
    fn apply_force(&mut self, body: BodyId, force: V);

    fn set_rotation(&mut self, body: BodyId, rotation: V::Rotation);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub config_warnings: u32,
    pub dominant_switches: u32,
}

/// Observer for every probe ray cast during [`GravityWorld::step`].
pub type TraceHook<V, S> = Box<dyn FnMut(SourceId, &ProbeTrace<'_, V, &S>)>;

/// Registry-driven gravity for hosts that are not Bevy apps.
///
/// Bodies refer to sources by id only, so removing a source is one call that purges it
/// from every body.
pub struct GravityWorld<V: FieldSpace, S> {
    config: GravityConfig,
    sources: BTreeMap<SourceId, FieldSource<S>>,
    bodies: BTreeMap<BodyId, AffectedBody<V, SourceId>>,
    next_source: u32,
    next_body: u32,
    diagnostics: Diagnostics,
    trace: Option<TraceHook<V, S>>,
}

impl<V: FieldSpace, S: ProbeShape<V>> GravityWorld<V, S> {
    pub fn init(config: GravityConfig) -> Self {
        Self {
            config,
            sources: BTreeMap::new(),
            bodies: BTreeMap::new(),
            next_source: 0,
            next_body: 0,
            diagnostics: Diagnostics::default(),
            trace: None,
        }
    }

    pub fn config(&self) -> &GravityConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    pub fn set_trace_hook(&mut self, hook: TraceHook<V, S>) {
        self.trace = Some(hook);
    }

    pub fn add_source(&mut self, source: FieldSource<S>) -> Result<SourceId, FieldError> {
        source.params.validate()?;
        let id = SourceId(self.next_source);
        self.next_source += 1;
        if source.is_inert() {
            warn!("Gravity source {:?} has no field regions and will never apply gravity", id);
            self.diagnostics.config_warnings += 1;
        }
        debug!("Registered gravity source {:?}", id);
        self.sources.insert(id, source);
        Ok(id)
    }

    pub fn source(&self, id: SourceId) -> Option<&FieldSource<S>> {
        self.sources.get(&id)
    }

    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut FieldSource<S>> {
        self.sources.get_mut(&id)
    }

    /// Removes a source and drops it from every body, as if each overlap had ended.
    pub fn remove_source(&mut self, id: SourceId) -> Option<FieldSource<S>> {
        let removed = self.sources.remove(&id)?;
        for body in self.bodies.values_mut() {
            body.exit(id);
        }
        debug!("Removed gravity source {:?}", id);
        Some(removed)
    }

    pub fn add_body(&mut self, local_up: V, rotate_to_surface: bool) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        self.bodies
            .insert(id, AffectedBody::new(local_up, rotate_to_surface));
        id
    }

    pub fn body(&self, id: BodyId) -> Option<&AffectedBody<V, SourceId>> {
        self.bodies.get(&id)
    }

    pub fn remove_body(&mut self, id: BodyId) -> Option<AffectedBody<V, SourceId>> {
        self.bodies.remove(&id)
    }

    pub fn begin_overlap(&mut self, source: SourceId, body: BodyId) -> Result<bool, FieldError> {
        if !self.sources.contains_key(&source) {
            return Err(FieldError::UnknownSource(source));
        }
        let state = self
            .bodies
            .get_mut(&body)
            .ok_or(FieldError::UnknownBody(body))?;
        Ok(state.enter(source))
    }

    /// Ending an overlap with an already removed source is allowed and does nothing.
    pub fn end_overlap(&mut self, source: SourceId, body: BodyId) -> Result<bool, FieldError> {
        let state = self
            .bodies
            .get_mut(&body)
            .ok_or(FieldError::UnknownBody(body))?;
        Ok(state.exit(source))
    }

    /// Runs one fixed tick for every body inside at least one field.
    pub fn step<H: SimulationHost<V>>(
        &mut self,
        delta_seconds: f32,
        host: &mut H,
    ) -> Vec<(BodyId, Resolution<V, SourceId>)> {
        let Self {
            config,
            sources,
            bodies,
            diagnostics,
            trace,
            ..
        } = self;

        let mut resolved = Vec::new();
        for (&id, body) in bodies.iter_mut() {
            if !body.is_tracking() {
                continue;
            }
            let Some(frame) = host.frame(id) else {
                continue;
            };
            let previous = body.dominant();

            let resolution = resolve(
                body,
                |source_id| {
                    let source = sources.get(&source_id)?;
                    let sample = match trace.as_mut() {
                        Some(hook) => source.evaluate(
                            frame.position,
                            config.max_probe_distance,
                            &mut |probe: &ProbeTrace<'_, V, &S>| hook(source_id, probe),
                        ),
                        None => source.evaluate(
                            frame.position,
                            config.max_probe_distance,
                            &mut no_trace,
                        ),
                    }?;
                    Some(SourceReading {
                        sample,
                        params: source.params,
                    })
                },
                delta_seconds,
                config.reorient_rate,
            );

            let Some(resolution) = resolution else {
                continue;
            };
            if previous != Some(resolution.source) {
                diagnostics.dominant_switches += 1;
            }
            host.apply_force(id, resolution.force(frame.mass));
            if let Some(up) = resolution.snap_up {
                host.set_rotation(id, V::align_up(frame.rotation, up));
            }
            resolved.push((id, resolution));
        }
        resolved
    }

    pub fn shutdown(self) -> Diagnostics {
        info!(
            "Shutting down gravity world with {} sources and {} bodies",
            self.sources.len(),
            self.bodies.len()
        );
        self.diagnostics
    }
}
