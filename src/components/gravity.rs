use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::field::{
    evaluate_field, no_trace, resolve, AffectedBody, FieldSpace, ProbePass, ProbeTrace,
    SourceParams, SourceReading,
};
use crate::model::config::GravityConfig;
use crate::utils::collisions::RapierShape;
use crate::utils::sets::GravitySet;

#[derive(Component, Clone, Copy, Debug)]
pub struct GravitySource {
    pub strength: f32,
    pub range: f32,
    pub enabled: bool,
    /// Emit a [`ProbeTraced`] event for every probe ray of this source.
    pub debug_visualization: bool,
}

impl Default for GravitySource {
    fn default() -> Self {
        let params = SourceParams::default();
        Self {
            strength: params.strength,
            range: params.range,
            enabled: params.enabled,
            debug_visualization: false,
        }
    }
}

impl GravitySource {
    pub fn params(&self) -> SourceParams {
        SourceParams {
            strength: self.strength,
            range: self.range,
            enabled: self.enabled,
        }
    }
}

/// Marks a collider that is probed to find a source's surface. Lives on the source
/// entity itself or on one of its children.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct FieldRegion;

/// Added to sources that have no field regions when they are spawned.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct InertSource;

/// Added to sources whose strength or range is unusable. Such sources never report a
/// field until they are fixed.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct InvalidSource;

/// A body pulled towards the nearest surface of the sources it is inside.
#[derive(Component, Debug, Default, Deref, DerefMut)]
pub struct GravityAffected {
    #[deref]
    pub state: AffectedBody<Vec3, Entity>,
    applied_force: Vec3,
}

impl GravityAffected {
    pub fn rotating_to_surface() -> Self {
        Self {
            state: AffectedBody::new(Vec3::Y, true),
            applied_force: Vec3::ZERO,
        }
    }

    /// The part of the body's `ExternalForce` that gravity contributed last tick.
    pub fn applied_force(&self) -> Vec3 {
        self.applied_force
    }
}

/// One probe ray of a source with `debug_visualization` enabled.
#[derive(Event, Clone, Copy, Debug)]
pub struct ProbeTraced {
    pub source: Entity,
    pub shape: Entity,
    pub pass: ProbePass,
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
    pub hit: Option<Vec3>,
}

fn warn_inert_sources(
    mut commands: Commands,
    sources: Query<(Entity, Option<&Children>), Added<GravitySource>>,
    regions: Query<(), (With<FieldRegion>, With<Collider>)>,
) {
    for (entity, children) in &sources {
        let has_region = regions.contains(entity)
            || children.is_some_and(|children| children.iter().any(|&child| regions.contains(child)));
        if !has_region {
            warn!(
                "Gravity source {:?} has no field regions and will never apply gravity",
                entity
            );
            commands.entity(entity).insert(InertSource);
        }
    }
}

fn validate_sources(
    mut commands: Commands,
    sources: Query<(Entity, &GravitySource, Has<InvalidSource>), Changed<GravitySource>>,
) {
    for (entity, source, invalid) in &sources {
        match source.params().validate() {
            Ok(()) if invalid => {
                info!("Gravity source {:?} is valid again", entity);
                commands.entity(entity).remove::<InvalidSource>();
            }
            Ok(()) => {}
            Err(e) => {
                if !invalid {
                    error!("Ignoring gravity source {:?}: {}", entity, e);
                    commands.entity(entity).insert(InvalidSource);
                }
            }
        }
    }
}

fn track_field_membership(
    mut collision_events: EventReader<CollisionEvent>,
    sources: Query<(), With<GravitySource>>,
    mut bodies: Query<&mut GravityAffected>,
) {
    for event in collision_events.read() {
        match *event {
            CollisionEvent::Started(a, b, _) => {
                let (source, body) = if sources.contains(a) && bodies.contains(b) {
                    (a, b)
                } else if sources.contains(b) && bodies.contains(a) {
                    (b, a)
                } else {
                    continue;
                };
                let Ok(mut affected) = bodies.get_mut(body) else {
                    continue;
                };
                if affected.enter(source) {
                    debug!("{:?} entered the field of {:?}", body, source);
                }
            }
            CollisionEvent::Stopped(a, b, _) => {
                // The source may already be despawned, so only the body side is checked.
                for (source, body) in [(a, b), (b, a)] {
                    if let Ok(mut affected) = bodies.get_mut(body) {
                        if affected.exit(source) {
                            debug!("{:?} left the field of {:?}", body, source);
                        }
                    }
                }
            }
        }
    }
}

fn forget_removed_sources(
    mut removed: RemovedComponents<GravitySource>,
    mut bodies: Query<&mut GravityAffected>,
) {
    for source in removed.read() {
        for mut affected in &mut bodies {
            affected.exit(source);
        }
    }
}

fn field_regions<'a>(
    source: Entity,
    children: Option<&Children>,
    shapes: &'a Query<(&Collider, &GlobalTransform), With<FieldRegion>>,
) -> Vec<RapierShape<'a>> {
    std::iter::once(source)
        .chain(children.into_iter().flat_map(|children| children.iter().copied()))
        .filter_map(|entity| {
            let (collider, transform) = shapes.get(entity).ok()?;
            Some(RapierShape {
                entity,
                collider,
                transform,
            })
        })
        .collect()
}

fn resolve_gravity(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GravityConfig>,
    sources: Query<(&GravitySource, Option<&Children>), Without<InvalidSource>>,
    shapes: Query<(&Collider, &GlobalTransform), With<FieldRegion>>,
    mut bodies: Query<(
        Entity,
        &mut GravityAffected,
        &GlobalTransform,
        &mut Transform,
        Option<&ReadMassProperties>,
        Option<&mut ExternalForce>,
    )>,
    mut traces: EventWriter<ProbeTraced>,
) {
    for (entity, mut affected, global_transform, mut transform, mass, mut external_force) in
        &mut bodies
    {
        // Only gravity's own share is taken back; other forces on the body stay.
        if affected.applied_force != Vec3::ZERO {
            let previous = std::mem::take(&mut affected.applied_force);
            if let Some(external_force) = external_force.as_mut() {
                external_force.force -= previous;
            }
        }
        if !affected.is_tracking() {
            continue;
        }

        let origin = global_transform.translation();
        let resolution = resolve(
            &mut affected.state,
            |source| {
                // A despawned source simply stops reporting.
                let (gravity_source, children) = sources.get(source).ok()?;
                let params = gravity_source.params();
                let regions = field_regions(source, children, &shapes);
                let sample = if gravity_source.debug_visualization {
                    evaluate_field(
                        &params,
                        regions,
                        origin,
                        config.max_probe_distance,
                        &mut |trace: &ProbeTrace<'_, Vec3, RapierShape<'_>>| {
                            traces.send(ProbeTraced {
                                source,
                                shape: trace.shape.entity,
                                pass: trace.pass,
                                origin: trace.ray.origin,
                                direction: trace.ray.direction,
                                max_distance: trace.ray.max_distance,
                                hit: trace.hit.map(|hit| hit.point),
                            });
                        },
                    )
                } else {
                    evaluate_field(
                        &params,
                        regions,
                        origin,
                        config.max_probe_distance,
                        &mut no_trace,
                    )
                }?;
                Some(SourceReading { sample, params })
            },
            time.delta_seconds(),
            config.reorient_rate,
        );

        let Some(resolution) = resolution else {
            continue;
        };

        let mass = mass.map_or(1.0, |mass| mass.get().mass);
        let force = resolution.force(mass);
        match external_force {
            Some(mut external_force) => external_force.force += force,
            None => {
                commands.entity(entity).insert(ExternalForce {
                    force,
                    ..default()
                });
            }
        }
        affected.applied_force = force;

        if let Some(up) = resolution.snap_up {
            transform.rotation = <Vec3 as FieldSpace>::align_up(transform.rotation, up);
        }
    }
}

pub struct GravityPlugin;

impl Plugin for GravityPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionEvent>()
            .add_event::<ProbeTraced>()
            .add_systems(PreUpdate, validate_sources)
            .add_systems(
                Update,
                (
                    track_field_membership,
                    forget_removed_sources,
                    warn_inert_sources,
                )
                    .chain()
                    .in_set(GravitySet::Membership),
            )
            .add_systems(
                FixedUpdate,
                resolve_gravity.in_set(GravitySet::Resolution),
            );
    }
}
