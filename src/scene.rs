use bevy::{color::palettes::css, prelude::*};
use bevy_rapier3d::prelude::*;
use rand::Rng;
use surface_gravity::prelude::*;

const BALL_COUNT: usize = 12;

fn scene_setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn(Camera3dBundle {
        transform: Transform::from_xyz(10.0, 25.0, 55.0).looking_at(Vec3::new(10.0, 0.0, 0.0), Vec3::Y),
        ..default()
    });
    commands.spawn(DirectionalLightBundle {
        transform: Transform::from_xyz(20.0, 40.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    let platform_mesh = meshes.add(Cuboid::new(40.0, 1.0, 6.0));
    let platform_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x54, 0x93, 0x35),
        ..default()
    });

    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_xyz(0.0, -5.0, 0.0)),
            RigidBody::Fixed,
            GravityFieldBundle::new(GravitySource {
                strength: 9.8,
                range: 12.0,
                debug_visualization: true,
                ..default()
            })
            .with_collider(Collider::cuboid(32.0, 13.0, 15.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                PbrBundle {
                    mesh: platform_mesh,
                    material: platform_material,
                    ..default()
                },
                Collider::cuboid(20.0, 0.5, 3.0),
            ));
            parent.spawn((
                TransformBundle::default(),
                FieldRegionBundle::new(Collider::cuboid(20.0, 0.5, 3.0)),
            ));
        });

    let planet_radius = 4.0;
    let planet_mesh = meshes.add(Sphere::new(planet_radius));
    let planet_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x36, 0x5d, 0xf7),
        ..default()
    });

    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_xyz(28.0, 12.0, 0.0)),
            RigidBody::Fixed,
            GravityFieldBundle::new(GravitySource {
                strength: 6.0,
                range: 8.0,
                debug_visualization: true,
                ..default()
            })
            .with_collider(Collider::ball(planet_radius + 8.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                PbrBundle {
                    mesh: planet_mesh,
                    material: planet_material,
                    ..default()
                },
                Collider::ball(planet_radius),
            ));
            parent.spawn((
                TransformBundle::default(),
                FieldRegionBundle::new(Collider::ball(planet_radius)),
            ));
        });

    let ball_mesh = meshes.add(Sphere::new(0.5));
    let ball_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xf7, 0x7d, 0x36),
        ..default()
    });

    let mut rng = rand::thread_rng();
    for i in 0..BALL_COUNT {
        let affected = if i % 2 == 0 {
            GravityAffected::rotating_to_surface()
        } else {
            GravityAffected::default()
        };
        commands.spawn((
            PbrBundle {
                mesh: ball_mesh.clone(),
                material: ball_material.clone(),
                transform: Transform::from_xyz(
                    rng.gen_range(-15.0..30.0),
                    rng.gen_range(0.0..6.0),
                    rng.gen_range(-2.0..2.0),
                ),
                ..default()
            },
            GravityBodyBundle {
                affected,
                collider: Collider::ball(0.5),
                ..default()
            },
        ));
    }
}

fn draw_probe_traces(mut gizmos: Gizmos, mut traces: EventReader<ProbeTraced>) {
    for trace in traces.read() {
        match trace.hit {
            Some(hit) => gizmos.line(trace.origin, hit, css::LIME),
            None => gizmos.ray(trace.origin, trace.direction * 2.0, css::RED),
        }
    }
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, scene_setup)
            .add_systems(Update, draw_probe_traces);
    }
}
