use bevy::{
    log::{self, LogPlugin},
    prelude::*,
};
use bevy_rapier3d::prelude::*;
use scene::ScenePlugin;
use surface_gravity::model::config::{load_config, CONFIG_PATH};
use surface_gravity::SurfaceGravityPlugin;

mod scene;

fn setup_physics(mut rapier_config: ResMut<RapierConfiguration>) {
    rapier_config.gravity = Vec3::ZERO;
}

#[cfg(feature = "debug")]
const LOG_LEVEL: log::Level = log::Level::INFO;

#[cfg(not(feature = "debug"))]
const LOG_LEVEL: log::Level = log::Level::ERROR;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    level: LOG_LEVEL,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Surface Gravity".into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(load_config(CONFIG_PATH))
        .add_plugins((
            RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule(),
            #[cfg(feature = "debug")]
            RapierDebugRenderPlugin::default(),
            SurfaceGravityPlugin,
            ScenePlugin,
        ))
        .add_systems(Startup, setup_physics)
        .run();
}
