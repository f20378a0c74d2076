use bevy::app::{App, Plugin};

pub mod colliders;
pub mod gravity;

pub struct ComponentsPlugin;

impl Plugin for ComponentsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(gravity::GravityPlugin);
    }
}
