use bevy::app::Plugin;

pub mod config;

pub struct ModelPlugin;

impl Plugin for ModelPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        // Hosts that want the file written insert `load_config` themselves.
        if !app.world().contains_resource::<config::GravityConfig>() {
            app.insert_resource(config::config_or_default(config::CONFIG_PATH));
        }
    }
}
