//! Gravity that pulls bodies towards the nearest surface of arbitrarily shaped sources.
//!
//! The algorithm lives in [`field`] and is generic over 2D and 3D vectors. The Bevy and
//! Rapier integration is [`SurfaceGravityPlugin`]: spawn sources with
//! [`GravityFieldBundle`](components::colliders::GravityFieldBundle), give them
//! [`FieldRegionBundle`](components::colliders::FieldRegionBundle) children, and add
//! [`GravityAffected`](components::gravity::GravityAffected) to dynamic bodies.

#![allow(clippy::type_complexity)] // Query types can be really complex

use bevy::app::{App, Plugin};

pub mod components;
pub mod error;
pub mod field;
pub mod model;
pub mod utils;

pub struct SurfaceGravityPlugin;

impl Plugin for SurfaceGravityPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((model::ModelPlugin, components::ComponentsPlugin));
    }
}

pub mod prelude {
    pub use crate::components::colliders::{
        FieldRegionBundle, GravityBodyBundle, GravityFieldBundle,
    };
    pub use crate::components::gravity::{
        FieldRegion, GravityAffected, GravitySource, InertSource, InvalidSource, ProbeTraced,
    };
    pub use crate::error::{ConfigError, FieldError, ProbeError};
    pub use crate::model::config::GravityConfig;
    pub use crate::utils::sets::GravitySet;
    pub use crate::SurfaceGravityPlugin;
}
