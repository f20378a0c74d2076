use bevy::ecs::schedule::SystemSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(SystemSet)]
pub enum GravitySet {
    /// Overlap events update which sources each body is inside. Runs in `Update`.
    Membership,
    /// Dominant source, force and orientation. Runs in `FixedUpdate`.
    Resolution,
}
