pub mod collisions;
pub mod math;
pub mod sets;
