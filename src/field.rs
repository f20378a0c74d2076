//! Engine-agnostic surface gravity: probing, per-source field evaluation and the
//! per-body resolver. Everything here is generic over [`FieldSpace`], so the same code
//! drives planar and volumetric fields.

pub mod body;
pub mod probe;
pub mod resolver;
pub mod shapes;
pub mod source;
pub mod space;
pub mod world;

pub use body::AffectedBody;
pub use probe::{probe, ProbeHit, ProbeRay, ProbeShape};
pub use resolver::{resolve, Resolution, SourceReading};
pub use shapes::{Ball, Cuboid, Shape};
pub use source::{
    evaluate_field, no_trace, FieldSample, FieldShape, FieldSource, ProbePass, ProbeTrace,
    SourceParams,
};
pub use space::FieldSpace;
pub use world::{BodyFrame, BodyId, Diagnostics, GravityWorld, SimulationHost, SourceId};
