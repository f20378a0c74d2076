use std::io;

use thiserror::Error;

use crate::field::world::{BodyId, SourceId};

/// Misuse of the gravity registry or invalid source parameters.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("source range must be positive and finite, got {0}")]
    InvalidRange(f32),
    #[error("source strength must be finite, got {0}")]
    NonFiniteStrength(f32),
    #[error("unknown gravity source {0:?}")]
    UnknownSource(SourceId),
    #[error("unknown affected body {0:?}")]
    UnknownBody(BodyId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("probe direction must not be a zero vector")]
    ZeroDirection,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid gravity config: {0}")]
    Invalid(&'static str),
}
