//! Error types for the simulation core

use thiserror::Error;

/// Top-level error type for simulation operations
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("No service nodes available for dispatch")]
    EmptyNodeList,

    #[error("Invalid seed {seed}: must be positive and not a multiple of {modulus}")]
    InvalidSeed { seed: i64, modulus: i64 },

    #[error("Dispatch policy selected node {index}, but only {available} nodes exist")]
    NodeOutOfRange { index: usize, available: usize },
}
