//! Error types.
//!
//! Geometry and BVH queries never fail; errors only arise while loading
//! configuration or turning source data into world geometry.

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Errors raised while assembling static world geometry.
#[derive(Error, Debug, PartialEq)]
pub enum WorldError {
    /// A vertex coordinate was NaN or infinite.
    #[error("non-finite vertex in model {model}, triangle {triangle}")]
    NonFiniteVertex { model: usize, triangle: usize },

    /// A maze with no cells cannot produce a floor.
    #[error("maze has no cells ({width}x{height})")]
    EmptyMaze { width: usize, height: usize },
}

/// Top-level error for the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("World error: {0}")]
    World(#[from] WorldError),
}

pub type Result<T> = std::result::Result<T, Error>;
