//! Error types for configuration, material constants, and simulation runs
//!
//! An oversized diffusion timestep is not an error: it is logged as a warning
//! and counted in the step report.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid simulation configuration, detected before any grid is allocated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {sizex}x{sizey}")]
    InvalidGrid { sizex: usize, sizey: usize },

    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite")]
    NonFinite { name: &'static str },

    #[error("anisotropy strength must be finite and non-negative, got {0}")]
    InvalidAnisotropy(f64),

    #[error("number of steps must be positive")]
    ZeroSteps,

    #[error("nucleation site ({x}, {y}) lies outside the {sizex}x{sizey} grid")]
    NucleationOutOfBounds {
        x: usize,
        y: usize,
        sizex: usize,
        sizey: usize,
    },

    #[error("a {sizex}x{sizey} grid has no interior cells to nucleate in")]
    NoInterior { sizex: usize, sizey: usize },

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

/// Invalid or unreadable material constants
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("failed to read material constants from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse material constants")]
    Parse(#[from] serde_json::Error),

    #[error("partition coefficient must satisfy 0 < k < 1, got {0}")]
    InvalidPartitionCoefficient(f64),

    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite")]
    NonFinite { name: &'static str },
}

/// Top-level error for building, running, and exporting a simulation
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error("failed to read configuration from {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration")]
    ConfigParse(#[source] serde_json::Error),

    #[error("failed to write {}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize simulation result")]
    Serialize(#[source] serde_json::Error),
}
