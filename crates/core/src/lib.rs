//! Dendritic Solidification Core Library
//!
//! A coupled cellular-automaton / finite-difference (CAFD) model of 2D dendrite
//! growth in an undercooled binary alloy melt. A single seed crystal grows into
//! the liquid while rejecting solute ahead of the advancing interface.
//!
//! ## Per-step pipeline
//!
//! Every timestep runs five passes over the same grid, in a fixed order:
//! 1. Interface detection (liquid cells touching solid)
//! 2. Geometry and curvature (normal angle, geometric factor, orientation, Gibbs-Thomson)
//! 3. Explicit solute diffusion
//! 4. Interface kinetics (velocity, fraction solid, solute rejection)
//! 5. Adaptive CFL time-step update
//!
//! ## Example
//!
//! ```rust,no_run
//! use dendrite_sim_core::{run_simulation, MaterialConstants, SimulationConfig};
//!
//! let config = SimulationConfig::quick_test();
//! let result = run_simulation(config, MaterialConstants::default())?;
//! println!("solid fraction: {:.3}", result.final_solid_fraction);
//! # Ok::<(), dendrite_sim_core::SimError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod material;
pub mod simulation;
pub mod solver;

pub use config::{
    DomainConfig, NucleationConfig, OutputConfig, PhysicalConfig, Preset, SimulationConfig,
    TimeConfig,
};
pub use error::{ConfigError, MaterialError, SimError};
pub use material::MaterialConstants;
pub use simulation::{
    run_orientation_sweep, run_simulation, run_sweep, DendriteSimulation, SimulationResult,
    SimulationSummary, StepReport,
};
pub use solver::{FieldData, GridState, NucleationSite};
