//! Field-based CAFD solver passes
//!
//! Each physical process is a free `step_*` function over [`FieldData`]
//! slices with a small `Copy` parameter struct, so the passes can be tested
//! in isolation and composed by [`crate::DendriteSimulation`] in a fixed
//! order:
//!
//! 1. [`detect_interface`]
//! 2. [`step_geometry`] (normal angle, geometric factor, orientation, curvature)
//! 3. [`step_solute_diffusion`]
//! 4. [`step_kinetics`]
//! 5. [`select_time_step`]
//!
//! Interior-cell loops skip the outermost ring, which is never written by any
//! pass.

mod diffusion;
mod fields;
mod geometry;
mod interface;
mod kinetics;
mod normal_angle;
mod nucleation;
mod state;
mod time_step;

pub use diffusion::{
    check_stability, stability_limit, step_solute_diffusion, DiffusionParams, StabilityCheck,
};
pub use fields::FieldData;
pub use geometry::{curvature, geometric_factor, step_geometry, GeometryParams};
pub use interface::{detect_grain_boundaries, detect_interface};
pub use kinetics::{
    interface_velocity, step_kinetics, KineticsInputs, KineticsOutcome, KineticsParams,
};
pub use normal_angle::{fraction_solid_gradient, normal_angle, update_normal_angle};
pub use nucleation::{seed_nucleus, NucleationSite};
pub use state::GridState;
pub use time_step::{next_time_step, select_time_step, TimeStep};
