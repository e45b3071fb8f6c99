//! Adaptive timestep from an interface-velocity CFL condition
//!
//! The fastest interface may advance at most `1/cfl` of a cell per step:
//! ```text
//! Δt_next = Lc / (cfl · V_max)      if V_max > 0
//! Δt_next = Δt                      otherwise
//! ```

use super::fields::FieldData;

/// Timestep selection result with diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStep {
    /// Timestep for the next step in seconds
    pub dt: f64,
    /// Largest velocity found in the field (m/s)
    pub max_velocity: f64,
    /// Whether the CFL condition replaced the previous timestep
    pub limited: bool,
}

/// Next timestep for a given peak interface velocity
#[inline]
#[must_use]
pub fn next_time_step(dt: f64, max_velocity: f64, cell_size: f64, cfl_factor: f64) -> f64 {
    if max_velocity > 0.0 {
        cell_size / (cfl_factor * max_velocity)
    } else {
        dt
    }
}

/// Select the next timestep from the velocity field
///
/// Uses the signed maximum of `vel`: a field with only receding interfaces
/// keeps the current timestep.
#[must_use]
pub fn select_time_step(vel: &FieldData, dt: f64, cell_size: f64, cfl_factor: f64) -> TimeStep {
    let max_velocity = vel.max();
    TimeStep {
        dt: next_time_step(dt, max_velocity, cell_size, cfl_factor),
        max_velocity,
        limited: max_velocity > 0.0,
    }
}
