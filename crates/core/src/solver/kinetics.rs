//! Interface kinetics, fraction-solid advance, and solute partitioning
//!
//! # Physics Implementation
//!
//! Interface velocity from the linearised kinetic law:
//! ```text
//! V   = μk · [ΔT + ml·(C − C0) − ΔT_κ] · [1 + δk·cos(4·(Fhi − GvN))]
//! ΔFs = min(G·V·Δt/Lc, 1 − Fs)
//! Rej = Cⁿ·(1 − k)·ΔFs
//! ```
//!
//! Where:
//! - `ΔT`: applied undercooling
//! - `ml·(C − C0)`: constitutional undercooling from local solute enrichment
//! - `ΔT_κ`: curvature undercooling from the geometry pass
//!
//! Rejected solute is pushed back into the liquid at the same cell. A cell
//! whose fraction solid reaches 1 becomes solid for good: its phase flag is set
//! and its diffusivity switches to the solid value. This pass is the only
//! place where those two transitions happen.

use super::fields::FieldData;
use crate::constants::four_fold_cosine;

/// Physics parameters for the kinetics pass
#[derive(Debug, Clone, Copy)]
pub struct KineticsParams {
    /// Timestep in seconds
    pub dt: f64,
    /// Cell size Lc in meters
    pub cell_size: f64,
    /// Anisotropy strength δk (dimensionless)
    pub anisotropy: f64,
    /// Applied undercooling ΔT (K)
    pub undercooling: f64,
    /// Kinetic coefficient μk (m/(s·K))
    pub kinetic_coefficient: f64,
    /// Initial alloy concentration C0 (wt%)
    pub initial_concentration: f64,
    /// Liquidus slope ml (K/wt%)
    pub liquidus_slope: f64,
    /// Partition coefficient k (dimensionless)
    pub partition_coefficient: f64,
    /// Diffusivity assigned to fully solid cells (m²/s)
    pub solid_diffusivity: f64,
}

/// Read-only fields consumed by the kinetics pass
#[derive(Debug, Clone, Copy)]
pub struct KineticsInputs<'a> {
    /// Interface flags
    pub gb: &'a FieldData,
    /// Geometric factor
    pub g: &'a FieldData,
    /// Growth normal angle (degrees)
    pub gvn: &'a FieldData,
    /// Crystal orientation (degrees)
    pub fhi: &'a FieldData,
    /// Curvature undercooling (K)
    pub tcur: &'a FieldData,
    /// Concentration snapshot from the start of the step
    pub cn_old: &'a FieldData,
}

/// Aggregate outcome of one kinetics pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KineticsOutcome {
    /// Interface cells processed
    pub interface_cells: usize,
    /// Cells that reached Fs = 1 during this pass
    pub solidified_cells: usize,
    /// Total solute rejected into the liquid (wt%·cell)
    pub rejected_solute: f64,
}

/// Interface velocity (m/s) at one cell
#[inline]
#[must_use]
pub fn interface_velocity(
    concentration: f64,
    curvature_undercooling: f64,
    orientation: f64,
    normal_angle: f64,
    params: &KineticsParams,
) -> f64 {
    let angle_factor = 1.0 + params.anisotropy * four_fold_cosine(orientation, normal_angle);
    let driving_force = params.undercooling
        + params.liquidus_slope * (concentration - params.initial_concentration)
        - curvature_undercooling;
    params.kinetic_coefficient * driving_force * angle_factor
}

/// Run the kinetics pass over all interface cells
///
/// Writes `vel`, `fs`, `cn`, `cn_s`, `map`, and `d` at interface cells only.
/// Each cell reads and writes only itself, so the sweep order is irrelevant.
///
/// Fraction solid is kept inside `[0, 1]`: the increment is capped at `1 − Fs`
/// and a negative velocity cannot drive `Fs` below zero. The solute rejected
/// is computed from the increment actually applied.
#[allow(clippy::too_many_arguments)]
pub fn step_kinetics(
    inputs: &KineticsInputs<'_>,
    fs: &mut FieldData,
    map: &mut FieldData,
    cn: &mut FieldData,
    cn_s: &mut FieldData,
    d: &mut FieldData,
    vel: &mut FieldData,
    params: KineticsParams,
) -> KineticsOutcome {
    let sizex = fs.sizex;
    let sizey = fs.sizey;
    let k = params.partition_coefficient;
    let mut outcome = KineticsOutcome::default();

    for i in 1..sizex.saturating_sub(1) {
        for j in 1..sizey.saturating_sub(1) {
            let idx = i * sizey + j;
            if inputs.gb.data[idx] != 1.0 {
                continue;
            }
            outcome.interface_cells += 1;

            let velocity = interface_velocity(
                cn.data[idx],
                inputs.tcur.data[idx],
                inputs.fhi.data[idx],
                inputs.gvn.data[idx],
                &params,
            );
            vel.data[idx] = velocity;

            let fs_prev = fs.data[idx];
            let growth = inputs.g.data[idx] * velocity * params.dt / params.cell_size;
            let fs_next = (fs_prev + growth).clamp(0.0, 1.0);
            let delta_fs = fs_next - fs_prev;
            fs.data[idx] = fs_next;

            let rejected = inputs.cn_old.data[idx] * (1.0 - k) * delta_fs;
            cn.data[idx] += rejected;
            outcome.rejected_solute += rejected;

            cn_s.data[idx] = cn.data[idx] * k;

            if fs.data[idx] >= 1.0 {
                fs.data[idx] = 1.0;
                map.data[idx] = 1.0;
                d.data[idx] = params.solid_diffusivity;
                outcome.solidified_cells += 1;
            }
        }
    }

    outcome
}
