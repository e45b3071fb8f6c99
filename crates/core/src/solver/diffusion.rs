//! Solute transport by explicit finite differences
//!
//! Solves Fick's second law with a forward-Euler step and a 5-point Laplacian:
//! ```text
//! C[i,j]ⁿ⁺¹ = C[i,j]ⁿ + D[i,j]·Δt/Lc² · (C[i-1,j] − 2C[i,j] + C[i+1,j]
//!                                      + C[i,j-1] − 2C[i,j] + C[i,j+1])ⁿ
//! ```
//!
//! Every stencil read comes from the frozen snapshot `Cⁿ`, so rows can be
//! updated in parallel. The outermost ring is never updated (no-flux boundary).

use super::fields::FieldData;
use crate::constants::STABILITY_TOLERANCE;
use rayon::prelude::*;
use tracing::warn;

/// Physics parameters for the diffusion pass
#[derive(Debug, Clone, Copy)]
pub struct DiffusionParams {
    /// Timestep in seconds
    pub dt: f64,
    /// Cell size Lc in meters
    pub cell_size: f64,
}

/// Outcome of the explicit-scheme stability check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityCheck {
    /// Largest stable timestep `Lc²/(4·D_max)` in seconds
    pub limit: f64,
    /// Whether the timestep exceeded the limit beyond the tolerance
    pub exceeded: bool,
}

/// Largest stable explicit timestep for the given diffusivity field
#[must_use]
pub fn stability_limit(d: &FieldData, cell_size: f64) -> f64 {
    (cell_size * cell_size) / (4.0 * d.max())
}

/// Check `dt` against the explicit 2D diffusion bound
#[must_use]
pub fn check_stability(d: &FieldData, params: DiffusionParams) -> StabilityCheck {
    let limit = stability_limit(d, params.cell_size);
    StabilityCheck {
        limit,
        exceeded: params.dt > limit * STABILITY_TOLERANCE,
    }
}

/// Advance the concentration field by one explicit diffusion step
///
/// Reads `cn_old` and `d`, writes the interior of `cn`. A timestep beyond the
/// stability bound is reported with a warning and in the returned check, but
/// the update still runs.
pub fn step_solute_diffusion(
    cn_old: &FieldData,
    d: &FieldData,
    cn: &mut FieldData,
    params: DiffusionParams,
) -> StabilityCheck {
    let stability = check_stability(d, params);
    if stability.exceeded {
        warn!(
            "Time step ({:.2e} s) exceeds diffusion stability limit ({:.2e} s); numerical instability may occur",
            params.dt, stability.limit
        );
    }

    let sizex = cn.sizex;
    let sizey = cn.sizey;
    let factor = params.dt / (params.cell_size * params.cell_size);
    let old = cn_old.as_slice();
    let diffusivity = d.as_slice();

    cn.as_mut_slice()
        .par_chunks_mut(sizey)
        .enumerate()
        .filter(|(i, _)| *i >= 1 && *i + 1 < sizex)
        .for_each(|(i, row)| {
            for j in 1..sizey.saturating_sub(1) {
                let idx = i * sizey + j;
                let c = old[idx];

                let dif_x = (old[idx - sizey] - 2.0 * c + old[idx + sizey]) * diffusivity[idx];
                let dif_y = (old[idx - 1] - 2.0 * c + old[idx + 1]) * diffusivity[idx];

                row[j] = c + (dif_x + dif_y) * factor;
            }
        });

    stability
}
