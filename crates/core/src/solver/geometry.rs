//! Geometric factor, orientation propagation, and curvature undercooling
//!
//! For every interface cell this pass:
//! 1. Refreshes the growth normal angle
//! 2. Computes the geometric factor from the solid neighbours
//! 3. Inherits the largest crystal orientation in the 3×3 block
//! 4. Estimates curvature from the block-averaged fraction solid
//! 5. Applies the four-fold anisotropic Gibbs-Thomson correction
//!
//! ```text
//! G     = b0·Σ(orthogonal Map) + (b0/√2)·Σ(diagonal Map)
//! κ     = (1 − 2·Σ(Fs in 3×3)/9) / Lc
//! ΔT_κ  = [1 − δk·cos(4·(Fhi − GvN))] · κ · Γ
//! ```
//!
//! Cells that are not on the interface keep their previous values.

use super::fields::FieldData;
use super::normal_angle::normal_angle;
use crate::constants::{four_fold_cosine, DIAGONAL_DISTANCE, NEIGHBORHOOD_CELLS};
use rayon::prelude::*;

/// Physics parameters for the geometry pass
#[derive(Debug, Clone, Copy)]
pub struct GeometryParams {
    /// Cell size Lc in meters
    pub cell_size: f64,
    /// Base geometric factor b0 (dimensionless)
    pub geometric_factor: f64,
    /// Anisotropy strength δk (dimensionless)
    pub anisotropy: f64,
    /// Gibbs-Thomson coefficient Γ (K·m)
    pub gibbs_thomson: f64,
}

/// Per-cell result of the geometry pass
#[derive(Debug, Clone, Copy, PartialEq)]
struct CellGeometry {
    index: usize,
    normal_angle: f64,
    geometric_factor: f64,
    orientation: f64,
    curvature_undercooling: f64,
}

/// Geometric factor from the solid neighbours of an interior cell
#[inline]
#[must_use]
pub fn geometric_factor(map: &FieldData, i: usize, j: usize, b0: f64) -> f64 {
    let orthogonal = map.get(i, j + 1) + map.get(i, j - 1) + map.get(i - 1, j) + map.get(i + 1, j);
    let diagonal = map.get(i - 1, j + 1)
        + map.get(i - 1, j - 1)
        + map.get(i + 1, j + 1)
        + map.get(i + 1, j - 1);
    b0 * orthogonal + (b0 / DIAGONAL_DISTANCE) * diagonal
}

/// Curvature (1/m) from the fraction solid averaged over the 3×3 block
#[inline]
#[must_use]
pub fn curvature(fs: &FieldData, i: usize, j: usize, cell_size: f64) -> f64 {
    let fs_neighborhood = fs.block_sum(i, j);
    (1.0 - 2.0 * fs_neighborhood / NEIGHBORHOOD_CELLS) / cell_size
}

/// Run the geometry pass over all interface cells
///
/// Reads `gb`, `map`, and `fs`; writes `gvn`, `g`, `fhi`, and `tcur` at
/// interface cells only. Orientation is propagated from a snapshot of `fhi`
/// taken before the pass, so each cell sees only the previous step's
/// orientations.
///
/// # Returns
///
/// Number of interface cells processed
#[allow(clippy::too_many_arguments)]
pub fn step_geometry(
    gb: &FieldData,
    map: &FieldData,
    fs: &FieldData,
    gvn: &mut FieldData,
    g: &mut FieldData,
    fhi: &mut FieldData,
    tcur: &mut FieldData,
    params: GeometryParams,
) -> usize {
    let sizex = gb.sizex;
    let sizey = gb.sizey;

    let updates: Vec<CellGeometry> = {
        let gvn_prev: &FieldData = gvn;
        let fhi_prev: &FieldData = fhi;

        (1..sizex.saturating_sub(1))
            .into_par_iter()
            .flat_map_iter(|i| {
                (1..sizey.saturating_sub(1)).filter_map(move |j| {
                    let idx = i * sizey + j;
                    if gb.data[idx] != 1.0 {
                        return None;
                    }

                    let normal = normal_angle(fs, i, j).unwrap_or(gvn_prev.data[idx]);
                    let orientation = fhi_prev.block_max(i, j);
                    let kappa = curvature(fs, i, j, params.cell_size);
                    let angle_factor =
                        1.0 - params.anisotropy * four_fold_cosine(orientation, normal);

                    Some(CellGeometry {
                        index: idx,
                        normal_angle: normal,
                        geometric_factor: geometric_factor(map, i, j, params.geometric_factor),
                        orientation,
                        curvature_undercooling: angle_factor * kappa * params.gibbs_thomson,
                    })
                })
            })
            .collect()
    };

    for cell in &updates {
        gvn.data[cell.index] = cell.normal_angle;
        g.data[cell.index] = cell.geometric_factor;
        fhi.data[cell.index] = cell.orientation;
        tcur.data[cell.index] = cell.curvature_undercooling;
    }

    updates.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LC: f64 = 0.25e-6;

    fn params(anisotropy: f64) -> GeometryParams {
        GeometryParams {
            cell_size: LC,
            geometric_factor: 0.4,
            anisotropy,
            gibbs_thomson: 2.4e-7,
        }
    }

    struct Fields {
        gb: FieldData,
        map: FieldData,
        fs: FieldData,
        gvn: FieldData,
        g: FieldData,
        fhi: FieldData,
        tcur: FieldData,
    }

    /// 7×7 grid with one solid seed at (3, 3) and its Moore ring flagged
    fn seeded(angle: f64) -> Fields {
        let mut fields = Fields {
            gb: FieldData::new(7, 7),
            map: FieldData::new(7, 7),
            fs: FieldData::new(7, 7),
            gvn: FieldData::new(7, 7),
            g: FieldData::new(7, 7),
            fhi: FieldData::new(7, 7),
            tcur: FieldData::new(7, 7),
        };
        fields.map.set(3, 3, 1.0);
        fields.fs.set(3, 3, 1.0);
        fields.fhi.set(3, 3, angle);
        super::super::interface::detect_interface(&fields.map, &mut fields.gb);
        fields
    }

    fn run(fields: &mut Fields, p: GeometryParams) -> usize {
        step_geometry(
            &fields.gb,
            &fields.map,
            &fields.fs,
            &mut fields.gvn,
            &mut fields.g,
            &mut fields.fhi,
            &mut fields.tcur,
            p,
        )
    }

    #[test]
    fn test_geometric_factor_weights() {
        let mut f = seeded(0.0);
        assert_eq!(run(&mut f, params(0.0)), 8);

        // Orthogonal neighbour of the seed
        assert_relative_eq!(f.g.get(3, 4), 0.4, epsilon = 1e-15);
        // Diagonal neighbour of the seed
        assert_relative_eq!(f.g.get(2, 2), 0.4 / 2.0_f64.sqrt(), epsilon = 1e-15);
        // Non-interface cells untouched
        assert_eq!(f.g.get(0, 0), 0.0);
        assert_eq!(f.g.get(3, 3), 0.0);
    }

    #[test]
    fn test_curvature_undercooling_isotropic() {
        let mut f = seeded(0.0);
        run(&mut f, params(0.0));

        // One solid cell in the block: κ = (1 − 2/9) / Lc
        let kappa = (1.0 - 2.0 / 9.0) / LC;
        assert_relative_eq!(f.tcur.get(2, 3), kappa * 2.4e-7, max_relative = 1e-12);
        assert_relative_eq!(curvature(&f.fs, 2, 3, LC), kappa, max_relative = 1e-12);
    }

    #[test]
    fn test_orientation_propagates_one_ring() {
        let mut f = seeded(30.0);
        run(&mut f, params(0.3));

        for i in 2..=4 {
            for j in 2..=4 {
                assert_eq!(f.fhi.get(i, j), 30.0, "cell ({i}, {j})");
            }
        }
        // The next ring is not yet reached
        assert_eq!(f.fhi.get(1, 1), 0.0);
        assert_eq!(f.fhi.get(3, 5), 0.0);
    }

    #[test]
    fn test_anisotropy_modulates_curvature() {
        let mut f = seeded(0.0);
        run(&mut f, params(0.3));

        let kappa = (1.0 - 2.0 / 9.0) / LC;
        for (i, j) in [(3, 4), (2, 2), (4, 3)] {
            let factor = 1.0 - 0.3 * four_fold_cosine(f.fhi.get(i, j), f.gvn.get(i, j));
            assert_relative_eq!(f.tcur.get(i, j), factor * kappa * 2.4e-7, max_relative = 1e-12);
        }
        // Along an axis the normal is aligned with the crystal: 1 − δk
        let axis = f.tcur.get(3, 4) / (kappa * 2.4e-7);
        assert_relative_eq!(axis, 0.7, max_relative = 1e-12);
        // On a diagonal the misorientation is 45°: 1 + δk
        let diagonal = f.tcur.get(2, 2) / (kappa * 2.4e-7);
        assert_relative_eq!(diagonal, 1.3, max_relative = 1e-12);
    }

    #[test]
    fn test_normal_angles_around_seed() {
        let mut f = seeded(0.0);
        run(&mut f, params(0.0));

        // Seed at j-1 → +x gradient → 90°
        assert_relative_eq!(f.gvn.get(3, 4), 90.0, max_relative = 1e-12);
        assert_relative_eq!(f.gvn.get(3, 2), -90.0, max_relative = 1e-12);
        // Seed directly above/below in i: x-component zero, angle keeps its old value
        assert_eq!(f.gvn.get(4, 3), 0.0);
        assert_eq!(f.gvn.get(2, 3), 0.0);
    }
}
