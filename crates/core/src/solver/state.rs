//! Grid state shared by all solver passes
//!
//! `GridState` owns every field array for the lifetime of one simulation run.
//! Passes borrow the individual fields they read or write; nothing else
//! allocates grid-sized buffers except the concentration snapshot.

use super::fields::FieldData;
use crate::constants::INITIAL_VELOCITY;
use crate::error::ConfigError;
use crate::material::MaterialConstants;

/// All per-cell fields of the solidification grid
#[derive(Debug, Clone)]
pub struct GridState {
    /// Fraction solid, 0 (liquid) to 1 (solid)
    pub fs: FieldData,
    /// Phase map: 0 = liquid, 1 = fully solid (write-once per cell)
    pub map: FieldData,
    /// Interface flag: 1 for liquid cells with a solid Moore neighbour
    pub gb: FieldData,
    /// Geometric factor (solid-neighbour perimeter weight)
    pub g: FieldData,
    /// Growth normal angle in degrees
    pub gvn: FieldData,
    /// Curvature undercooling (K)
    pub tcur: FieldData,
    /// Crystal orientation in degrees
    pub fhi: FieldData,
    /// Liquid concentration (wt%)
    pub cn: FieldData,
    /// Concentration snapshot taken at the start of the step (wt%)
    pub cn_old: FieldData,
    /// Solid-side equilibrium concentration (wt%)
    pub cn_s: FieldData,
    /// Solute diffusivity (m²/s)
    pub d: FieldData,
    /// Interface velocity (m/s)
    pub vel: FieldData,
    sizex: usize,
    sizey: usize,
}

impl GridState {
    /// Allocate a fully liquid grid at the alloy's initial concentration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGrid`] if either dimension is zero. The
    /// check runs before any array is allocated.
    pub fn new(
        sizex: usize,
        sizey: usize,
        material: &MaterialConstants,
    ) -> Result<Self, ConfigError> {
        if sizex == 0 || sizey == 0 {
            return Err(ConfigError::InvalidGrid { sizex, sizey });
        }

        let zeros = FieldData::new(sizex, sizey);
        let cn = FieldData::with_value(sizex, sizey, material.initial_concentration);

        Ok(Self {
            fs: zeros.clone(),
            map: zeros.clone(),
            gb: zeros.clone(),
            g: zeros.clone(),
            gvn: zeros.clone(),
            tcur: zeros.clone(),
            fhi: zeros.clone(),
            cn_old: cn.clone(),
            cn,
            cn_s: zeros,
            d: FieldData::with_value(sizex, sizey, material.liquid_diffusivity),
            vel: FieldData::with_value(sizex, sizey, INITIAL_VELOCITY),
            sizex,
            sizey,
        })
    }

    /// Number of rows
    #[must_use]
    pub fn sizex(&self) -> usize {
        self.sizex
    }

    /// Number of columns
    #[must_use]
    pub fn sizey(&self) -> usize {
        self.sizey
    }

    /// Total number of cells
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.sizex * self.sizey
    }

    /// Number of fully solid cells
    #[must_use]
    pub fn solid_cells(&self) -> usize {
        self.map.count_nonzero()
    }

    /// Number of cells currently flagged as interface
    #[must_use]
    pub fn interface_cells(&self) -> usize {
        self.gb.count_nonzero()
    }

    /// Fraction of the grid that is fully solid
    #[must_use]
    pub fn solid_fraction(&self) -> f64 {
        self.map.sum() / self.cell_count() as f64
    }

    /// Freeze the current concentration for the next step's stencils
    pub fn snapshot_concentration(&mut self) {
        self.cn_old.copy_from(&self.cn);
    }

    /// Zero all velocities; only the next kinetics pass repopulates them
    pub fn reset_velocity(&mut self) {
        self.vel.fill(0.0);
    }

    /// Composite "equilibrium concentration" field
    ///
    /// `k·CN` wherever the cell is solid, `CN` in the liquid.
    #[must_use]
    pub fn equilibrium_concentration(&self, partition_coefficient: f64) -> FieldData {
        let mut out = FieldData::new(self.sizex, self.sizey);
        for ((equ, &cn), &phase) in out
            .data
            .iter_mut()
            .zip(&self.cn.data)
            .zip(&self.map.data)
        {
            *equ = partition_coefficient * cn * phase + (1.0 - phase) * cn;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let material = MaterialConstants::default();
        let state = GridState::new(6, 4, &material).unwrap();

        assert_eq!(state.cell_count(), 24);
        assert_eq!(state.solid_cells(), 0);
        assert!(state
            .cn
            .data
            .iter()
            .all(|&c| c == material.initial_concentration));
        assert_eq!(state.cn, state.cn_old);
        assert!(state
            .d
            .data
            .iter()
            .all(|&d| d == material.liquid_diffusivity));
        assert!(state.vel.data.iter().all(|&v| v == INITIAL_VELOCITY));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let material = MaterialConstants::default();
        assert_eq!(
            GridState::new(0, 10, &material).unwrap_err(),
            ConfigError::InvalidGrid { sizex: 0, sizey: 10 }
        );
        assert!(GridState::new(10, 0, &material).is_err());
    }

    #[test]
    fn test_equilibrium_concentration_scales_solid_only() {
        let material = MaterialConstants::default();
        let mut state = GridState::new(3, 3, &material).unwrap();
        state.cn.set(1, 1, 5.0);
        state.map.set(1, 1, 1.0);

        let equ = state.equilibrium_concentration(0.17);
        assert!((equ.get(1, 1) - 0.85).abs() < 1e-12);
        assert_eq!(equ.get(0, 0), material.initial_concentration);
    }

    #[test]
    fn test_snapshot_and_velocity_reset() {
        let material = MaterialConstants::default();
        let mut state = GridState::new(4, 4, &material).unwrap();
        state.cn.set(2, 2, 9.0);
        state.snapshot_concentration();
        assert_eq!(state.cn_old.get(2, 2), 9.0);

        state.reset_velocity();
        assert_eq!(state.vel.max(), 0.0);
    }
}
