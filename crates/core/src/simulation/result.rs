//! Final simulation record and summary statistics

use super::DendriteSimulation;
use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::material::MaterialConstants;
use crate::solver::FieldData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Everything a caller needs from a finished run
///
/// Carries the final fields, the scalar outcomes, and the configuration and
/// material the run was made with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub config: SimulationConfig,
    pub material: MaterialConstants,
    /// Resolved seed coordinates `(row, column)`
    pub seed_site: (usize, usize),

    /// Fraction solid
    pub fs: FieldData,
    /// Phase map (1 = solid)
    pub map: FieldData,
    /// Liquid concentration (wt%)
    pub cn: FieldData,
    /// Crystal orientation (degrees)
    pub fhi: FieldData,
    /// `k·CN` in solid cells, `CN` in liquid cells (wt%)
    pub cn_equ: FieldData,

    /// Simulated time (s)
    pub total_time: f64,
    /// Solid cells / total cells
    pub final_solid_fraction: f64,
    pub steps_run: usize,
    /// Steps whose timestep exceeded the diffusion stability bound
    pub stability_warnings: usize,
    /// Solute rejected into the liquid over the whole run
    pub total_rejected_solute: f64,
}

impl SimulationResult {
    pub(crate) fn from_simulation(simulation: DendriteSimulation) -> Self {
        let DendriteSimulation {
            config,
            material,
            state,
            seed_site,
            total_time,
            steps_run,
            stability_warnings,
            total_rejected_solute,
            ..
        } = simulation;

        let final_solid_fraction = state.solid_fraction();
        let cn_equ = state.equilibrium_concentration(material.partition_coefficient);

        Self {
            config,
            material,
            seed_site,
            fs: state.fs,
            map: state.map,
            cn: state.cn,
            fhi: state.fhi,
            cn_equ,
            total_time,
            final_solid_fraction,
            steps_run,
            stability_warnings,
            total_rejected_solute,
        }
    }

    /// Relative solute drift once rejected solute is accounted for
    ///
    /// `(ΣCN − N·C0 − ΣRej) / (N·C0)`. Diffusion alone conserves solute
    /// away from the fixed boundary ring, so this stays small for a crystal
    /// that has not reached the edges.
    #[must_use]
    pub fn solute_balance_error(&self) -> f64 {
        let initial = self.cn.data.len() as f64 * self.material.initial_concentration;
        (self.cn.sum() - initial - self.total_rejected_solute) / initial
    }

    /// Summary statistics of this result
    #[must_use]
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::from_result(self)
    }

    /// Write the result as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Serialize`] or [`SimError::Export`] on failure.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), SimError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self).map_err(SimError::Serialize)?;
        fs::write(path, contents).map_err(|source| SimError::Export {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a result previously written by [`Self::save_json`]
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigRead`] if the file cannot be read and
    /// [`SimError::ConfigParse`] if it does not hold a result record.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(SimError::ConfigParse)
    }
}

/// Scalar statistics of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub solid_cells: usize,
    pub total_cells: usize,
    pub final_solid_fraction: f64,
    /// Mean fraction solid over the whole grid
    pub mean_fraction_solid: f64,
    pub total_time: f64,
    pub cn_equ_sum: f64,
    pub cn_equ_mean: f64,
    /// Population standard deviation
    pub cn_equ_std: f64,
    pub cn_equ_min: f64,
    pub cn_equ_max: f64,
    /// Mean `CN_Equ` over solid cells divided by C0
    pub solid_enrichment: Option<f64>,
    /// Mean `CN_Equ` over liquid cells divided by C0
    pub liquid_enrichment: Option<f64>,
}

impl SimulationSummary {
    #[must_use]
    pub fn from_result(result: &SimulationResult) -> Self {
        let total_cells = result.map.data.len();
        let solid_cells = result.map.count_nonzero();
        let n = total_cells as f64;

        let cn_equ_sum = result.cn_equ.sum();
        let cn_equ_mean = cn_equ_sum / n;
        let variance = result
            .cn_equ
            .data
            .iter()
            .map(|&c| (c - cn_equ_mean).powi(2))
            .sum::<f64>()
            / n;

        let (solid_enrichment, liquid_enrichment) = if solid_cells > 0 && solid_cells < total_cells
        {
            let c0 = result.material.initial_concentration;
            let (solid_sum, liquid_sum) = result
                .cn_equ
                .data
                .iter()
                .zip(&result.map.data)
                .fold((0.0, 0.0), |(solid, liquid), (&c, &phase)| {
                    if phase == 1.0 {
                        (solid + c, liquid)
                    } else {
                        (solid, liquid + c)
                    }
                });
            (
                Some(solid_sum / solid_cells as f64 / c0),
                Some(liquid_sum / (total_cells - solid_cells) as f64 / c0),
            )
        } else {
            (None, None)
        };

        Self {
            solid_cells,
            total_cells,
            final_solid_fraction: result.final_solid_fraction,
            mean_fraction_solid: result.fs.sum() / n,
            total_time: result.total_time,
            cn_equ_sum,
            cn_equ_mean,
            cn_equ_std: variance.sqrt(),
            cn_equ_min: result.cn_equ.min(),
            cn_equ_max: result.cn_equ.max(),
            solid_enrichment,
            liquid_enrichment,
        }
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation summary")?;
        writeln!(
            f,
            "  Solid cells:          {} / {}",
            self.solid_cells, self.total_cells
        )?;
        writeln!(f, "  Final solid fraction: {:.4}", self.final_solid_fraction)?;
        writeln!(f, "  Mean fraction solid:  {:.4}", self.mean_fraction_solid)?;
        writeln!(f, "  Total time:           {:.4e} s", self.total_time)?;
        writeln!(f, "  CN_Equ (wt%)")?;
        writeln!(f, "    sum:  {:.4}", self.cn_equ_sum)?;
        writeln!(f, "    mean: {:.4}", self.cn_equ_mean)?;
        writeln!(f, "    std:  {:.4}", self.cn_equ_std)?;
        writeln!(f, "    min:  {:.4}", self.cn_equ_min)?;
        write!(f, "    max:  {:.4}", self.cn_equ_max)?;
        if let (Some(solid), Some(liquid)) = (self.solid_enrichment, self.liquid_enrichment) {
            writeln!(f)?;
            writeln!(f, "  Solid enrichment (C/C0):  {:.4}", solid)?;
            write!(f, "  Liquid enrichment (C/C0): {:.4}", liquid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tiny_result() -> SimulationResult {
        let mut simulation = DendriteSimulation::new(
            SimulationConfig::default().with_grid(9, 9).with_steps(1),
            MaterialConstants::default(),
        )
        .unwrap();
        simulation.run();
        simulation.into_result()
    }

    #[test]
    fn test_result_fields() {
        let result = tiny_result();

        assert_eq!(result.steps_run, 1);
        assert_eq!(result.seed_site, (4, 4));
        assert_relative_eq!(result.final_solid_fraction, 9.0 / 81.0, max_relative = 1e-12);

        // Solid cells report k·CN, liquid cells CN
        let k = result.material.partition_coefficient;
        assert_relative_eq!(result.cn_equ.get(4, 4), k * result.cn.get(4, 4), max_relative = 1e-12);
        assert_eq!(result.cn_equ.get(0, 0), result.cn.get(0, 0));
    }

    #[test]
    fn test_summary_statistics() {
        let result = tiny_result();
        let summary = result.summary();

        assert_eq!(summary.solid_cells, 9);
        assert_eq!(summary.total_cells, 81);
        assert_relative_eq!(summary.cn_equ_mean, result.cn_equ.sum() / 81.0, max_relative = 1e-12);
        assert!(summary.cn_equ_min <= summary.cn_equ_mean);
        assert!(summary.cn_equ_max >= summary.cn_equ_mean);
        assert!(summary.cn_equ_std > 0.0);

        // Partitioning leaves the solid depleted and the liquid enriched
        assert!(summary.solid_enrichment.unwrap() < 1.0);
        assert!(summary.liquid_enrichment.unwrap() >= 1.0);

        let text = summary.to_string();
        assert!(text.contains("Final solid fraction"));
        assert!(text.contains("Liquid enrichment"));
    }

    #[test]
    fn test_summary_without_solid_has_no_enrichment() {
        let mut result = tiny_result();
        result.map.fill(0.0);
        let summary = SimulationSummary::from_result(&result);
        assert_eq!(summary.solid_enrichment, None);
        assert!(!summary.to_string().contains("enrichment"));
    }

    #[test]
    fn test_save_and_load_json() {
        let result = tiny_result();
        let path = std::env::temp_dir().join(format!("dendrite_result_{}.json", std::process::id()));

        result.save_json(&path).unwrap();
        let loaded = SimulationResult::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.steps_run, result.steps_run);
        assert_eq!(loaded.map, result.map);
        assert_eq!(loaded.seed_site, result.seed_site);
        assert_relative_eq!(loaded.total_time, result.total_time, max_relative = 1e-12);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let result = tiny_result();
        let err = result
            .save_json("/nonexistent-dir/result.json")
            .unwrap_err();
        assert!(matches!(err, SimError::Export { .. }));
    }
}
