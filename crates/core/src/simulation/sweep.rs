//! Parallel parameter sweeps
//!
//! Each run is independent, so sweeps fan out over the rayon pool. Results
//! come back in input order.

use super::{run_simulation, SimulationResult};
use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::material::MaterialConstants;
use rayon::prelude::*;
use tracing::info;

/// Run every configuration with the same material
///
/// # Errors
///
/// Returns the first error in input order if any configuration is invalid.
pub fn run_sweep(
    configs: &[SimulationConfig],
    material: MaterialConstants,
) -> Result<Vec<SimulationResult>, SimError> {
    info!("Running sweep of {} simulations", configs.len());
    configs
        .par_iter()
        .map(|config| run_simulation(*config, material))
        .collect()
}

/// Run one simulation per crystal orientation, otherwise identical
///
/// # Errors
///
/// As [`run_sweep`].
pub fn run_orientation_sweep(
    config: SimulationConfig,
    material: MaterialConstants,
    angles: &[f64],
) -> Result<Vec<SimulationResult>, SimError> {
    let configs: Vec<SimulationConfig> = angles
        .iter()
        .map(|&angle| config.with_crystal_angle(angle))
        .collect();
    run_sweep(&configs, material)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_preserves_order() {
        let base = SimulationConfig::default().with_grid(15, 15).with_steps(5);
        let results =
            run_orientation_sweep(base, MaterialConstants::default(), &[0.0, 30.0, 45.0]).unwrap();

        let angles: Vec<f64> = results
            .iter()
            .map(|r| r.config.nucleation.crystal_angle)
            .collect();
        assert_eq!(angles, vec![0.0, 30.0, 45.0]);
        assert_eq!(results[1].seed_site, (8, 8));
        assert_eq!(results[1].fhi.get(8, 8), 30.0);
    }

    #[test]
    fn test_sweep_matches_serial_runs() {
        let configs = [
            SimulationConfig::default().with_grid(13, 13).with_steps(4),
            SimulationConfig::default()
                .with_grid(13, 13)
                .with_steps(4)
                .with_undercooling(25.0),
        ];
        let parallel = run_sweep(&configs, MaterialConstants::default()).unwrap();
        for (config, result) in configs.iter().zip(&parallel) {
            let serial = run_simulation(*config, MaterialConstants::default()).unwrap();
            assert_eq!(&serial, result);
        }
    }

    #[test]
    fn test_invalid_member_fails_sweep() {
        let configs = [
            SimulationConfig::default().with_grid(13, 13).with_steps(2),
            SimulationConfig::default().with_steps(0),
        ];
        assert!(run_sweep(&configs, MaterialConstants::default()).is_err());
    }
}
