//! Dendrite growth simulation driver
//!
//! [`DendriteSimulation`] owns the grid state and runs the solver passes in a
//! fixed order once per step:
//!
//! 1. Interface detection
//! 2. Geometry and curvature undercooling
//! 3. Solute diffusion (with stability advisory)
//! 4. Interface kinetics
//! 5. CFL timestep selection
//! 6. Velocity reset and concentration snapshot

mod result;
mod sweep;

pub use result::{SimulationResult, SimulationSummary};
pub use sweep::{run_orientation_sweep, run_sweep};

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::material::MaterialConstants;
use crate::solver::{
    detect_interface, seed_nucleus, select_time_step, step_geometry, step_kinetics,
    step_solute_diffusion, DiffusionParams, GeometryParams, GridState, KineticsInputs,
    KineticsParams,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Diagnostics for one completed step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// 1-based step number
    pub step: usize,
    /// Timestep this step was integrated with (s)
    pub dt_used: f64,
    /// Timestep selected for the next step (s)
    pub dt_next: f64,
    /// Peak velocity seen by the CFL update (m/s)
    pub max_velocity: f64,
    /// Interface cells processed
    pub interface_cells: usize,
    /// Fully solid cells after the step
    pub solid_cells: usize,
    /// Solute rejected into the liquid during the step
    pub rejected_solute: f64,
    /// Whether `dt_used` exceeded the diffusion stability bound
    pub stability_exceeded: bool,
}

/// Single-seed dendrite growth simulation
#[derive(Debug)]
pub struct DendriteSimulation {
    config: SimulationConfig,
    material: MaterialConstants,
    state: GridState,
    seed_site: (usize, usize),

    /// Timestep for the next step
    dt: f64,
    total_time: f64,
    steps_run: usize,
    stability_warnings: usize,
    total_rejected_solute: f64,
}

impl DendriteSimulation {
    /// Validate inputs, allocate the grid, and place the seed crystal
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] or [`SimError::Material`] when validation
    /// fails. Nothing is allocated for an invalid configuration.
    pub fn new(config: SimulationConfig, material: MaterialConstants) -> Result<Self, SimError> {
        config.validate()?;
        material.validate()?;

        let mut state = GridState::new(config.domain.sizex, config.domain.sizey, &material)?;
        let seed_site = seed_nucleus(
            &mut state,
            config.nucleation.site,
            config.nucleation.crystal_angle,
        )?;

        info!(
            "Dendrite simulation initialized: {}x{} grid, Lc={:.3e} m, seed at ({}, {}), angle={:.1}°",
            config.domain.sizex,
            config.domain.sizey,
            config.domain.grid_spacing,
            seed_site.0,
            seed_site.1,
            config.nucleation.crystal_angle
        );
        info!(
            "Physics: ΔT={:.1} K, δk={:.2}, b0={:.2}, C0={:.2} wt%, k={:.3}",
            config.physical.undercooling,
            config.physical.anisotropy,
            config.physical.geometric_factor,
            material.initial_concentration,
            material.partition_coefficient
        );

        Ok(Self {
            dt: config.time.initial_dt,
            config,
            material,
            state,
            seed_site,
            total_time: 0.0,
            steps_run: 0,
            stability_warnings: 0,
            total_rejected_solute: 0.0,
        })
    }

    /// Advance the simulation by one step
    pub fn step(&mut self) -> StepReport {
        let dt_used = self.dt;
        let cell_size = self.config.domain.grid_spacing;
        let physical = self.config.physical;
        let material = self.material;
        let s = &mut self.state;

        // 1. Interface detection
        let interface_cells = detect_interface(&s.map, &mut s.gb);

        // 2. Geometry and curvature
        step_geometry(
            &s.gb,
            &s.map,
            &s.fs,
            &mut s.gvn,
            &mut s.g,
            &mut s.fhi,
            &mut s.tcur,
            GeometryParams {
                cell_size,
                geometric_factor: physical.geometric_factor,
                anisotropy: physical.anisotropy,
                gibbs_thomson: material.gibbs_thomson,
            },
        );

        // 3. Solute diffusion
        let stability = step_solute_diffusion(
            &s.cn_old,
            &s.d,
            &mut s.cn,
            DiffusionParams {
                dt: dt_used,
                cell_size,
            },
        );

        // 4. Kinetics
        let kinetics = step_kinetics(
            &KineticsInputs {
                gb: &s.gb,
                g: &s.g,
                gvn: &s.gvn,
                fhi: &s.fhi,
                tcur: &s.tcur,
                cn_old: &s.cn_old,
            },
            &mut s.fs,
            &mut s.map,
            &mut s.cn,
            &mut s.cn_s,
            &mut s.d,
            &mut s.vel,
            KineticsParams {
                dt: dt_used,
                cell_size,
                anisotropy: physical.anisotropy,
                undercooling: physical.undercooling,
                kinetic_coefficient: material.kinetic_coefficient,
                initial_concentration: material.initial_concentration,
                liquidus_slope: material.liquidus_slope,
                partition_coefficient: material.partition_coefficient,
                solid_diffusivity: material.solid_diffusivity,
            },
        );

        // 5. Adaptive timestep
        let time_step = select_time_step(&s.vel, dt_used, cell_size, self.config.time.cfl_factor);

        // 6. Prepare for the next step
        s.reset_velocity();
        s.snapshot_concentration();

        self.dt = time_step.dt;
        self.total_time += dt_used;
        self.steps_run += 1;
        self.total_rejected_solute += kinetics.rejected_solute;
        if stability.exceeded {
            self.stability_warnings += 1;
        }

        let report = StepReport {
            step: self.steps_run,
            dt_used,
            dt_next: time_step.dt,
            max_velocity: time_step.max_velocity,
            interface_cells,
            solid_cells: self.state.solid_cells(),
            rejected_solute: kinetics.rejected_solute,
            stability_exceeded: stability.exceeded,
        };

        debug!(
            "Step {}: dt={:.3e}s, interface={}, solidified={}, solid={}, rejected={:.4e}",
            report.step,
            dt_used,
            interface_cells,
            kinetics.solidified_cells,
            report.solid_cells,
            kinetics.rejected_solute
        );

        if self.is_progress_step(report.step) {
            info!(
                "Step {}/{}: solid fraction={:.4}, max velocity={:.4e} m/s, dt={:.3e}s",
                report.step,
                self.config.time.num_steps,
                self.state.solid_fraction(),
                report.max_velocity,
                report.dt_next
            );
        }

        report
    }

    /// Run all remaining configured steps
    pub fn run(&mut self) {
        while !self.is_finished() {
            self.step();
        }
        info!(
            "Simulation complete: {} steps, t={:.4e}s, solid fraction={:.4}, stability warnings={}",
            self.steps_run,
            self.total_time,
            self.state.solid_fraction(),
            self.stability_warnings
        );
    }

    /// Consume the simulation and package its final state
    pub fn into_result(self) -> SimulationResult {
        SimulationResult::from_simulation(self)
    }

    fn is_progress_step(&self, step: usize) -> bool {
        let interval = self.config.output.progress_interval;
        step == 1
            || step == self.config.time.num_steps
            || (interval > 0 && step % interval == 0)
    }

    /// Whether the configured number of steps has been run
    pub fn is_finished(&self) -> bool {
        self.steps_run >= self.config.time.num_steps
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn material(&self) -> &MaterialConstants {
        &self.material
    }

    /// Resolved seed coordinates `(row, column)`
    pub fn seed_site(&self) -> (usize, usize) {
        self.seed_site
    }

    /// Simulated time in seconds
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Timestep the next call to [`Self::step`] will use
    pub fn current_dt(&self) -> f64 {
        self.dt
    }

    pub fn steps_run(&self) -> usize {
        self.steps_run
    }

    /// Steps whose timestep exceeded the diffusion stability bound
    pub fn stability_warnings(&self) -> usize {
        self.stability_warnings
    }

    /// Solute rejected into the liquid over all steps so far
    pub fn total_rejected_solute(&self) -> f64 {
        self.total_rejected_solute
    }
}

/// Build, run, and package one simulation
///
/// # Errors
///
/// Returns the construction error of [`DendriteSimulation::new`].
pub fn run_simulation(
    config: SimulationConfig,
    material: MaterialConstants,
) -> Result<SimulationResult, SimError> {
    let mut simulation = DendriteSimulation::new(config, material)?;
    simulation.run();
    Ok(simulation.into_result())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use approx::assert_relative_eq;

    fn small_config(steps: usize) -> SimulationConfig {
        SimulationConfig::default()
            .with_grid(21, 21)
            .with_steps(steps)
            .with_progress_interval(10)
    }

    #[test]
    fn test_new_seeds_center() {
        let sim = DendriteSimulation::new(small_config(5), MaterialConstants::default()).unwrap();
        assert_eq!(sim.seed_site(), (10, 10));
        assert_eq!(sim.state().solid_cells(), 1);
        assert_eq!(sim.current_dt(), 1e-5);
        assert_eq!(sim.steps_run(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = DendriteSimulation::new(small_config(0), MaterialConstants::default())
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Config(ConfigError::ZeroSteps)));

        let material = MaterialConstants {
            partition_coefficient: 2.0,
            ..MaterialConstants::default()
        };
        assert!(matches!(
            DendriteSimulation::new(small_config(5), material),
            Err(SimError::Material(_))
        ));
    }

    #[test]
    fn test_first_step() {
        let mut sim =
            DendriteSimulation::new(small_config(5), MaterialConstants::default()).unwrap();
        let report = sim.step();

        assert_eq!(report.step, 1);
        assert_eq!(report.dt_used, 1e-5);
        assert_eq!(report.interface_cells, 8);
        // The initial 1 m/s reference velocity bounds the first adaptive step
        assert_eq!(report.max_velocity, 1.0);
        assert_relative_eq!(report.dt_next, 0.25e-6 / 5.0, max_relative = 1e-12);
        // dt = 1e-5 s is far beyond Lc²/(4·D_l)
        assert!(report.stability_exceeded);
        assert!(report.rejected_solute > 0.0);
        // The oversized first step solidifies the whole Moore ring
        assert_eq!(report.solid_cells, 9);

        assert_eq!(sim.total_time(), 1e-5);
        assert_eq!(sim.stability_warnings(), 1);
        assert_eq!(sim.state().vel.max(), 0.0);
        assert_eq!(sim.state().cn, sim.state().cn_old);
    }

    #[test]
    fn test_total_time_accumulates_used_steps() {
        let mut sim =
            DendriteSimulation::new(small_config(10), MaterialConstants::default()).unwrap();
        let mut expected = 0.0;
        let mut previous_next = sim.current_dt();
        for _ in 0..10 {
            let report = sim.step();
            assert_eq!(report.dt_used, previous_next);
            previous_next = report.dt_next;
            expected += report.dt_used;
        }
        assert_relative_eq!(sim.total_time(), expected, max_relative = 1e-12);
        assert!(sim.is_finished());
    }

    #[test]
    fn test_run_simulation_result() {
        let result = run_simulation(small_config(30), MaterialConstants::default()).unwrap();

        assert_eq!(result.steps_run, 30);
        assert_eq!(result.fs.sizex, 21);
        assert!(result.final_solid_fraction > 9.0 / 441.0);
        assert_eq!(result.stability_warnings, 1);
        assert!(result.total_time > 0.0);
        assert_eq!(result.config, small_config(30));
    }
}
