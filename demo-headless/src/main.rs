use clap::Parser;
use dendrite_sim_core::{
    run_orientation_sweep, run_simulation, MaterialConstants, NucleationSite, Preset, SimError,
    SimulationConfig, SimulationSummary,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Headless dendritic solidification runner
#[derive(Parser, Debug)]
#[command(name = "dendrite-headless")]
#[command(about = "2D CA-FD dendrite growth in an undercooled binary alloy", long_about = None)]
struct Args {
    /// Configuration preset (standard, quick-test, high-resolution, fast-growth, rotated-crystal, strong-anisotropy)
    #[arg(short, long, default_value_t = Preset::Standard)]
    preset: Preset,

    /// Load the configuration from a JSON file instead of a preset
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Material constants JSON file (defaults to Al-3 wt% Cu)
    #[arg(short, long)]
    material: Option<PathBuf>,

    /// Square grid size in cells
    #[arg(long)]
    size: Option<usize>,

    /// Number of timesteps
    #[arg(short = 'n', long)]
    steps: Option<usize>,

    /// Crystal orientation in degrees
    #[arg(short, long)]
    angle: Option<f64>,

    /// Undercooling in K
    #[arg(short, long)]
    undercooling: Option<f64>,

    /// Anisotropy strength δk
    #[arg(long)]
    anisotropy: Option<f64>,

    /// Seed row (requires --seed-y)
    #[arg(long, requires = "seed_y")]
    seed_x: Option<usize>,

    /// Seed column (requires --seed-x)
    #[arg(long, requires = "seed_x")]
    seed_y: Option<usize>,

    /// Place the seed at a random interior cell drawn from this RNG seed
    #[arg(long, conflicts_with_all = ["seed_x", "seed_y"])]
    random_seed: Option<u64>,

    /// Progress log interval in steps
    #[arg(long)]
    progress_interval: Option<usize>,

    /// Compare several crystal orientations (comma-separated degrees)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    compare_angles: Vec<f64>,

    /// Write the result (or one result per angle) as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn build_config(&self) -> Result<SimulationConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)?,
            None => self.preset.config(),
        };

        if let Some(size) = self.size {
            config = config.with_grid(size, size);
        }
        if let Some(steps) = self.steps {
            config = config.with_steps(steps);
        }
        if let Some(angle) = self.angle {
            config = config.with_crystal_angle(angle);
        }
        if let Some(undercooling) = self.undercooling {
            config = config.with_undercooling(undercooling);
        }
        if let Some(anisotropy) = self.anisotropy {
            config = config.with_anisotropy(anisotropy);
        }
        if let (Some(x), Some(y)) = (self.seed_x, self.seed_y) {
            config = config.with_site(NucleationSite::At { x, y });
        }
        if let Some(seed) = self.random_seed {
            config = config.with_site(NucleationSite::Random { seed });
        }
        if let Some(interval) = self.progress_interval {
            config = config.with_progress_interval(interval);
        }

        config.validate()?;
        Ok(config)
    }

    fn load_material(&self) -> Result<MaterialConstants, SimError> {
        match &self.material {
            Some(path) => Ok(MaterialConstants::load(path)?),
            None => Ok(MaterialConstants::default()),
        }
    }
}

fn print_config(config: &SimulationConfig, material: &MaterialConstants) {
    println!("=== Dendritic Solidification ===\n");
    println!(
        "Grid: {}x{} cells, Lc = {:.3e} m",
        config.domain.sizex, config.domain.sizey, config.domain.grid_spacing
    );
    println!(
        "Time: {} steps, dt0 = {:.2e} s, CFL factor = {:.1}",
        config.time.num_steps, config.time.initial_dt, config.time.cfl_factor
    );
    println!(
        "Physics: ΔT = {:.1} K, δk = {:.2}, b0 = {:.2}, angle = {:.1}°",
        config.physical.undercooling,
        config.physical.anisotropy,
        config.physical.geometric_factor,
        config.nucleation.crystal_angle
    );
    println!(
        "Alloy: C0 = {:.2} wt%, k = {:.3}, ml = {:.2} K/wt%, D_l = {:.2e} m²/s\n",
        material.initial_concentration,
        material.partition_coefficient,
        material.liquidus_slope,
        material.liquid_diffusivity
    );
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = args.build_config()?;
    let material = args.load_material()?;
    print_config(&config, &material);

    if args.compare_angles.is_empty() {
        let result = run_simulation(config, material)?;
        println!("{}\n", SimulationSummary::from_result(&result));
        println!("Solute balance error: {:.3e}", result.solute_balance_error());

        if let Some(path) = &args.output {
            result.save_json(path)?;
            println!("Result written to {}", path.display());
        }
        return Ok(());
    }

    let results = run_orientation_sweep(config, material, &args.compare_angles)?;

    println!("{:>10} {:>14} {:>14} {:>12}", "angle (°)", "solid frac", "total t (s)", "CN_Equ max");
    for result in &results {
        let summary = result.summary();
        println!(
            "{:>10.1} {:>14.5} {:>14.4e} {:>12.4}",
            result.config.nucleation.crystal_angle,
            summary.final_solid_fraction,
            summary.total_time,
            summary.cn_equ_max
        );
    }

    if let Some(path) = &args.output {
        for result in &results {
            let angle_path = angle_output_path(path, result.config.nucleation.crystal_angle);
            result.save_json(&angle_path)?;
            println!("Result written to {}", angle_path.display());
        }
    }

    Ok(())
}

/// `out.json` + 45° → `out_45deg.json`
fn angle_output_path(path: &std::path::Path, angle: f64) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "result".into(), |s| s.to_string_lossy().into_owned());
    let extension = path
        .extension()
        .map_or_else(|| "json".into(), |e| e.to_string_lossy().into_owned());
    path.with_file_name(format!("{stem}_{angle}deg.{extension}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_preset() {
        let args = Args::parse_from([
            "dendrite-headless",
            "--preset",
            "quick-test",
            "--steps",
            "10",
            "--angle",
            "30",
            "--seed-x",
            "5",
            "--seed-y",
            "6",
        ]);
        let config = args.build_config().unwrap();

        assert_eq!(config.domain.sizex, 50);
        assert_eq!(config.time.num_steps, 10);
        assert_eq!(config.nucleation.crystal_angle, 30.0);
        assert_eq!(config.nucleation.site, NucleationSite::At { x: 5, y: 6 });
    }

    #[test]
    fn test_compare_angles_list() {
        let args = Args::parse_from(["dendrite-headless", "--compare-angles", "0,45,90"]);
        assert_eq!(args.compare_angles, vec![0.0, 45.0, 90.0]);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = Args::parse_from(["dendrite-headless", "--size", "2"]);
        assert!(args.build_config().is_err());
    }

    #[test]
    fn test_angle_output_path() {
        let path = angle_output_path(std::path::Path::new("/tmp/run.json"), 45.0);
        assert_eq!(path, PathBuf::from("/tmp/run_45deg.json"));
    }
}
