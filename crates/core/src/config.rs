//! Simulation configuration and presets
//!
//! A [`SimulationConfig`] fully describes one run apart from the alloy. It is
//! plain data: serde round-trips it to JSON, and [`SimulationConfig::validate`]
//! rejects anything the solver cannot run before a grid is allocated.

use crate::error::{ConfigError, SimError};
use crate::solver::NucleationSite;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Grid extent and resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Number of rows
    pub sizex: usize,
    /// Number of columns
    pub sizey: usize,
    /// Cell size Lc in meters
    pub grid_spacing: f64,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            sizex: 75,
            sizey: 75,
            grid_spacing: 0.25e-6,
        }
    }
}

/// Time integration controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Number of timesteps to run
    pub num_steps: usize,
    /// Timestep for the first step in seconds
    pub initial_dt: f64,
    /// CFL safety factor: the fastest interface moves at most `1/cfl` cells per step
    pub cfl_factor: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            num_steps: 400,
            initial_dt: 1e-5,
            cfl_factor: 5.0,
        }
    }
}

/// Seed crystal placement and orientation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NucleationConfig {
    /// Seed location
    pub site: NucleationSite,
    /// Crystal orientation in degrees
    pub crystal_angle: f64,
}

/// Thermal and interface parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConfig {
    /// Applied undercooling ΔT in K
    pub undercooling: f64,
    /// Base geometric factor b0
    pub geometric_factor: f64,
    /// Four-fold anisotropy strength δk
    pub anisotropy: f64,
}

impl Default for PhysicalConfig {
    fn default() -> Self {
        Self {
            undercooling: 15.0,
            geometric_factor: 0.4,
            anisotropy: 0.3,
        }
    }
}

/// Progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Log a progress line every this many steps (0 = first and last only)
    pub progress_interval: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            progress_interval: 100,
        }
    }
}

/// Complete description of one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub domain: DomainConfig,
    pub time: TimeConfig,
    pub nucleation: NucleationConfig,
    pub physical: PhysicalConfig,
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Small grid for smoke tests: 50×50, 200 steps
    #[must_use]
    pub fn quick_test() -> Self {
        Self::default().with_grid(50, 50).with_steps(200)
    }

    /// Fine grid: 150×150 at 0.1 µm, 600 steps, Δt₀ = 5 µs
    #[must_use]
    pub fn high_resolution() -> Self {
        let mut config = Self::default()
            .with_grid(150, 150)
            .with_grid_spacing(0.1e-6)
            .with_steps(600);
        config.time.initial_dt = 5e-6;
        config
    }

    /// Doubled undercooling (30 K), 300 steps
    #[must_use]
    pub fn fast_growth() -> Self {
        Self::default().with_steps(300).with_undercooling(30.0)
    }

    /// Crystal rotated by 45°
    #[must_use]
    pub fn rotated_crystal() -> Self {
        Self::default().with_crystal_angle(45.0)
    }

    /// δk = 0.5
    #[must_use]
    pub fn strong_anisotropy() -> Self {
        Self::default().with_anisotropy(0.5)
    }

    pub fn with_grid(mut self, sizex: usize, sizey: usize) -> Self {
        self.domain.sizex = sizex;
        self.domain.sizey = sizey;
        self
    }

    pub fn with_grid_spacing(mut self, grid_spacing: f64) -> Self {
        self.domain.grid_spacing = grid_spacing;
        self
    }

    pub fn with_steps(mut self, num_steps: usize) -> Self {
        self.time.num_steps = num_steps;
        self
    }

    pub fn with_site(mut self, site: NucleationSite) -> Self {
        self.nucleation.site = site;
        self
    }

    pub fn with_crystal_angle(mut self, crystal_angle: f64) -> Self {
        self.nucleation.crystal_angle = crystal_angle;
        self
    }

    pub fn with_undercooling(mut self, undercooling: f64) -> Self {
        self.physical.undercooling = undercooling;
        self
    }

    pub fn with_anisotropy(mut self, anisotropy: f64) -> Self {
        self.physical.anisotropy = anisotropy;
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: usize) -> Self {
        self.output.progress_interval = progress_interval;
        self
    }

    /// Check every parameter the solver depends on
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking the grid, then the
    /// time controls, then the physics, then the nucleation site.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let DomainConfig {
            sizex,
            sizey,
            grid_spacing,
        } = self.domain;

        if sizex == 0 || sizey == 0 {
            return Err(ConfigError::InvalidGrid { sizex, sizey });
        }
        positive("grid_spacing", grid_spacing)?;

        if self.time.num_steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        positive("initial_dt", self.time.initial_dt)?;
        positive("cfl_factor", self.time.cfl_factor)?;

        finite("undercooling", self.physical.undercooling)?;
        positive("geometric_factor", self.physical.geometric_factor)?;
        let anisotropy = self.physical.anisotropy;
        if !anisotropy.is_finite() || anisotropy < 0.0 {
            return Err(ConfigError::InvalidAnisotropy(anisotropy));
        }

        finite("crystal_angle", self.nucleation.crystal_angle)?;
        self.nucleation.site.resolve(sizex, sizey)?;

        Ok(())
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigParse`] on malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(SimError::ConfigParse)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigRead`] if the file cannot be read and
    /// [`SimError::ConfigParse`] if it is not valid JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Save as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Serialize`] or [`SimError::Export`] on failure.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SimError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self).map_err(SimError::Serialize)?;
        fs::write(path, contents).map_err(|source| SimError::Export {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name })
    }
}

/// Named configuration presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    /// 75×75, 400 steps, ΔT = 15 K, δk = 0.3
    #[default]
    Standard,
    QuickTest,
    HighResolution,
    FastGrowth,
    RotatedCrystal,
    StrongAnisotropy,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Standard,
        Preset::QuickTest,
        Preset::HighResolution,
        Preset::FastGrowth,
        Preset::RotatedCrystal,
        Preset::StrongAnisotropy,
    ];

    /// Configuration for this preset
    #[must_use]
    pub fn config(self) -> SimulationConfig {
        match self {
            Self::Standard => SimulationConfig::default(),
            Self::QuickTest => SimulationConfig::quick_test(),
            Self::HighResolution => SimulationConfig::high_resolution(),
            Self::FastGrowth => SimulationConfig::fast_growth(),
            Self::RotatedCrystal => SimulationConfig::rotated_crystal(),
            Self::StrongAnisotropy => SimulationConfig::strong_anisotropy(),
        }
    }

    /// Canonical `snake_case` name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::QuickTest => "quick_test",
            Self::HighResolution => "high_resolution",
            Self::FastGrowth => "fast_growth",
            Self::RotatedCrystal => "rotated_crystal",
            Self::StrongAnisotropy => "strong_anisotropy",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    /// Case-insensitive; `-` and `_` are interchangeable
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!((config.domain.sizex, config.domain.sizey), (75, 75));
        assert_eq!(config.domain.grid_spacing, 0.25e-6);
        assert_eq!(config.time.num_steps, 400);
        assert_eq!(config.time.initial_dt, 1e-5);
        assert_eq!(config.time.cfl_factor, 5.0);
        assert_eq!(config.nucleation.site, NucleationSite::Center);
        assert_eq!(config.nucleation.crystal_angle, 0.0);
        assert_eq!(config.physical.undercooling, 15.0);
        assert_eq!(config.physical.geometric_factor, 0.4);
        assert_eq!(config.physical.anisotropy, 0.3);
        assert_eq!(config.output.progress_interval, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_differ_only_where_named() {
        let base = SimulationConfig::default();

        let quick = SimulationConfig::quick_test();
        assert_eq!((quick.domain.sizex, quick.time.num_steps), (50, 200));
        assert_eq!(quick.physical, base.physical);

        let fine = SimulationConfig::high_resolution();
        assert_eq!(fine.domain.sizex, 150);
        assert_eq!(fine.domain.grid_spacing, 0.1e-6);
        assert_eq!(fine.time.initial_dt, 5e-6);
        assert_eq!(fine.time.num_steps, 600);

        let fast = SimulationConfig::fast_growth();
        assert_eq!(fast.physical.undercooling, 30.0);
        assert_eq!(fast.time.num_steps, 300);

        assert_eq!(SimulationConfig::rotated_crystal().nucleation.crystal_angle, 45.0);
        assert_eq!(SimulationConfig::strong_anisotropy().physical.anisotropy, 0.5);

        for preset in Preset::ALL {
            assert!(preset.config().validate().is_ok(), "{preset}");
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("quick_test".parse::<Preset>().unwrap(), Preset::QuickTest);
        assert_eq!("High-Resolution".parse::<Preset>().unwrap(), Preset::HighResolution);
        assert_eq!(
            "tiny".parse::<Preset>().unwrap_err(),
            ConfigError::UnknownPreset("tiny".to_string())
        );
        for preset in Preset::ALL {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_validation_errors() {
        let base = SimulationConfig::default();

        assert_eq!(
            base.with_grid(0, 10).validate(),
            Err(ConfigError::InvalidGrid { sizex: 0, sizey: 10 })
        );
        assert_eq!(
            base.with_grid(2, 10).validate(),
            Err(ConfigError::NoInterior { sizex: 2, sizey: 10 })
        );
        assert_eq!(base.with_steps(0).validate(), Err(ConfigError::ZeroSteps));
        assert_eq!(
            base.with_grid_spacing(-1.0).validate(),
            Err(ConfigError::NonPositive {
                name: "grid_spacing",
                value: -1.0
            })
        );
        assert_eq!(
            base.with_anisotropy(-0.1).validate(),
            Err(ConfigError::InvalidAnisotropy(-0.1))
        );
        assert_eq!(
            base.with_undercooling(f64::NAN).validate(),
            Err(ConfigError::NonFinite {
                name: "undercooling"
            })
        );
        assert!(matches!(
            base.with_site(NucleationSite::At { x: 80, y: 3 }).validate(),
            Err(ConfigError::NucleationOutOfBounds { x: 80, .. })
        ));

        let mut zero_cfl = base;
        zero_cfl.time.cfl_factor = 0.0;
        assert!(matches!(
            zero_cfl.validate(),
            Err(ConfigError::NonPositive {
                name: "cfl_factor",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{ "domain": { "sizex": 40 }, "nucleation": { "site": { "at": { "x": 5, "y": 6 } } } }"#,
        )
        .unwrap();

        assert_eq!(config.domain.sizex, 40);
        assert_eq!(config.domain.sizey, 75);
        assert_eq!(config.nucleation.site, NucleationSite::At { x: 5, y: 6 });
        assert_eq!(config.time, TimeConfig::default());

        assert!(matches!(
            SimulationConfig::from_json_str("{ not json"),
            Err(SimError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "dendrite_config_{}.json",
            std::process::id()
        ));
        let config = SimulationConfig::rotated_crystal().with_site(NucleationSite::Random { seed: 7 });

        config.save(&path).unwrap();
        let loaded = SimulationConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.nucleation, config.nucleation);
        assert_eq!(loaded.domain.sizex, config.domain.sizex);
        assert_eq!(loaded.time.num_steps, config.time.num_steps);
        assert_relative_eq!(loaded.domain.grid_spacing, config.domain.grid_spacing, max_relative = 1e-12);
        assert_relative_eq!(loaded.time.initial_dt, config.time.initial_dt, max_relative = 1e-12);
    }
}
