//! Binary alloy material constants
//!
//! The JSON form uses the short keys of the classic constants file
//! (`T_b`, `mu_k`, `C0`, `ml`, `P_C`, `D_l`, `D_s`).

use crate::error::MaterialError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Thermophysical properties of the alloy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialConstants {
    /// Gibbs-Thomson coefficient Γ (K·m)
    #[serde(rename = "T_b")]
    pub gibbs_thomson: f64,
    /// Interface kinetic coefficient μk (m/(s·K))
    #[serde(rename = "mu_k")]
    pub kinetic_coefficient: f64,
    /// Initial alloy concentration C0 (wt%)
    #[serde(rename = "C0")]
    pub initial_concentration: f64,
    /// Liquidus slope ml (K/wt%), negative for a eutectic-side alloy
    #[serde(rename = "ml")]
    pub liquidus_slope: f64,
    /// Equilibrium partition coefficient k
    #[serde(rename = "P_C")]
    pub partition_coefficient: f64,
    /// Solute diffusivity in the liquid (m²/s)
    #[serde(rename = "D_l")]
    pub liquid_diffusivity: f64,
    /// Solute diffusivity in the solid (m²/s)
    #[serde(rename = "D_s")]
    pub solid_diffusivity: f64,
}

impl Default for MaterialConstants {
    /// Al-3 wt% Cu
    fn default() -> Self {
        Self {
            gibbs_thomson: 2.4e-7,
            kinetic_coefficient: 1e-2,
            initial_concentration: 3.0,
            liquidus_slope: -3.36,
            partition_coefficient: 0.17,
            liquid_diffusivity: 3e-9,
            solid_diffusivity: 3e-13,
        }
    }
}

impl MaterialConstants {
    /// Parse and validate constants from a JSON string
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::Parse`] for malformed JSON or missing keys,
    /// or the first validation failure.
    pub fn from_json_str(json: &str) -> Result<Self, MaterialError> {
        let material: Self = serde_json::from_str(json)?;
        material.validate()?;
        Ok(material)
    }

    /// Load and validate a constants file
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::Read`] if the file cannot be read, otherwise
    /// as [`MaterialConstants::from_json_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MaterialError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| MaterialError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Check physical admissibility
    ///
    /// # Errors
    ///
    /// - [`MaterialError::NonFinite`] for any NaN or infinite value
    /// - [`MaterialError::InvalidPartitionCoefficient`] unless `0 < k < 1`
    /// - [`MaterialError::NonPositive`] for a non-positive diffusivity,
    ///   concentration, kinetic or Gibbs-Thomson coefficient
    pub fn validate(&self) -> Result<(), MaterialError> {
        let fields = [
            ("gibbs_thomson", self.gibbs_thomson),
            ("kinetic_coefficient", self.kinetic_coefficient),
            ("initial_concentration", self.initial_concentration),
            ("liquidus_slope", self.liquidus_slope),
            ("partition_coefficient", self.partition_coefficient),
            ("liquid_diffusivity", self.liquid_diffusivity),
            ("solid_diffusivity", self.solid_diffusivity),
        ];
        if let Some(&(name, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(MaterialError::NonFinite { name });
        }

        let k = self.partition_coefficient;
        if k <= 0.0 || k >= 1.0 {
            return Err(MaterialError::InvalidPartitionCoefficient(k));
        }

        for (name, value) in [
            ("liquid_diffusivity", self.liquid_diffusivity),
            ("solid_diffusivity", self.solid_diffusivity),
            ("initial_concentration", self.initial_concentration),
            ("kinetic_coefficient", self.kinetic_coefficient),
            ("gibbs_thomson", self.gibbs_thomson),
        ] {
            if value <= 0.0 {
                return Err(MaterialError::NonPositive { name, value });
            }
        }

        Ok(())
    }
}
