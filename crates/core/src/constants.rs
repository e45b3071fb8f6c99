//! Physical and numerical constants shared by the solver passes
//!
//! Everything here is a compile-time constant with explicit units. Material
//! properties are not constants; they live in [`crate::MaterialConstants`].

use std::f64::consts::PI;

/// Degree to radian conversion factor
pub const DEG_TO_RAD: f64 = PI / 180.0;

/// Radian to degree conversion factor
pub const RAD_TO_DEG: f64 = 180.0 / PI;

/// Order of the crystallographic symmetry (cubic crystals: four-fold)
pub const FOUR_FOLD_SYMMETRY: f64 = 4.0;

/// Distance to a diagonal neighbour in cell units
///
/// Diagonal neighbours contribute `b0 / √2` to the geometric factor.
pub const DIAGONAL_DISTANCE: f64 = std::f64::consts::SQRT_2;

/// Number of cells in the 3×3 Moore block used by the curvature average
pub const NEIGHBORHOOD_CELLS: f64 = 9.0;

/// Slack applied to the explicit diffusion stability bound `Lc²/(4·D_max)`
///
/// A timestep is flagged only when it exceeds the bound by more than 10%.
pub const STABILITY_TOLERANCE: f64 = 1.1;

/// Velocity every cell starts with before the first kinetics pass (m/s)
///
/// Only interface cells are rewritten by the kinetics pass, so the first
/// adaptive timestep is bounded by this reference speed.
pub const INITIAL_VELOCITY: f64 = 1.0;

/// Cosine of the four-fold misorientation between crystal axis and growth normal
///
/// Both angles are in degrees. Returns `cos(4·(orientation − normal))`.
#[inline]
#[must_use]
pub fn four_fold_cosine(orientation_deg: f64, normal_deg: f64) -> f64 {
    let angle_diff = (orientation_deg - normal_deg) * DEG_TO_RAD;
    (FOUR_FOLD_SYMMETRY * angle_diff).cos()
}
