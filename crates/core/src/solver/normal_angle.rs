//! Interface normal estimation
//!
//! The growth normal at an interface cell is taken from the local
//! fraction-solid gradient, averaged over three parallel central differences.
//!
//! Angle convention: 0° points along +y ("up"); the sign follows the sign of
//! the x-component, giving a range of [-180°, 180°].

use super::fields::FieldData;
use crate::constants::RAD_TO_DEG;
use nalgebra::Vector2;

/// Fraction-solid gradient at an interior cell
///
/// The x-component differences columns `j-1` and `j+1` along rows `i-1`, `i`,
/// `i+1`; the y-component differences rows `i-1` and `i+1` along columns
/// `j-1`, `j`, `j+1`. Each sum of three 2-wide differences is divided by 6.
#[must_use]
pub fn fraction_solid_gradient(fs: &FieldData, i: usize, j: usize) -> Vector2<f64> {
    let nx = ((fs.get(i - 1, j - 1) - fs.get(i - 1, j + 1))
        + (fs.get(i, j - 1) - fs.get(i, j + 1))
        + (fs.get(i + 1, j - 1) - fs.get(i + 1, j + 1)))
        / 6.0;

    let ny = ((fs.get(i - 1, j - 1) - fs.get(i + 1, j - 1))
        + (fs.get(i - 1, j) - fs.get(i + 1, j))
        + (fs.get(i - 1, j + 1) - fs.get(i + 1, j + 1)))
        / 6.0;

    Vector2::new(nx, ny)
}

/// Interface normal angle in degrees, if it is defined at `(i, j)`
///
/// Returns `None` when the gradient vanishes, and also when its x-component
/// is exactly zero: in that case the caller keeps the previous angle instead
/// of assigning 0° or 180°.
#[must_use]
pub fn normal_angle(fs: &FieldData, i: usize, j: usize) -> Option<f64> {
    let gradient = fraction_solid_gradient(fs, i, j);
    let magnitude = gradient.norm();
    if magnitude == 0.0 {
        return None;
    }

    let unit = gradient / magnitude;
    // Rounding can push |y| a hair past 1
    let polar = unit.y.clamp(-1.0, 1.0).acos() * RAD_TO_DEG;

    if unit.x > 0.0 {
        Some(polar)
    } else if unit.x < 0.0 {
        Some(-polar)
    } else {
        None
    }
}

/// Refresh `gvn[i,j]` from the local fraction-solid gradient
///
/// Leaves the stored angle unchanged where [`normal_angle`] is undefined.
///
/// # Returns
///
/// `true` if the angle was rewritten
pub fn update_normal_angle(fs: &FieldData, gvn: &mut FieldData, i: usize, j: usize) -> bool {
    match normal_angle(fs, i, j) {
        Some(angle) => {
            gvn.set(i, j, angle);
            true
        }
        None => false,
    }
}
