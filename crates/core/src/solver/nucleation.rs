//! Nucleation site selection and seeding

use super::state::GridState;
use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Where the single seed crystal is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NucleationSite {
    /// Grid centre, `round(size/2)` per axis with ties to even
    #[default]
    Center,
    /// Explicit cell `(x, y)` = (row, column)
    At { x: usize, y: usize },
    /// Deterministic interior cell drawn from a seeded generator
    Random { seed: u64 },
}

impl NucleationSite {
    /// Resolve to concrete `(row, column)` coordinates on a `sizex × sizey` grid
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoInterior`] if the grid is thinner than 3 cells in
    ///   either direction
    /// - [`ConfigError::NucleationOutOfBounds`] if the site is off the grid
    pub fn resolve(self, sizex: usize, sizey: usize) -> Result<(usize, usize), ConfigError> {
        if sizex < 3 || sizey < 3 {
            return Err(ConfigError::NoInterior { sizex, sizey });
        }

        let (x, y) = match self {
            NucleationSite::Center => (center_of(sizex), center_of(sizey)),
            NucleationSite::At { x, y } => (x, y),
            NucleationSite::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                (
                    rng.random_range(1..sizex - 1),
                    rng.random_range(1..sizey - 1),
                )
            }
        };

        if x >= sizex || y >= sizey {
            return Err(ConfigError::NucleationOutOfBounds { x, y, sizex, sizey });
        }
        Ok((x, y))
    }
}

fn center_of(size: usize) -> usize {
    (size as f64 / 2.0).round_ties_even() as usize
}

/// Place a fully solid seed with the given crystal orientation
///
/// Sets `Map = 1`, `Fs = 1`, and `Fhi = angle` at the resolved site.
///
/// # Errors
///
/// Propagates [`NucleationSite::resolve`] failures; the state is untouched
/// on error.
pub fn seed_nucleus(
    state: &mut GridState,
    site: NucleationSite,
    crystal_angle: f64,
) -> Result<(usize, usize), ConfigError> {
    let (x, y) = site.resolve(state.sizex(), state.sizey())?;
    state.map.set(x, y, 1.0);
    state.fs.set(x, y, 1.0);
    state.fhi.set(x, y, crystal_angle);
    Ok((x, y))
}
