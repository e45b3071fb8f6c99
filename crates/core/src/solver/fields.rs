//! Field data container for the solidification grid
//!
//! Every physical quantity (fraction solid, concentration, orientation, ...) is
//! stored as a dense 2D `FieldData` sharing one coordinate system.

use serde::{Deserialize, Serialize};

/// Dense 2D scalar field
///
/// Stores values as a flat `Vec<f64>` in row-major order: `sizex` rows indexed
/// by `i`, each holding `sizey` columns indexed by `j`, so the flat index is
/// `i * sizey + j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldData {
    /// Field values in row-major order (i * sizey + j)
    pub data: Vec<f64>,
    /// Number of rows (extent along `i`)
    pub sizex: usize,
    /// Number of columns (extent along `j`)
    pub sizey: usize,
}

impl FieldData {
    /// Create a new field with given dimensions, initialized to zero
    ///
    /// # Arguments
    ///
    /// * `sizex` - Number of rows
    /// * `sizey` - Number of columns
    #[must_use]
    pub fn new(sizex: usize, sizey: usize) -> Self {
        Self::with_value(sizex, sizey, 0.0)
    }

    /// Create a new field with given dimensions, initialized to a value
    ///
    /// # Arguments
    ///
    /// * `sizex` - Number of rows
    /// * `sizey` - Number of columns
    /// * `value` - Initial value for all cells
    #[must_use]
    pub fn with_value(sizex: usize, sizey: usize, value: f64) -> Self {
        Self {
            data: vec![value; sizex * sizey],
            sizex,
            sizey,
        }
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Flat index of cell `(i, j)`
    #[inline]
    #[must_use]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.sizey + j
    }

    /// Whether `(i, j)` lies strictly inside the outermost ring of cells
    #[inline]
    #[must_use]
    pub fn is_interior(&self, i: usize, j: usize) -> bool {
        i >= 1 && j >= 1 && i + 1 < self.sizex && j + 1 < self.sizey
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.sizex && j < self.sizey,
            "Coordinates out of bounds"
        );
        self.data[self.index(i, j)]
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(
            i < self.sizex && j < self.sizey,
            "Coordinates out of bounds"
        );
        let idx = self.index(i, j);
        self.data[idx] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Overwrite this field with the contents of another field of equal shape
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ
    pub fn copy_from(&mut self, other: &FieldData) {
        assert!(
            self.sizex == other.sizex && self.sizey == other.sizey,
            "Field shapes differ"
        );
        self.data.copy_from_slice(&other.data);
    }

    /// Sum over all cells
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Largest value in the field (`-inf` for an empty field)
    #[must_use]
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest value in the field (`+inf` for an empty field)
    #[must_use]
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Number of cells holding a non-zero value
    #[must_use]
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }

    /// Sum over the 3×3 block centred on an interior cell (self included)
    #[inline]
    #[must_use]
    pub fn block_sum(&self, i: usize, j: usize) -> f64 {
        debug_assert!(self.is_interior(i, j), "3x3 block leaves the grid");
        let mut total = 0.0;
        for a in i - 1..=i + 1 {
            let row = a * self.sizey;
            for b in j - 1..=j + 1 {
                total += self.data[row + b];
            }
        }
        total
    }

    /// Maximum over the 3×3 block centred on an interior cell (self included)
    #[inline]
    #[must_use]
    pub fn block_max(&self, i: usize, j: usize) -> f64 {
        debug_assert!(self.is_interior(i, j), "3x3 block leaves the grid");
        let mut best = f64::NEG_INFINITY;
        for a in i - 1..=i + 1 {
            let row = a * self.sizey;
            for b in j - 1..=j + 1 {
                best = best.max(self.data[row + b]);
            }
        }
        best
    }
}
