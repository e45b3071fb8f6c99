//! Interface detection
//!
//! Flags the liquid cells that border the growing solid. Only flagged cells are
//! touched by the geometry and kinetics passes.
//!
//! A solid–solid (grain boundary) detector is provided alongside for
//! multi-grain studies; the time controller never calls it.

use super::fields::FieldData;
use rayon::prelude::*;

/// Recompute the solid–liquid interface flags from the phase map
///
/// `gb[i,j] = 1` iff the cell is liquid (`map == 0`) and the sum of `map` over
/// its 3×3 Moore block is positive. Every other cell is reset to 0. The
/// outermost ring is never flagged, which keeps the downstream stencils
/// inside the grid.
///
/// # Returns
///
/// Number of interface cells
pub fn detect_interface(map: &FieldData, gb: &mut FieldData) -> usize {
    let sizex = map.sizex;
    let sizey = map.sizey;
    let map_data = map.as_slice();

    gb.as_mut_slice()
        .par_chunks_mut(sizey)
        .enumerate()
        .map(|(i, row)| {
            let mut count = 0;
            for (j, flag) in row.iter_mut().enumerate() {
                *flag = 0.0;

                // Boundary exclusion
                if i == 0 || j == 0 || i + 1 >= sizex || j + 1 >= sizey {
                    continue;
                }

                if map_data[i * sizey + j] == 0.0 && map.block_sum(i, j) > 0.0 {
                    *flag = 1.0;
                    count += 1;
                }
            }
            count
        })
        .sum()
}

/// Flag solid–solid grain boundaries using the von Neumann neighbourhood
///
/// A cell is flagged when it differs from the average of its four orthogonal
/// neighbours and is itself unmarked (`map == 0`). Cells scanned
/// (`2 ≤ i ≤ sizex−2`, `2 ≤ j ≤ sizey−2`) that fail the test are reset to 0;
/// cells outside that range are left as they were.
///
/// # Returns
///
/// Number of flagged cells
pub fn detect_grain_boundaries(map: &FieldData, gb: &mut FieldData) -> usize {
    let sizex = map.sizex;
    let sizey = map.sizey;
    let mut count = 0;

    for i in 2..sizex.saturating_sub(1) {
        for j in 2..sizey.saturating_sub(1) {
            let neighbor_avg = (map.get(i, j - 1)
                + map.get(i, j + 1)
                + map.get(i - 1, j)
                + map.get(i + 1, j))
                / 4.0;
            let value = map.get(i, j);

            if value != neighbor_avg && value == 0.0 {
                gb.set(i, j, 1.0);
                count += 1;
            } else {
                gb.set(i, j, 0.0);
            }
        }
    }

    count
}
