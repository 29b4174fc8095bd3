//! Conway's B3/S23 rule for a single cell.

/// Returns the next state of the cell in the middle of a 3x3 window.
///
/// `cells` is the window in row-major order, so `cells[4]` is the cell itself and
/// the other eight entries are its neighbours. The cell is alive in the next
/// generation if it has exactly 3 alive neighbours, or if it is alive now and has
/// exactly 2.
#[inline]
pub fn next_state(cells: [bool; 9]) -> bool {
    let alive = cells[4];
    let neighbors = cells
        .iter()
        .enumerate()
        .filter(|&(i, &x)| i != 4 && x)
        .count();
    neighbors == 3 || (neighbors == 2 && alive)
}
