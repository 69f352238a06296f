use crate::grid::{Grid, GridPos};

use rand::Rng;

/// Picks a cell for the next piece of food.
///
/// A uniformly random cell is rolled first. If the snake is on it, the board
/// is walked forward in row-major order, wrapping around, and the first empty
/// cell wins. On a completely full board the rolled cell is returned.
pub fn allocate<R: Rng>(grid: &Grid, rng: &mut R) -> GridPos {
    let rolled = (rng.gen_range(0..grid.width()), rng.gen_range(0..grid.height()));

    if grid.get(rolled.0, rolled.1) == 0 {
        return rolled;
    }

    let total = grid.cell_count();
    let start = grid.index_of(rolled.0, rolled.1).unwrap_or(0);

    (1..total)
        .map(|offset| (start + offset) % total)
        .find(|&i| grid.get_index(i) == 0)
        .map(|i| grid.position_of(i))
        .unwrap_or(rolled)
}
