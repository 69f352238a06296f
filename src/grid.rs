/// A position on the board. Signed so that neighbours of edge cells can be
/// probed without any special casing.
pub type GridPos = (i32, i32);

/// Flat storage of per-cell snake ages. An age of 0 means the cell is empty.
///
/// Every coordinate outside the board reads as 0 and ignores writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<u32>,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> Self {
        let cells = vec![0; width as usize * height as usize];
        Grid { width: width as i32, height: height as i32, cells }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, (x, y): GridPos) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn get(&self, x: i32, y: i32) -> u32 {
        match self.index_of(x, y) {
            Some(i) => self.cells[i],
            None => 0,
        }
    }

    pub fn set(&mut self, x: i32, y: i32, age: u32) {
        if let Some(i) = self.index_of(x, y) {
            self.cells[i] = age;
        }
    }

    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains((x, y)) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn position_of(&self, index: usize) -> GridPos {
        let w = self.width as usize;
        ((index % w) as i32, (index / w) as i32)
    }

    /// Age at a flat index, 0 past the end.
    pub fn get_index(&self, index: usize) -> u32 {
        self.cells.get(index).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.cell_count(), 12);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(grid.get(x, y), 0);
            }
        }
    }

    #[test]
    fn set_then_get() {
        let mut grid = Grid::new(4, 3);
        grid.set(3, 2, 7);
        assert_eq!(grid.get(3, 2), 7);
        assert_eq!(grid.get_index(11), 7);
        grid.set(3, 2, 0);
        assert_eq!(grid.get(3, 2), 0);
    }

    #[test]
    fn out_of_bounds_reads_empty_and_ignores_writes() {
        let mut grid = Grid::new(4, 3);
        for &(x, y) in &[(-1, 0), (0, -1), (4, 0), (0, 3), (i32::MAX, i32::MIN)] {
            grid.set(x, y, 9);
            assert_eq!(grid.get(x, y), 0);
        }
        assert!((0..grid.cell_count()).all(|i| grid.get_index(i) == 0));
        assert_eq!(grid.get_index(12), 0);
    }

    #[test]
    fn flat_index_is_row_major() {
        let grid = Grid::new(5, 4);
        assert_eq!(grid.index_of(2, 3), Some(17));
        assert_eq!(grid.position_of(17), (2, 3));
        assert_eq!(grid.index_of(5, 0), None);
    }
}
