//! The snake lives entirely inside the grid.
//!
//! Every cell the snake covers holds an age: the tail has the smallest, the
//! head the largest, and neighbouring segments differ by exactly one. Moving
//! the head writes `head_age + 1` into the new cell; moving the tail means
//! looking around it for the cell holding `tail_age + 1`. No list of segments
//! is ever stored.
//!
//! ```text
//!  0 0 0 0 0 0
//!  0 7 6 5 0 0
//!  0 0 3 4 0 0
//!  0 0 2 0 0 0
//! ```

use crate::food;
use crate::grid::{Grid, GridPos};

use std::{error::Error, fmt};

use rand::{rngs::ThreadRng, Rng};
use Direction::*;
use StepResult::*;

const START_SIZE: u32 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Up),
            (0, 1) => Some(Down),
            (-1, 0) => Some(Left),
            (1, 0) => Some(Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    Blocked,
    Won,
}

/// What the renderer should draw in a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Food,
    Body,
    Head,
}

/// A movement vector that is not one of the four unit steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidDirection {
    pub dx: i32,
    pub dy: i32,
}

impl fmt::Display for InvalidDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) is not a unit direction", self.dx, self.dy)
    }
}

impl Error for InvalidDirection {}

pub struct Snake<R = ThreadRng> {
    grid: Grid,
    head: GridPos,
    tail: GridPos,
    size: u32,
    food: GridPos,
    rng: R,
}

impl Snake {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_rng(width, height, rand::thread_rng())
    }
}

impl<R: Rng> Snake<R> {
    /// Places a one-cell snake of target size 2 in the middle of an empty
    /// board and drops the first piece of food.
    pub fn with_rng(width: u16, height: u16, mut rng: R) -> Self {
        let mut grid = Grid::new(width, height);
        let start = (width as i32 / 2, height as i32 / 2);
        grid.set(start.0, start.1, 1);

        let food = food::allocate(&grid, &mut rng);

        Snake { grid, head: start, tail: start, size: START_SIZE, food, rng }
    }

    /// Advances the simulation by one cell in `dir`.
    ///
    /// Nothing is mutated unless `Continue` is returned. The caller is
    /// responsible for not steering straight back into the neck.
    pub fn step(&mut self, dir: Direction) -> StepResult {
        let head_age = self.grid.get(self.head.0, self.head.1);
        let tail_age = self.grid.get(self.tail.0, self.tail.1);

        // Checked before moving: one more meal would leave nowhere to put food.
        if self.size as usize + 2 == self.grid.cell_count() {
            return Won;
        }

        let (dx, dy) = dir.delta();
        let next = (self.head.0 + dx, self.head.1 + dy);

        if !self.grid.contains(next) || self.grid.get(next.0, next.1) > 0 {
            return Blocked;
        }

        self.head = next;
        self.grid.set(next.0, next.1, head_age + 1);

        // Once stretched out the body spans size + 1 cells, tail included.
        if self.size + tail_age < head_age + 1 {
            self.advance_tail(tail_age);
        }

        if self.head == self.food {
            self.food = food::allocate(&self.grid, &mut self.rng);
            self.size += 1;
        }

        Continue
    }

    /// Same as [`step`](Self::step) for a raw `(dx, dy)` vector.
    pub fn step_delta(&mut self, dx: i32, dy: i32) -> Result<StepResult, InvalidDirection> {
        let dir = Direction::from_delta(dx, dy).ok_or(InvalidDirection { dx, dy })?;
        Ok(self.step(dir))
    }

    fn advance_tail(&mut self, tail_age: u32) {
        let (x, y) = self.tail;
        let grid = &self.grid;

        let next = [Right, Left, Down, Up]
            .iter()
            .map(|d| d.delta())
            .map(|(dx, dy)| (x + dx, y + dy))
            .find(|&(nx, ny)| grid.get(nx, ny) == tail_age + 1);

        debug_assert!(
            next.is_some(),
            "no segment aged {} next to the tail at {:?}",
            tail_age + 1,
            self.tail
        );

        self.grid.set(x, y, 0);

        if let Some(pos) = next {
            self.tail = pos;
        }
    }
}

impl<R> Snake<R> {
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn head(&self) -> GridPos {
        self.head
    }

    pub fn tail(&self) -> GridPos {
        self.tail
    }

    pub fn food(&self) -> GridPos {
        self.food
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn age_at(&self, x: i32, y: i32) -> u32 {
        self.grid.get(x, y)
    }

    pub fn is_head(&self, x: i32, y: i32) -> bool {
        self.head == (x, y)
    }

    pub fn is_food(&self, x: i32, y: i32) -> bool {
        self.food == (x, y)
    }

    /// Covered by the body, not counting the head.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.grid.get(x, y) > 0 && !self.is_head(x, y)
    }

    pub fn head_near_food(&self) -> bool {
        let (hx, hy) = self.head;
        let (fx, fy) = self.food;
        (hx - fx).abs() + (hy - fy).abs() == 1
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, pos: GridPos) {
        self.food = pos;
    }

    pub fn cell_at(&self, x: i32, y: i32) -> CellKind {
        if self.is_head(x, y) {
            CellKind::Head
        } else if self.is_occupied(x, y) {
            CellKind::Body
        } else if self.is_food(x, y) {
            CellKind::Food
        } else {
            CellKind::Empty
        }
    }
}
