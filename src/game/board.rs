//! Board geometry
//!
//! The board is a torus: stepping off one edge lands on the opposite one.
//! Every position handed out here is aligned to the cell grid.

use rand::Rng;

use super::{config::GameConfig, direction::Direction, state::Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
}

impl Board {
    /// `config` must have passed [`GameConfig::validate`].
    pub fn new(config: &GameConfig) -> Self {
        Self {
            width: config.screen_width as i32,
            height: config.screen_height as i32,
            cell_size: config.cell_size as i32,
        }
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    /// Total number of cells on the board
    pub fn capacity(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// Center of the board, snapped down to the cell grid
    pub fn center(&self) -> Position {
        Position::new(self.snap(self.width / 2), self.snap(self.height / 2))
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// One cell over from `pos`, wrapping around the edges
    pub fn step(&self, pos: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(
            (pos.x + dx * self.cell_size).rem_euclid(self.width),
            (pos.y + dy * self.cell_size).rem_euclid(self.height),
        )
    }

    /// Uniformly random cell anywhere on the board
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(
            rng.gen_range(0..self.columns()) * self.cell_size,
            rng.gen_range(0..self.rows()) * self.cell_size,
        )
    }

    fn snap(&self, value: i32) -> i32 {
        value - value % self.cell_size
    }
}
