use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Fastest supported tick rate; keeps the tick period well above zero
pub const MAX_SPEED: u32 = 1000;

/// Most cells along either axis; keeps the board addressable in `i32` and
/// drawable within a `u16` terminal layout
pub const MAX_GRID_CELLS: u32 = 1024;

/// Configuration for the game
///
/// Extents are measured in the same units as positions, so a cell at grid
/// column 3 sits at `x = 3 * cell_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board width in units
    pub screen_width: u32,
    /// Board height in units
    pub screen_height: u32,
    /// Side of one square cell in units
    pub cell_size: u32,
    /// Ticks per second
    pub speed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 640,
            screen_height: 480,
            cell_size: 20,
            speed: 20,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self {
            screen_width: 100,
            screen_height: 100,
            cell_size: 10,
            ..Default::default()
        }
    }

    /// Number of cell columns
    pub fn grid_width(&self) -> u32 {
        self.screen_width / self.cell_size
    }

    /// Number of cell rows
    pub fn grid_height(&self) -> u32 {
        self.screen_height / self.cell_size
    }

    /// Reject boards that cannot be tiled by whole cells
    pub fn validate(&self) -> Result<()> {
        ensure!(self.cell_size > 0, "cell size must be positive");
        ensure!(self.speed > 0, "speed must be at least one tick per second");
        ensure!(
            self.speed <= MAX_SPEED,
            "speed {} is above the limit of {} ticks per second",
            self.speed,
            MAX_SPEED
        );
        ensure!(
            self.screen_width > 0 && self.screen_height > 0,
            "board must have a non-zero area, got {}x{}",
            self.screen_width,
            self.screen_height
        );
        ensure!(
            self.screen_width % self.cell_size == 0 && self.screen_height % self.cell_size == 0,
            "board {}x{} is not a whole number of {}-unit cells",
            self.screen_width,
            self.screen_height,
            self.cell_size
        );
        ensure!(
            i32::try_from(self.screen_width).is_ok() && i32::try_from(self.screen_height).is_ok(),
            "board {}x{} is too large",
            self.screen_width,
            self.screen_height
        );
        ensure!(
            self.grid_width() <= MAX_GRID_CELLS && self.grid_height() <= MAX_GRID_CELLS,
            "grid {}x{} exceeds {} cells per side",
            self.grid_width(),
            self.grid_height(),
            MAX_GRID_CELLS
        );
        ensure!(
            self.grid_width() * self.grid_height() >= 2,
            "board needs room for both the snake and the food"
        );
        Ok(())
    }
}
