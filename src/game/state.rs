use std::collections::HashSet;

use anyhow::{Result, bail};
use rand::Rng;

use super::{board::Board, direction::Direction};

/// A cell-aligned position on the board, in board units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
    /// Turn requested since the last tick
    pub pending_direction: Option<Direction>,
    /// Target segment count; the body catches up one cell per tick
    pub length: usize,
    /// Cell vacated by the most recent advance
    pub last: Option<Position>,
}

impl Snake {
    /// Create a one-segment snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
            pending_direction: None,
            length: 1,
            last: None,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Request a turn for the next tick.
    ///
    /// A reversal into the current heading is refused and `false` is
    /// returned.
    pub fn queue_direction(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Apply the pending turn, if any
    pub fn commit_direction(&mut self) {
        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }
    }

    /// Move one cell forward, trimming the tail once the body reaches `length`
    pub fn advance(&mut self, board: &Board) {
        let new_head = board.step(self.head(), self.direction);
        self.body.insert(0, new_head);

        self.last = if self.body.len() > self.length {
            self.body.pop()
        } else {
            None
        };
    }

    pub fn grow(&mut self) {
        self.length += 1;
    }

    /// Check whether the head overlaps any other segment
    pub fn collides_with_self(&self) -> bool {
        self.body[1..].contains(&self.head())
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Get the number of segments currently on the board
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// The food cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    pub fn at(position: Position) -> Self {
        Self { position }
    }

    /// Place food on a random cell the snake does not occupy
    pub fn spawn<R: Rng + ?Sized>(board: &Board, snake: &Snake, rng: &mut R) -> Result<Self> {
        let mut food = Self::at(board.center());
        food.relocate(board, snake, rng)?;
        Ok(food)
    }

    /// Move to a random cell the snake does not occupy.
    ///
    /// Samples until a free cell comes up. Fails only when the snake covers
    /// the whole board.
    pub fn relocate<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        snake: &Snake,
        rng: &mut R,
    ) -> Result<()> {
        let occupied: HashSet<Position> = snake.body.iter().copied().collect();
        if occupied.len() >= board.capacity() {
            bail!("no free cell left for food on a {}-cell board", board.capacity());
        }

        loop {
            let pos = board.random_cell(rng);
            if !occupied.contains(&pos) {
                self.position = pos;
                return Ok(());
            }
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub snake: Snake,
    pub food: Food,
    pub steps: u32,
    pub resets: u32,
}

impl GameState {
    /// Create a new game state
    pub fn new(board: Board, snake: Snake, food: Food) -> Self {
        Self {
            board,
            snake,
            food,
            steps: 0,
            resets: 0,
        }
    }

    /// Food eaten since the last reset
    pub fn score(&self) -> u32 {
        (self.snake.length - 1) as u32
    }
}
