use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{
    board::Board,
    config::GameConfig,
    direction::Direction,
    state::{Food, GameState, Position, Snake},
};

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Whether the snake hit itself and was put back at the center
    pub reset: bool,
    /// Cell the tail left behind this tick.
    ///
    /// The bundled renderer repaints the whole board and does not need it;
    /// it is reported for callers that draw incrementally.
    pub vacated: Option<Position>,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    board: Board,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement and headings are reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Result<Self> {
        config.validate().context("Invalid game configuration")?;
        let board = Board::new(&config);

        Ok(Self { config, board, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> Board {
        self.board
    }

    /// Build the initial game state
    pub fn reset(&mut self) -> Result<GameState> {
        let snake = self.fresh_snake();
        let food = Food::spawn(&self.board, &snake, &mut self.rng)?;

        Ok(GameState::new(self.board, snake, food))
    }

    /// Queue a turn for the next tick, ignoring reversals
    pub fn turn(&self, state: &mut GameState, direction: Direction) {
        if !state.snake.queue_direction(direction) {
            debug!(
                "ignored reversal {:?} while heading {:?}",
                direction, state.snake.direction
            );
        }
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState) -> Result<StepResult> {
        state.snake.commit_direction();
        state.snake.advance(&self.board);
        state.steps += 1;

        let vacated = state.snake.last;

        let ate_food = state.snake.head() == state.food.position;
        if ate_food {
            state.snake.grow();
            if let Err(err) = state.food.relocate(&self.board, &state.snake, &mut self.rng) {
                warn!(
                    "snake of length {} filled the board, no cell left for food",
                    state.snake.len()
                );
                return Err(err).context("Failed to place food");
            }
            debug!(
                "ate food, length now {}, next food at {:?}",
                state.snake.length, state.food.position
            );
        }

        let reset = state.snake.collides_with_self();
        if reset {
            info!(
                "self-collision at {:?} with length {}, resetting",
                state.snake.head(),
                state.snake.length
            );
            state.snake = self.fresh_snake();
            state.resets += 1;
        }

        Ok(StepResult {
            ate_food,
            reset,
            vacated,
        })
    }

    fn fresh_snake(&mut self) -> Snake {
        Snake::new(self.board.center(), Direction::random(&mut self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 11).unwrap()
    }

    /// State with the snake at the center heading `direction` and food far away
    fn state_heading(engine: &GameEngine, direction: Direction) -> GameState {
        let board = engine.board();
        GameState::new(
            board,
            Snake::new(board.center(), direction),
            Food::at(Position::new(0, 0)),
        )
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset().unwrap();

        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.length, 1);
        assert_eq!(state.snake.head(), Position::new(320, 240));
        assert_eq!(state.steps, 0);
        assert_eq!(state.resets, 0);
        assert!(!state.snake.occupies(state.food.position));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(GameEngine::new(GameConfig::new(641, 480)).is_err());
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        let mut state = state_heading(&engine, Direction::Down);

        let result = engine.step(&mut state).unwrap();

        assert!(!result.ate_food);
        assert!(!result.reset);
        assert_eq!(state.snake.head(), Position::new(320, 260));
        assert_eq!(state.snake.len(), 1);
        assert_eq!(result.vacated, Some(Position::new(320, 240)));
        assert_eq!(state.steps, 1);
    }

    #[test]
    fn test_length_constant_without_food() {
        let mut engine = engine();
        let mut state = state_heading(&engine, Direction::Right);
        state.snake.length = 4;
        for _ in 0..3 {
            engine.step(&mut state).unwrap();
        }
        state.food = Food::at(Position::new(0, 460));

        for _ in 0..50 {
            let result = engine.step(&mut state).unwrap();
            assert!(!result.reset);
            assert_eq!(state.snake.len(), 4);
        }
    }

    #[test]
    fn test_head_stays_in_bounds() {
        let mut engine = engine();
        let mut state = engine.reset().unwrap();
        let turns = [
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Down,
        ];

        for tick in 0..2000 {
            if tick % 37 == 0 {
                engine.turn(&mut state, turns[(tick / 37) % turns.len()]);
            }
            engine.step(&mut state).unwrap();
            assert!(state.board.contains(state.snake.head()));
            assert!(state.snake.len() <= state.snake.length);
        }
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = state_heading(&engine, Direction::Down);
        state.food = Food::at(Position::new(320, 260));

        let result = engine.step(&mut state).unwrap();

        assert!(result.ate_food);
        assert_eq!(state.snake.length, 2);
        assert_eq!(state.score(), 1);
        assert_ne!(state.food.position, Position::new(320, 260));
        assert!(!state.snake.occupies(state.food.position));

        // The body catches up on the following tick
        assert_eq!(state.snake.len(), 1);
        engine.step(&mut state).unwrap();
        assert_eq!(state.snake.len(), 2);
    }

    #[test]
    fn test_filling_the_board_is_an_error() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 4).unwrap();
        let board = engine.board();
        let last_free = Position::new(90, 90);
        let head = Position::new(80, 90);

        // Every cell but one is taken, and the head is about to step into it
        let mut body = vec![head];
        body.extend(
            (0..board.rows())
                .flat_map(|y| (0..board.columns()).map(move |x| Position::new(x * 10, y * 10)))
                .filter(|pos| *pos != head && *pos != last_free),
        );
        let mut snake = Snake::new(head, Direction::Right);
        snake.body = body;
        snake.length = board.capacity();
        let mut state = GameState::new(board, snake, Food::at(last_free));

        let err = engine.step(&mut state).unwrap_err();

        assert!(format!("{:#}", err).contains("no free cell"));
        assert_eq!(state.snake.len(), board.capacity());
        assert_eq!(state.snake.head(), last_free);
    }

        #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine();
        let mut state = state_heading(&engine, Direction::Down);

        engine.turn(&mut state, Direction::Up);
        engine.step(&mut state).unwrap();

        assert_eq!(state.snake.direction, Direction::Down);
        assert_eq!(state.snake.head(), Position::new(320, 260));
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut engine = engine();
        let mut state = state_heading(&engine, Direction::Down);

        engine.turn(&mut state, Direction::Left);
        assert_eq!(state.snake.direction, Direction::Down);

        engine.step(&mut state).unwrap();
        assert_eq!(state.snake.direction, Direction::Left);
        assert_eq!(state.snake.head(), Position::new(300, 240));
    }

    #[test]
    fn test_self_collision_resets_snake() {
        let mut engine = engine();
        let mut state = state_heading(&engine, Direction::Right);
        // Head at (320,240) heading right into a body that loops back
        state.snake.body = vec![
            Position::new(320, 240),
            Position::new(320, 260),
            Position::new(340, 260),
            Position::new(340, 240),
            Position::new(360, 240),
        ];
        state.snake.length = 5;
        let food = state.food;

        let result = engine.step(&mut state).unwrap();

        assert!(result.reset);
        assert_eq!(state.resets, 1);
        assert_eq!(state.snake.body, vec![Position::new(320, 240)]);
        assert_eq!(state.snake.length, 1);
        assert_eq!(state.snake.pending_direction, None);
        assert_eq!(state.food, food);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 99).unwrap();
        let mut b = GameEngine::with_seed(GameConfig::default(), 99).unwrap();
        assert_eq!(a.reset().unwrap(), b.reset().unwrap());
    }
}
