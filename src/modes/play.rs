use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stdout, stdout};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Frame rate for redraws between ticks, so the clock keeps moving at low speeds
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive game on the terminal's alternate screen.
///
/// Drawing goes to stdout so that log output on stderr can be redirected
/// without tearing the board.
pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(mut engine: GameEngine) -> Result<Self> {
        let state = engine.reset().context("Failed to set up the board")?;

        Ok(Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        let cleanup = self.cleanup_terminal(&mut terminal);

        finish_session(result, cleanup)
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        let tick_interval = Duration::from_secs(1) / self.engine.config().speed;
        let mut tick_timer = interval(tick_interval);
        let mut render_timer = interval(RENDER_INTERVAL);

        self.draw(terminal)?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event, terminal)?,
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game tick, drawn as soon as it is computed
                _ = tick_timer.tick() => {
                    self.update_game()?;
                    self.draw(terminal)?;
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.draw(terminal)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!(
                    "quitting after {} ticks, best score {}",
                    self.state.steps,
                    self.metrics.high_score()
                );
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, terminal: &mut Tui) -> Result<()> {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::Turn(direction) => {
                        self.engine.turn(&mut self.state, direction);
                    }
                    KeyAction::Quit => {
                        self.should_quit = true;
                    }
                    KeyAction::None => {}
                }
            }
            Event::Resize(..) => self.draw(terminal)?,
            _ => {}
        }

        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        let length_before = self.state.snake.length;
        let result = self.engine.step(&mut self.state)?;

        if result.reset {
            self.metrics.on_reset(length_before + usize::from(result.ate_food));
        } else {
            self.metrics.observe_length(self.state.snake.length);
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Tui) -> Result<()> {
        self.metrics.update();
        terminal
            .draw(|frame| {
                self.renderer.render(frame, &self.state, &self.metrics);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    /// Attempt every restore step, reporting the first that failed
    fn cleanup_terminal(&mut self, terminal: &mut Tui) -> Result<()> {
        let raw_mode = disable_raw_mode().context("Failed to disable raw mode");
        let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen");
        let cursor = terminal.show_cursor().context("Failed to show cursor");

        raw_mode.and(screen).and(cursor)
    }
}

/// The game loop's own error wins over a cleanup error, which is only logged
fn finish_session(result: Result<()>, cleanup: Result<()>) -> Result<()> {
    if let (Err(_), Err(cleanup_err)) = (&result, &cleanup) {
        warn!("terminal restore also failed: {:#}", cleanup_err);
    }
    result.and(cleanup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Food, GameConfig, Position};
    use anyhow::anyhow;

    fn mode() -> PlayMode {
        let engine = GameEngine::with_seed(GameConfig::default(), 5).unwrap();
        PlayMode::new(engine).unwrap()
    }

    #[test]
    fn test_loop_error_wins_over_cleanup_error() {
        let result = finish_session(Err(anyhow!("loop broke")), Err(anyhow!("cleanup broke")));
        assert_eq!(result.unwrap_err().to_string(), "loop broke");

        let result = finish_session(Ok(()), Err(anyhow!("cleanup broke")));
        assert_eq!(result.unwrap_err().to_string(), "cleanup broke");

        assert!(finish_session(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.state.snake.len(), 1);
        assert_eq!(mode.state.score(), 0);
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_reset_is_recorded() {
        let mut mode = mode();
        mode.state.snake.direction = Direction::Right;
        mode.state.snake.body = vec![
            Position::new(320, 240),
            Position::new(320, 260),
            Position::new(340, 260),
            Position::new(340, 240),
            Position::new(360, 240),
        ];
        mode.state.snake.length = 5;
        mode.state.food = Food::at(Position::new(0, 0));

        mode.update_game().unwrap();

        assert_eq!(mode.metrics.resets, 1);
        assert_eq!(mode.metrics.high_score(), 4);
        assert_eq!(mode.state.snake.len(), 1);
    }

    #[test]
    fn test_eating_raises_high_score() {
        let mut mode = mode();
        mode.state.snake.direction = Direction::Down;
        mode.state.snake.pending_direction = None;
        mode.state.food = Food::at(Position::new(320, 260));

        mode.update_game().unwrap();

        assert_eq!(mode.metrics.high_score(), 1);
        assert_eq!(mode.metrics.resets, 0);
    }
}
