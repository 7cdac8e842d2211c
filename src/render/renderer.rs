use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;

const BOARD_BACKGROUND_COLOR: Color = Color::Rgb(0, 0, 0);
const BORDER_COLOR: Color = Color::Rgb(93, 216, 228);
const APPLE_COLOR: Color = Color::Rgb(255, 0, 0);
const SNAKE_COLOR: Color = Color::Rgb(0, 255, 0);

/// Terminal columns used to draw one cell, so cells come out roughly square
const CELL_COLUMNS: u16 = 2;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the board horizontally, borders included
        let board_columns = u16::try_from(state.board.columns())
            .unwrap_or(u16::MAX)
            .saturating_mul(CELL_COLUMNS)
            .saturating_add(2);
        let board_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(board_columns),
                Constraint::Fill(1),
            ])
            .split(chunks[1])[1];

        let grid = self.render_grid(state);
        frame.render_widget(grid, board_area);

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    /// Repaint every cell: background first, then food, then the snake.
    ///
    /// Because the whole grid is repainted, the cell the tail vacated is
    /// erased as plain background.
    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let board = &state.board;
        let mut lines = Vec::with_capacity(board.rows() as usize);

        for row in 0..board.rows() {
            let mut spans = Vec::with_capacity(board.columns() as usize);

            for column in 0..board.columns() {
                let pos = Position::new(column * board.cell_size, row * board.cell_size);

                let cell = if pos == state.snake.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(SNAKE_COLOR)
                            .bg(BOARD_BACKGROUND_COLOR)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled(
                        "■ ",
                        Style::default().fg(SNAKE_COLOR).bg(BOARD_BACKGROUND_COLOR),
                    )
                } else if pos == state.food.position {
                    Span::styled(
                        "● ",
                        Style::default().fg(APPLE_COLOR).bg(BOARD_BACKGROUND_COLOR),
                    )
                } else {
                    Span::styled("  ", Style::default().bg(BOARD_BACKGROUND_COLOR))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score().to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score().to_string(), value),
            Span::raw("    "),
            Span::styled("Resets: ", label),
            Span::styled(state.resets.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
