use std::time::{Duration, Instant};

/// Session statistics shown in the header
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_length: usize,
    pub resets: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_length: 1,
            resets: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// Track the longest snake seen, including the current one
    pub fn observe_length(&mut self, length: usize) {
        if length > self.best_length {
            self.best_length = length;
        }
    }

    /// Record a self-collision; `length` is the length reached before it
    pub fn on_reset(&mut self, length: usize) {
        self.resets += 1;
        self.observe_length(length);
    }

    /// Food eaten by the longest snake so far
    pub fn high_score(&self) -> usize {
        self.best_length - 1
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
