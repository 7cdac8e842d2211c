//! Toroidal Snake - a terminal snake game on a wraparound board
//!
//! This library provides:
//! - Core game logic (game module), free of any terminal dependency
//! - Key mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
