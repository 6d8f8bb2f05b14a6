//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A front-end drives it through the `GameEngine` entry points and reads `GameState`
//! for display.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, TickOutcome};
pub use state::{GameOverReason, GameState, Phase, Position, Snake};
