//! Arcade Snake - a tick-driven snake game
//!
//! This library provides:
//! - Core game logic: the tick state machine and input reconciliation (game module)
//! - Terminal rendering (render module)
//! - Keyboard mapping (input module)
//! - Session statistics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
