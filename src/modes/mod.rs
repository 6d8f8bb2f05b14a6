pub mod human;

pub use human::{GameClock, HumanMode};
