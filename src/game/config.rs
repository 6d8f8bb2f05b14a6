use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest board, in cells, the engine will allocate a snake buffer for
pub const MAX_CELLS: usize = 1 << 20;

/// Number of cells on a board, or `None` if the multiplication overflows
pub fn grid_cells(width: u32, height: u32, unit: u32) -> Option<usize> {
    let unit = unit.max(1);
    let columns = usize::try_from(width / unit).ok()?;
    let rows = usize::try_from(height / unit).ok()?;
    columns.checked_mul(rows)
}

/// Configuration for the game
///
/// All lengths are in the same units as positions (pixels in the classic
/// 600x600 board), so every dimension must be a multiple of `unit_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the arena
    pub width: u32,
    /// Height of the arena
    pub height: u32,
    /// Size of one grid cell; snake segments and food are one unit wide
    pub unit_size: u32,
    /// Number of segments the snake starts with
    pub initial_length: usize,

    // Speed
    /// Tick interval at the start of a game
    pub initial_delay_ms: u64,
    /// Tick interval never drops below this
    pub min_delay_ms: u64,
    /// Amount the tick interval shrinks per food eaten
    pub delay_step_ms: u64,

    /// Open on a welcome screen instead of starting immediately
    pub show_welcome: bool,
    /// Run one extra move/food/collision cycle whenever a turn is accepted
    pub step_on_turn: bool,
    /// Also reject turns that reverse the last executed move, so two quick
    /// turns inside one tick cannot fold the head back onto the neck
    pub guard_neck: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            unit_size: 20,
            initial_length: 30,
            initial_delay_ms: 150,
            min_delay_ms: 50,
            delay_step_ms: 10,
            show_welcome: false,
            step_on_turn: false,
            guard_neck: false,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom arena and unit size
    pub fn new(width: u32, height: u32, unit_size: u32) -> Self {
        Self {
            width,
            height,
            unit_size,
            ..Default::default()
        }
    }

    /// Create a small board for testing: 10x10 cells, short snake
    pub fn small() -> Self {
        Self {
            initial_length: 3,
            ..Self::new(200, 200, 20)
        }
    }

    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse game config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a playable board
    pub fn validate(&self) -> Result<()> {
        ensure!(self.unit_size > 0, "unit size must be positive");
        ensure!(
            self.width > 0 && self.height > 0,
            "arena must be at least one unit in each direction"
        );
        ensure!(
            i32::try_from(self.width).is_ok() && i32::try_from(self.height).is_ok(),
            "arena {}x{} is too large",
            self.width,
            self.height
        );
        ensure!(
            self.width % self.unit_size == 0 && self.height % self.unit_size == 0,
            "arena {}x{} is not a multiple of unit size {}",
            self.width,
            self.height,
            self.unit_size
        );
        ensure!(
            grid_cells(self.width, self.height, self.unit_size)
                .is_some_and(|cells| cells <= MAX_CELLS),
            "board of {}x{} cells exceeds the limit of {} cells",
            self.columns(),
            self.rows(),
            MAX_CELLS
        );
        ensure!(
            (1..=self.capacity()).contains(&self.initial_length),
            "initial length {} must be between 1 and {}",
            self.initial_length,
            self.capacity()
        );
        ensure!(self.min_delay_ms > 0, "minimum delay must be positive");
        ensure!(
            self.min_delay_ms <= self.initial_delay_ms,
            "minimum delay {}ms exceeds initial delay {}ms",
            self.min_delay_ms,
            self.initial_delay_ms
        );
        Ok(())
    }

    /// Number of columns in the grid
    pub fn columns(&self) -> u32 {
        self.width / self.unit_size
    }

    /// Number of rows in the grid
    pub fn rows(&self) -> u32 {
        self.height / self.unit_size
    }

    /// Maximum number of segments the snake can ever have
    pub fn capacity(&self) -> usize {
        grid_cells(self.width, self.height, self.unit_size)
            .unwrap_or(usize::MAX)
            .min(MAX_CELLS)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.width, 600);
        assert_eq!(config.height, 600);
        assert_eq!(config.unit_size, 20);
        assert_eq!(config.initial_length, 30);
        assert_eq!(config.capacity(), 900);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(300, 200, 10);
        assert_eq!(config.columns(), 30);
        assert_eq!(config.rows(), 20);
        assert_eq!(config.initial_delay(), Duration::from_millis(150));
    }

    #[test]
    fn test_validation_rejects_bad_boards() {
        assert!(GameConfig::new(610, 600, 20).validate().is_err());
        assert!(GameConfig::new(600, 600, 0).validate().is_err());
        assert!(GameConfig::new(0, 600, 20).validate().is_err());

        let too_long = GameConfig {
            initial_length: 5,
            ..GameConfig::new(40, 40, 20)
        };
        assert!(too_long.validate().is_err());

        let inverted_speed = GameConfig {
            min_delay_ms: 200,
            ..GameConfig::default()
        };
        assert!(inverted_speed.validate().is_err());

        let zero_floor = GameConfig {
            min_delay_ms: 0,
            ..GameConfig::default()
        };
        assert!(zero_floor.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_huge_boards() {
        assert!(GameConfig::new(70000, 70000, 1).validate().is_err());

        let wider_than_i32 = GameConfig {
            initial_length: 1,
            ..GameConfig::new(1 << 31, 1, 1 << 31)
        };
        assert!(wider_than_i32.validate().is_err());

        assert_eq!(grid_cells(600, 600, 20), Some(900));
        assert_eq!(GameConfig::new(70000, 70000, 1).capacity(), MAX_CELLS);

        let largest = GameConfig::new(1024, 1024, 1);
        assert!(largest.validate().is_ok());
        assert_eq!(largest.capacity(), MAX_CELLS);
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "width": 400, "height": 300, "step_on_turn": true }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.width, 400);
        assert_eq!(config.height, 300);
        assert!(config.step_on_turn);
        assert_eq!(config.unit_size, 20);
        assert_eq!(config.initial_length, 30);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "width": 405 }}"#).unwrap();
        assert!(GameConfig::load(file.path()).is_err());

        let mut garbage = NamedTempFile::new().unwrap();
        write!(garbage, "not json").unwrap();
        assert!(GameConfig::load(garbage.path()).is_err());
    }
}
