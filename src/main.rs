use anyhow::Result;
use arcade_snake::game::GameConfig;
use arcade_snake::logging;
use arcade_snake::modes::HumanMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Classic snake on a fixed grid, played in the terminal")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arena width
    #[arg(long)]
    width: Option<u32>,

    /// Arena height
    #[arg(long)]
    height: Option<u32>,

    /// Size of one grid cell
    #[arg(long)]
    unit: Option<u32>,

    /// Number of segments the snake starts with
    #[arg(long)]
    initial_length: Option<usize>,

    /// Show the welcome screen before the first game
    #[arg(long)]
    welcome: bool,

    /// Move the snake immediately whenever it turns
    #[arg(long)]
    step_on_turn: bool,

    /// Refuse turns that reverse the last move, even after a quick double turn
    #[arg(long)]
    guard_neck: bool,

    /// Write log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(unit) = self.unit {
            config.unit_size = unit;
        }
        if let Some(length) = self.initial_length {
            config.initial_length = length;
        }
        config.show_welcome |= self.welcome;
        config.step_on_turn |= self.step_on_turn;
        config.guard_neck |= self.guard_neck;

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    log::debug!("game config: {:?}", config);

    let mut human_mode = HumanMode::new(config);
    human_mode.run().await?;

    Ok(())
}
