use anyhow::Result;
use clap::Parser;
use log::info;
use toroid_snake::game::{GameConfig, GameEngine};
use toroid_snake::modes::PlayMode;

#[derive(Parser)]
#[command(name = "toroid_snake")]
#[command(version, about = "Snake on a board that wraps around its edges")]
struct Cli {
    /// Board width in units
    #[arg(long)]
    width: Option<u32>,

    /// Board height in units
    #[arg(long)]
    height: Option<u32>,

    /// Side of one cell in units
    #[arg(long)]
    cell_size: Option<u32>,

    /// Ticks per second
    #[arg(long)]
    speed: Option<u32>,

    /// Seed for food placement and starting headings
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Layer the flags that were given over the built-in defaults
    fn config(&self) -> GameConfig {
        let defaults = GameConfig::default();
        GameConfig {
            screen_width: self.width.unwrap_or(defaults.screen_width),
            screen_height: self.height.unwrap_or(defaults.screen_height),
            cell_size: self.cell_size.unwrap_or(defaults.cell_size),
            speed: self.speed.unwrap_or(defaults.speed),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = cli.config();

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed)?,
        None => GameEngine::new(config)?,
    };
    info!("starting with {:?}", engine.config());

    let mut play_mode = PlayMode::new(engine)?;
    play_mode.run().await?;

    Ok(())
}
