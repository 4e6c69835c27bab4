mod canvas;
mod config;
mod game;
mod input;
mod mouse;
mod snake;
mod term;

use std::fs::File;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, sleep};

use anyhow::{Context, Result, anyhow};
use log::{error, info};
use simplelog::{Config, WriteLogger};

use config::GameConfig;
use game::SnakeGame;
use input::InputLatch;
use term::TermManager;

pub type TermInt = u16;

/// A point in logic units. Equality is plain coordinate equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

fn main() -> Result<()> {
    let config = GameConfig::from_env().context("Invalid configuration")?;

    // stdout is the playfield, so logs go to a file
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("Cannot create log file {}", config.log_file))?;
    WriteLogger::init(config.log_level, Config::default(), log_file)
        .context("Failed to initialize logger")?;

    info!("starting with {:?}", config);

    let mut term = TermManager::new(config.grid, config.viewport)?;

    // The main loop only returns on quit or a terminal error; clean up either way.
    let result = term.setup().and_then(|()| run(config, &mut term));
    term.restore();

    match &result {
        Ok(()) => info!("bye"),
        Err(err) => error!("stopped: {:#}", err),
    }
    result
}

fn run(config: GameConfig, term: &mut TermManager) -> Result<()> {
    let latch = Arc::new(InputLatch::new());
    let quit = Arc::new(AtomicBool::new(false));

    let reader = {
        let latch = Arc::clone(&latch);
        let quit = Arc::clone(&quit);
        thread::Builder::new()
            .name("input".into())
            .spawn(move || input::read_keys(&latch, &quit))
            .context("Failed to spawn input thread")?
    };

    let tick = config.tick;
    let mut game = SnakeGame::new(config);

    while !quit.load(Ordering::Acquire) {
        game.tick(&latch, term);
        term.present()?;
        sleep(tick);
    }

    // The reader raises `quit` right before returning, so this does not block.
    reader.join().map_err(|_| anyhow!("input thread panicked"))?
}
