use std::{env, time::Duration};

use log::LevelFilter;
use thiserror::Error;

pub const CELL_SIZE: i32 = 10;
pub const GRID_WIDTH: i32 = 600;
pub const GRID_HEIGHT: i32 = 350;
pub const VIEWPORT_WIDTH: i32 = 600;
pub const VIEWPORT_HEIGHT: i32 = 400;
pub const TICK_MS: u64 = 100;
pub const LOG_FILE: &str = "snake.log";

const TICK_VAR: &str = "SNAKE_TICK_MS";
const LOG_FILE_VAR: &str = "SNAKE_LOG_FILE";
const LOG_LEVEL_VAR: &str = "SNAKE_LOG_LEVEL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    CellSize(i32),
    #[error("grid {axis} of {value} is not a positive multiple of the cell size {cell_size}")]
    GridDimension { axis: &'static str, value: i32, cell_size: i32 },
    #[error("viewport {vw}x{vh} cannot hold the {gw}x{gh} grid")]
    ViewportTooSmall { vw: i32, vh: i32, gw: i32, gh: i32 },
    #[error("tick period must be non-zero")]
    ZeroTick,
    #[error("{var}={value:?} is not valid: {reason}")]
    BadVar { var: &'static str, value: String, reason: String },
}

/// The playfield the snake moves on and the target spawns in. Positions are
/// in logic units, always multiples of `cell_size`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
}

impl GridConfig {
    pub fn max_x(&self) -> i32 {
        self.width - self.cell_size
    }

    pub fn max_y(&self) -> i32 {
        self.height - self.cell_size
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig { width: GRID_WIDTH, height: GRID_HEIGHT, cell_size: CELL_SIZE }
    }
}

/// The visible frame. Taller than the grid: the strip below it holds the score.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ViewportConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig { width: VIEWPORT_WIDTH, height: VIEWPORT_HEIGHT }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub viewport: ViewportConfig,
    pub tick: Duration,
    pub log_file: String,
    pub log_level: LevelFilter,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid: GridConfig::default(),
            viewport: ViewportConfig::default(),
            tick: Duration::from_millis(TICK_MS),
            log_file: LOG_FILE.to_string(),
            log_level: LevelFilter::Info,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = GameConfig::default();

        if let Some(value) = lookup(TICK_VAR) {
            let ms: u64 = value.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::BadVar { var: TICK_VAR, value: value.clone(), reason: e.to_string() }
            })?;
            config.tick = Duration::from_millis(ms);
        }

        if let Some(value) = lookup(LOG_FILE_VAR) {
            config.log_file = value;
        }

        if let Some(value) = lookup(LOG_LEVEL_VAR) {
            config.log_level = value.trim().parse().map_err(|_| ConfigError::BadVar {
                var: LOG_LEVEL_VAR,
                value: value.clone(),
                reason: "expected one of off, error, warn, info, debug, trace".to_string(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridConfig { width, height, cell_size } = self.grid;

        if cell_size <= 0 {
            return Err(ConfigError::CellSize(cell_size));
        }

        for &(axis, value) in &[("width", width), ("height", height)] {
            if value <= 0 || value % cell_size != 0 {
                return Err(ConfigError::GridDimension { axis, value, cell_size });
            }
        }

        let vp = self.viewport;
        if vp.width < width || vp.height < height {
            return Err(ConfigError::ViewportTooSmall {
                vw: vp.width,
                vh: vp.height,
                gw: width,
                gh: height,
            });
        }

        if self.tick.as_millis() == 0 {
            return Err(ConfigError::ZeroTick);
        }

        Ok(())
    }
}
